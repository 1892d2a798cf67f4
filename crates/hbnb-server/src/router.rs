use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use hbnb_places::PlaceService;
use tower_http::trace::TraceLayer;

use crate::handler::{self, SharedService};

/// Prefix of every API route.
pub const API_PREFIX: &str = "/api/v1";

/// Build the axum router with all HBnB endpoints.
pub fn build_router(service: Arc<PlaceService>) -> Router {
    let api: Router<SharedService> = Router::new()
        .route("/status", get(handler::status))
        .route("/stats", get(handler::stats))
        .route(
            "/cities/:city_id/places",
            get(handler::list_places_of_city).post(handler::create_place),
        )
        .route(
            "/places/:place_id",
            get(handler::get_place)
                .put(handler::update_place)
                .delete(handler::delete_place),
        )
        .route("/places_search", post(handler::search_places))
        .route(
            "/places/:place_id/amenities",
            get(handler::list_amenities_of_place),
        )
        .route(
            "/places/:place_id/amenities/:amenity_id",
            post(handler::link_amenity).delete(handler::unlink_amenity),
        );

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(handler::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
