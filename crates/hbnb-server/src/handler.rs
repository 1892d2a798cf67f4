use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use hbnb_places::{
    project_entity, project_place, project_places, project_search, PlaceResult, PlaceService,
    Projection, SearchFilters, Stats,
};
use hbnb_types::{Entity, EntityId};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::error::{ApiError, ApiResult};

pub type SharedService = Arc<PlaceService>;

/// Decode a request body without requiring a content type. An empty body
/// decodes to `None`.
fn parse_body(body: &Bytes) -> ApiResult<Option<Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some).map_err(|e| {
        warn!(error = %e, "rejected malformed body");
        ApiError::bad_request("Not a JSON")
    })
}

fn required_body(body: &Bytes) -> ApiResult<Value> {
    parse_body(body)?.ok_or_else(|| ApiError::bad_request("Not a JSON"))
}

/// Run a service call that may persist on the blocking pool, off the
/// async workers.
async fn blocking<T, F>(service: SharedService, op: F) -> ApiResult<T>
where
    F: FnOnce(&PlaceService) -> PlaceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let joined = tokio::task::spawn_blocking(move || op(&service)).await;
    match joined {
        Ok(result) => Ok(result?),
        Err(e) => {
            error!(error = %e, "blocking task failed");
            Err(ApiError::internal())
        }
    }
}

fn render_amenity(amenity: hbnb_types::Amenity) -> ApiResult<Value> {
    Ok(project_entity(&Entity::from(amenity))?)
}

pub async fn status() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

pub async fn stats(State(service): State<SharedService>) -> ApiResult<Json<Stats>> {
    Ok(Json(service.stats()?))
}

pub async fn list_places_of_city(
    State(service): State<SharedService>,
    Path(city_id): Path<EntityId>,
) -> ApiResult<Json<Vec<Value>>> {
    let places = service.list_places_of_city(&city_id)?;
    Ok(Json(project_places(&places, Projection::Full)))
}

pub async fn create_place(
    State(service): State<SharedService>,
    Path(city_id): Path<EntityId>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let payload = required_body(&body)?;
    let place = blocking(service, move |svc| svc.create_place(&city_id, &payload)).await?;
    Ok((StatusCode::CREATED, Json(project_place(&place, Projection::Full))))
}

pub async fn get_place(
    State(service): State<SharedService>,
    Path(place_id): Path<EntityId>,
) -> ApiResult<Json<Value>> {
    let place = service.get_place(&place_id)?;
    Ok(Json(project_place(&place, Projection::Full)))
}

pub async fn update_place(
    State(service): State<SharedService>,
    Path(place_id): Path<EntityId>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let payload = required_body(&body)?;
    let place = blocking(service, move |svc| svc.update_place(&place_id, &payload)).await?;
    Ok(Json(project_place(&place, Projection::Full)))
}

pub async fn delete_place(
    State(service): State<SharedService>,
    Path(place_id): Path<EntityId>,
) -> ApiResult<Json<Value>> {
    blocking(service, move |svc| svc.delete_place(&place_id)).await?;
    Ok(Json(json!({})))
}

pub async fn search_places(
    State(service): State<SharedService>,
    body: Bytes,
) -> ApiResult<Json<Vec<Value>>> {
    let payload = parse_body(&body)?;
    let filters = SearchFilters::from_body(payload.as_ref())?;
    let outcome = service.search_places(&filters)?;
    Ok(Json(project_search(&outcome)))
}

pub async fn list_amenities_of_place(
    State(service): State<SharedService>,
    Path(place_id): Path<EntityId>,
) -> ApiResult<Json<Vec<Value>>> {
    let amenities = service.list_amenities_of_place(&place_id)?;
    let rendered = amenities
        .into_iter()
        .map(render_amenity)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(rendered))
}

pub async fn link_amenity(
    State(service): State<SharedService>,
    Path((place_id, amenity_id)): Path<(EntityId, EntityId)>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (amenity, created) =
        blocking(service, move |svc| svc.link_amenity(&place_id, &amenity_id)).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(render_amenity(amenity)?)))
}

pub async fn unlink_amenity(
    State(service): State<SharedService>,
    Path((place_id, amenity_id)): Path<(EntityId, EntityId)>,
) -> ApiResult<Json<Value>> {
    blocking(service, move |svc| svc.unlink_amenity(&place_id, &amenity_id)).await?;
    Ok(Json(json!({})))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}
