//! Read-only place operations.

use std::collections::BTreeMap;

use hbnb_store::{EntityStore, EntityStoreExt};
use hbnb_types::{Amenity, City, EntityId, EntityKind, Place};
use tracing::{debug, warn};

use crate::error::{PlaceError, PlaceResult};
use crate::navigator::Navigator;
use crate::search::{resolve, SearchFilters, SearchOptions, SearchOutcome};

/// Entity counts keyed by collection name (`"places"`, `"users"`, ...).
pub type Stats = BTreeMap<String, usize>;

/// Every place whose `city_id` is `city_id`, in store order.
pub fn list_places_of_city(store: &dyn EntityStore, city_id: &EntityId) -> PlaceResult<Vec<Place>> {
    let city: City = store
        .get_as(city_id)?
        .ok_or_else(|| PlaceError::not_found(EntityKind::City, city_id))?;
    let nav = Navigator::load(store)?;
    Ok(nav.places_of(&city).cloned().collect())
}

pub fn get_place(store: &dyn EntityStore, place_id: &EntityId) -> PlaceResult<Place> {
    store
        .get_as(place_id)?
        .ok_or_else(|| PlaceError::not_found(EntityKind::Place, place_id))
}

/// Amenities linked to a place, in link order. Links to amenities that no
/// longer exist are skipped.
pub fn list_amenities_of_place(store: &dyn EntityStore, place_id: &EntityId) -> PlaceResult<Vec<Amenity>> {
    let place = get_place(store, place_id)?;
    let mut amenities = Vec::with_capacity(place.amenity_ids.len());
    for amenity_id in &place.amenity_ids {
        match store.get_as::<Amenity>(amenity_id)? {
            Some(amenity) => amenities.push(amenity),
            None => warn!(place = %place_id, amenity = %amenity_id, "dangling amenity link"),
        }
    }
    Ok(amenities)
}

pub fn search_places(
    store: &dyn EntityStore,
    filters: &SearchFilters,
    options: &SearchOptions,
) -> PlaceResult<SearchOutcome> {
    debug!(
        states = filters.state_ids().len(),
        cities = filters.city_ids().len(),
        amenities = filters.amenity_ids().len(),
        "search"
    );
    resolve(store, filters, options)
}

/// Count every entity kind.
pub fn stats(store: &dyn EntityStore) -> PlaceResult<Stats> {
    let mut out = Stats::new();
    for kind in EntityKind::ALL {
        out.insert(kind.collection_name().to_string(), store.count(kind)?);
    }
    Ok(out)
}
