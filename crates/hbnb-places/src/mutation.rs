//! Create, update, and delete of places, plus amenity linking.
//!
//! Every operation validates and resolves everything it needs before it
//! stages a change, then persists once. A failed persist discards whatever
//! was staged, so a rejected mutation never leaves partial writes behind.

use hbnb_store::{EntityStore, EntityStoreExt};
use hbnb_types::{
    is_protected, Amenity, AttributeMap, City, EntityId, EntityKind, Place, User,
};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{PlaceError, PlaceResult};

/// Keys owned by the rendered form rather than the attribute map: the class
/// tag and the amenity relation. Payload values under these keys are
/// ignored.
pub const RESERVED_KEYS: [&str; 3] = ["__class__", "amenities", "amenity_ids"];

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

fn payload_object(payload: &Value) -> PlaceResult<&Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| PlaceError::validation("Not a JSON"))
}

fn commit(store: &dyn EntityStore) -> PlaceResult<()> {
    if let Err(e) = store.persist() {
        if let Err(discard) = store.discard() {
            warn!(error = %discard, "failed to discard staged changes");
        }
        return Err(e.into());
    }
    Ok(())
}

/// Create a place in `city_id`.
///
/// The payload must be a non-empty object holding `user_id` and `name`.
/// `city_id` always comes from the argument; `id` and the timestamps are
/// system-assigned.
pub fn create_place(store: &dyn EntityStore, city_id: &EntityId, payload: &Value) -> PlaceResult<Place> {
    let body = payload_object(payload)?;
    if body.is_empty() {
        return Err(PlaceError::validation("Not a JSON"));
    }
    let user_id = match body.get("user_id") {
        None => return Err(PlaceError::validation("Missing user_id")),
        Some(Value::String(id)) => EntityId::new(id.as_str()),
        Some(_) => return Err(PlaceError::validation("user_id must be a string")),
    };
    if !body.contains_key("name") {
        return Err(PlaceError::validation("Missing name"));
    }

    let city: City = store
        .get_as(city_id)?
        .ok_or_else(|| PlaceError::not_found(EntityKind::City, city_id))?;
    let user: User = store
        .get_as(&user_id)?
        .ok_or_else(|| PlaceError::not_found(EntityKind::User, &user_id))?;

    let attributes: AttributeMap = body
        .iter()
        .filter(|(key, _)| !is_protected(key) && !is_reserved(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let place = Place::new(city.id, user.id, attributes);
    store.put(place.clone())?;
    commit(store)?;
    info!(place = %place.id.short_id(), city = %place.city_id.short_id(), "place created");
    Ok(place)
}

/// Merge `payload` into a place's attributes.
///
/// Protected fields and reserved keys are skipped whatever their value;
/// every other key, known or not, is written as given. `updated_at` is
/// refreshed by the system.
pub fn update_place(store: &dyn EntityStore, place_id: &EntityId, payload: &Value) -> PlaceResult<Place> {
    let body = payload_object(payload)?;
    let mut place: Place = store
        .get_as(place_id)?
        .ok_or_else(|| PlaceError::not_found(EntityKind::Place, place_id))?;

    let mut skipped = Vec::new();
    for (key, value) in body {
        if is_protected(key) || is_reserved(key) {
            skipped.push(key.as_str());
            continue;
        }
        place.attributes.insert(key.clone(), value.clone());
    }
    if !skipped.is_empty() {
        warn!(place = %place_id.short_id(), ?skipped, "update ignored protected fields");
    }

    place.touch();
    store.put(place.clone())?;
    commit(store)?;
    info!(place = %place.id.short_id(), fields = body.len() - skipped.len(), "place updated");
    Ok(place)
}

/// Delete a place. A second delete of the same id fails with `NotFound`.
pub fn delete_place(store: &dyn EntityStore, place_id: &EntityId) -> PlaceResult<()> {
    if store.get_as::<Place>(place_id)?.is_none() {
        return Err(PlaceError::not_found(EntityKind::Place, place_id));
    }
    store.delete(EntityKind::Place, place_id)?;
    commit(store)?;
    info!(place = %place_id.short_id(), "place deleted");
    Ok(())
}

fn resolve_pair(
    store: &dyn EntityStore,
    place_id: &EntityId,
    amenity_id: &EntityId,
) -> PlaceResult<(Place, Amenity)> {
    let place: Place = store
        .get_as(place_id)?
        .ok_or_else(|| PlaceError::not_found(EntityKind::Place, place_id))?;
    let amenity: Amenity = store
        .get_as(amenity_id)?
        .ok_or_else(|| PlaceError::not_found(EntityKind::Amenity, amenity_id))?;
    Ok((place, amenity))
}

/// Link an amenity to a place. Returns the amenity and whether a new link
/// was created (`false` when it was already linked).
pub fn link_amenity(
    store: &dyn EntityStore,
    place_id: &EntityId,
    amenity_id: &EntityId,
) -> PlaceResult<(Amenity, bool)> {
    let (mut place, amenity) = resolve_pair(store, place_id, amenity_id)?;
    if !place.link_amenity(amenity.id.clone()) {
        return Ok((amenity, false));
    }
    store.put(place)?;
    commit(store)?;
    info!(place = %place_id.short_id(), amenity = %amenity_id.short_id(), "amenity linked");
    Ok((amenity, true))
}

/// Unlink an amenity from a place. Fails with `NotFound` when the amenity
/// is not linked.
pub fn unlink_amenity(
    store: &dyn EntityStore,
    place_id: &EntityId,
    amenity_id: &EntityId,
) -> PlaceResult<()> {
    let (mut place, amenity) = resolve_pair(store, place_id, amenity_id)?;
    if !place.unlink_amenity(&amenity.id) {
        return Err(PlaceError::not_found(EntityKind::Amenity, amenity_id));
    }
    store.put(place)?;
    commit(store)?;
    info!(place = %place_id.short_id(), amenity = %amenity_id.short_id(), "amenity unlinked");
    Ok(())
}
