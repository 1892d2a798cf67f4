//! Output representation of entities.
//!
//! A place renders as its attributes followed by the system fields; the
//! system fields win over any attribute with the same name:
//!
//! ```text
//! { "name": "Loft", "max_guest": 3, ..., "id": "...", "city_id": "...",
//!   "user_id": "...", "created_at": "...", "updated_at": "...",
//!   "__class__": "Place", "amenities": ["..."] }
//! ```

use hbnb_types::{Entity, Place};
use serde_json::{Map, Value};

use crate::error::PlaceResult;
use crate::search::SearchOutcome;

/// Key of the Place -> Amenity relation in the rendered form.
pub const AMENITIES_FIELD: &str = "amenities";

/// Whether the amenity relation is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    Full,
    WithoutAmenities,
}

/// Render a place.
pub fn project_place(place: &Place, projection: Projection) -> Value {
    let mut out = Map::new();
    for (key, value) in &place.attributes {
        out.insert(key.clone(), value.clone());
    }
    out.insert("id".into(), Value::String(place.id.to_string()));
    out.insert("city_id".into(), Value::String(place.city_id.to_string()));
    out.insert("user_id".into(), Value::String(place.user_id.to_string()));
    out.insert("created_at".into(), Value::String(place.created_at.to_wire()));
    out.insert("updated_at".into(), Value::String(place.updated_at.to_wire()));
    out.insert("__class__".into(), Value::String("Place".into()));
    match projection {
        Projection::Full => {
            let ids = place
                .amenity_ids
                .iter()
                .map(|id| Value::String(id.to_string()))
                .collect();
            out.insert(AMENITIES_FIELD.into(), Value::Array(ids));
        }
        Projection::WithoutAmenities => {
            out.remove(AMENITIES_FIELD);
        }
    }
    Value::Object(out)
}

pub fn project_places(places: &[Place], projection: Projection) -> Vec<Value> {
    places.iter().map(|p| project_place(p, projection)).collect()
}

/// Render a search result. The unfiltered path returns full places; any
/// filtered result drops the amenity relation.
pub fn project_search(outcome: &SearchOutcome) -> Vec<Value> {
    let projection = if outcome.filtered {
        Projection::WithoutAmenities
    } else {
        Projection::Full
    };
    project_places(&outcome.places, projection)
}

/// Render any non-place entity (amenities, cities, ...) as its stored
/// fields plus `__class__`. Users never expose their password.
pub fn project_entity(entity: &Entity) -> PlaceResult<Value> {
    if let Entity::Place(place) = entity {
        return Ok(project_place(place, Projection::Full));
    }
    let mut value = serde_json::to_value(entity)
        .map_err(|e| crate::error::PlaceError::Internal(e.to_string()))?;
    if let (Entity::User(_), Some(map)) = (entity, value.as_object_mut()) {
        map.remove("password");
    }
    Ok(value)
}
