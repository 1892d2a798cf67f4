use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::EntityId;
use crate::temporal::Timestamp;

/// Open set of mutable, client-writable place attributes (name,
/// description, price_by_night, latitude, ... and any unknown key).
pub type AttributeMap = BTreeMap<String, Value>;

/// Fields that client updates may never overwrite.
pub const PROTECTED_FIELDS: [&str; 5] = ["id", "created_at", "updated_at", "user_id", "city_id"];

/// Returns `true` if `key` names a protected field.
pub fn is_protected(key: &str) -> bool {
    PROTECTED_FIELDS.contains(&key)
}

/// A rentable place. Belongs to one city and one user; linked to any number
/// of amenities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: EntityId,
    pub city_id: EntityId,
    pub user_id: EntityId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Forward Place -> Amenity relation, in link order, without repeats.
    #[serde(default)]
    pub amenity_ids: Vec<EntityId>,
    #[serde(flatten)]
    pub attributes: AttributeMap,
}

impl Place {
    pub fn new(city_id: EntityId, user_id: EntityId, attributes: AttributeMap) -> Self {
        let now = Timestamp::now();
        Self {
            id: EntityId::generate(),
            city_id,
            user_id,
            created_at: now,
            updated_at: now,
            amenity_ids: Vec::new(),
            attributes,
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = id.into();
        self
    }

    /// Convenience constructor used by fixtures and seeders.
    pub fn named(city_id: EntityId, user_id: EntityId, name: impl Into<String>) -> Self {
        let mut attributes = AttributeMap::new();
        attributes.insert("name".into(), Value::String(name.into()));
        Self::new(city_id, user_id, attributes)
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn has_amenity(&self, amenity_id: &EntityId) -> bool {
        self.amenity_ids.contains(amenity_id)
    }

    /// Link an amenity. Returns `false` if it was already linked.
    pub fn link_amenity(&mut self, amenity_id: EntityId) -> bool {
        if self.has_amenity(&amenity_id) {
            return false;
        }
        self.amenity_ids.push(amenity_id);
        true
    }

    /// Unlink an amenity. Returns `false` if it was not linked.
    pub fn unlink_amenity(&mut self, amenity_id: &EntityId) -> bool {
        let before = self.amenity_ids.len();
        self.amenity_ids.retain(|id| id != amenity_id);
        self.amenity_ids.len() != before
    }

    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
