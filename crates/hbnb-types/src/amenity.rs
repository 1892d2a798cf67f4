use serde::{Deserialize, Serialize};

use crate::id::EntityId;
use crate::temporal::Timestamp;

/// A feature a place can offer (Wifi, Pool, ...). Linked to places
/// many-to-many through `Place::amenity_ids`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: EntityId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Amenity {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: EntityId::generate(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = id.into();
        self
    }
}
