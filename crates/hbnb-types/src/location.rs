//! Location records: a [`State`] owns many [`City`] entities through
//! `City::state_id`. The reverse collection is derived by the store scan,
//! never stored on the state itself.

use serde::{Deserialize, Serialize};

use crate::id::EntityId;
use crate::temporal::Timestamp;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: EntityId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl State {
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

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: EntityId,
    pub state_id: EntityId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl City {
    pub fn new(state_id: EntityId, name: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: EntityId::generate(),
            state_id,
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
