use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::amenity::Amenity;
use crate::error::TypeError;
use crate::id::EntityId;
use crate::location::{City, State};
use crate::place::Place;
use crate::user::User;

/// The closed set of entity types in the object graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Amenity,
    City,
    Place,
    State,
    User,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Amenity,
        EntityKind::City,
        EntityKind::Place,
        EntityKind::State,
        EntityKind::User,
    ];

    /// Class name, used as the `__class__` tag and the storage key prefix.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Amenity => "Amenity",
            Self::City => "City",
            Self::Place => "Place",
            Self::State => "State",
            Self::User => "User",
        }
    }

    /// Plural collection name, as reported by the stats endpoint.
    pub fn collection_name(&self) -> &'static str {
        match self {
            Self::Amenity => "amenities",
            Self::City => "cities",
            Self::Place => "places",
            Self::State => "states",
            Self::User => "users",
        }
    }

    /// Storage key for an entity of this kind: `"<Class>.<id>"`.
    pub fn storage_key(&self, id: &EntityId) -> String {
        format!("{}.{}", self.class_name(), id)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

impl FromStr for EntityKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.class_name() == s)
            .ok_or_else(|| TypeError::UnknownClass(s.to_string()))
    }
}

/// Any stored entity. Serializes with a `__class__` tag next to the
/// record's own fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum Entity {
    Amenity(Amenity),
    City(City),
    Place(Place),
    State(State),
    User(User),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Amenity(_) => EntityKind::Amenity,
            Self::City(_) => EntityKind::City,
            Self::Place(_) => EntityKind::Place,
            Self::State(_) => EntityKind::State,
            Self::User(_) => EntityKind::User,
        }
    }

    pub fn id(&self) -> &EntityId {
        match self {
            Self::Amenity(r) => &r.id,
            Self::City(r) => &r.id,
            Self::Place(r) => &r.id,
            Self::State(r) => &r.id,
            Self::User(r) => &r.id,
        }
    }

    pub fn storage_key(&self) -> String {
        self.kind().storage_key(self.id())
    }

    /// Downcast into a concrete record type.
    pub fn into_record<T: Record>(self) -> Result<T, TypeError> {
        T::from_entity(self)
    }
}

/// A concrete record that can be stored as an [`Entity`].
pub trait Record: Clone + Into<Entity> + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &EntityId;

    fn from_entity(entity: Entity) -> Result<Self, TypeError>;
}

macro_rules! impl_record {
    ($ty:ident) => {
        impl Record for $ty {
            const KIND: EntityKind = EntityKind::$ty;

            fn id(&self) -> &EntityId {
                &self.id
            }

            fn from_entity(entity: Entity) -> Result<Self, TypeError> {
                match entity {
                    Entity::$ty(record) => Ok(record),
                    other => Err(TypeError::KindMismatch {
                        expected: EntityKind::$ty.to_string(),
                        actual: other.kind().to_string(),
                    }),
                }
            }
        }

        impl From<$ty> for Entity {
            fn from(record: $ty) -> Self {
                Entity::$ty(record)
            }
        }
    };
}

impl_record!(Amenity);
impl_record!(City);
impl_record!(Place);
impl_record!(State);
impl_record!(User);
