//! Entity types for HBnB.
//!
//! This crate provides the identifiers, timestamps, and records of the
//! object graph served by the place API. Every other HBnB crate depends on
//! `hbnb-types`.
//!
//! # Object Graph
//!
//! ```text
//! State 1──* City 1──* Place *──* Amenity
//!                        *
//!                        │
//!                        1
//!                       User
//! ```
//!
//! Only forward foreign keys are stored (`City::state_id`, `Place::city_id`,
//! `Place::user_id`, `Place::amenity_ids`). Reverse collections are derived
//! by scanning the store, so they can never disagree with the forward keys.
//!
//! # Key Types
//!
//! - [`EntityId`]: opaque string identity (UUID v4 when generated)
//! - [`Timestamp`]: UTC time in the HBnB wire format
//! - [`Entity`] / [`EntityKind`]: any stored record, tagged by class
//! - [`Record`]: typed access to one kind of entity

pub mod amenity;
pub mod entity;
pub mod error;
pub mod id;
pub mod location;
pub mod place;
pub mod temporal;
pub mod user;

pub use amenity::Amenity;
pub use entity::{Entity, EntityKind, Record};
pub use error::TypeError;
pub use id::EntityId;
pub use location::{City, State};
pub use place::{is_protected, AttributeMap, Place, PROTECTED_FIELDS};
pub use temporal::{Timestamp, TIMESTAMP_FORMAT};
pub use user::User;
