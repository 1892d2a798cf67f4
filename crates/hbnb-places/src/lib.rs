//! Place operations for HBnB.
//!
//! A place is a rentable listing owned by a user, located in a city, and
//! linked to any number of amenities. This crate implements everything the
//! API exposes for places on top of an [`hbnb_store::EntityStore`]:
//!
//! - **Queries**: places of a city, a single place, the amenities of a
//!   place, and entity counts.
//! - **Search**: resolve state, city, and amenity filters to a place list
//!   (see [`search`] for the exact union and intersection rules).
//! - **Mutations**: create, update, and delete places, and link or unlink
//!   amenities. Protected fields are never written from client payloads.
//! - **Projection**: the JSON form of places and other entities.
//!
//! [`PlaceService`] wraps all of it behind a shared store handle.

pub mod error;
pub mod mutation;
pub mod navigator;
pub mod projection;
pub mod query;
pub mod search;
pub mod service;

#[cfg(test)]
mod fixtures;

pub use error::{PlaceError, PlaceResult};
pub use navigator::Navigator;
pub use projection::{project_entity, project_place, project_places, project_search, Projection};
pub use query::Stats;
pub use search::{SearchFilters, SearchOptions, SearchOutcome};
pub use service::PlaceService;
