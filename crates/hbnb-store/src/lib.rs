//! Entity storage for HBnB.
//!
//! This crate implements the persistence layer the place API runs on: typed
//! key-value access to the State, City, Place, Amenity, and User records by
//! id, with staged writes finalized by an explicit persist.
//!
//! # Storage Backends
//!
//! All backends implement the [`EntityStore`] trait:
//!
//! - [`InMemoryEntityStore`] -- ordered in-memory tables for tests and embedding
//! - [`JsonFileStore`] -- the same tables persisted as one JSON document
//!
//! [`EntityStoreExt`] adds typed reads (`get_as`, `all_as`, `pair_as`) and
//! writes (`put`) on top of any backend, trait objects included.
//!
//! # Design Rules
//!
//! 1. `create`/`delete` stage; `persist` applies everything staged, in order.
//! 2. Reads only ever observe committed state; `snapshot` reads several
//!    kinds from the same committed state.
//! 3. Listing order is first-insertion order and stable across persists.
//! 4. The store never validates relationships; that is the caller's job.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
mod table;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::InMemoryEntityStore;
pub use traits::{EntityStore, EntityStoreExt};
