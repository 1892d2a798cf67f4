//! HTTP server for HBnB.
//!
//! Serves the place endpoints of the HBnB API under `/api/v1`: per-city
//! listing and creation, single-place read/update/delete, the
//! `places_search` query, and place/amenity links. Errors render as
//! `{"error": message}` with 400, 404, or 500.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ServerError, ServerResult};
pub use router::build_router;
pub use server::HbnbServer;
