//! Read-only HTTP API over the employees sample dataset.
//!
//! The interesting part lives in [`query`]: optional request parameters are
//! composed into a predicate tree, a join plan and page bounds, and the plan
//! drives both the paged data query and the matching distinct count.

pub mod config;
pub mod errors;
pub mod models;
pub mod ops;
pub mod params;
pub mod query;
pub mod routes;
pub mod views;

pub use errors::ApiError;
pub use routes::router;
