//! HTTP surface of the plate catalogue search service.

pub mod handlers;
pub mod params;
pub mod router;
