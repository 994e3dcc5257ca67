#![deny(dead_code)]
#![deny(unused_imports)]

//! Query-translation core for the plate catalogue search service.
//!
//! Filter parameters flow through [`builder::QueryBuilder`] (using
//! [`coords`] for RA/Dec normalization and object-name resolution) into a
//! [`query::StructuredQuery`], which [`paginate::Paginator`] runs against an
//! injected [`traits::DocumentStore`]. [`service::PlateSearch`] wires these
//! together and turns every failure into an empty response.

pub mod builder;
pub mod collation;
pub mod config;
pub mod coords;
pub mod error;
pub mod paginate;
pub mod query;
pub mod service;
pub mod traits;
pub mod types;
