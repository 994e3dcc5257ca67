//! Domain types shared by the normalizer, builder and paginator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default search radius, in arcminutes.
pub const DEFAULT_RADIUS_ARCMIN: &str = "10";
/// Archive value meaning "do not filter by archive".
pub const ALL_ARCHIVES: &str = "all";
/// Default sort key.
pub const DEFAULT_SORT_KEY: &str = "identifier";

/// The coordinate a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Ra,
    Dec,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Ra => f.write_str("right ascension"),
            Axis::Dec => f.write_str("declination"),
        }
    }
}

/// A resolved sky position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

/// Filter parameters for one search request.
///
/// All values arrive as loosely-typed strings; the builder normalizes them.
/// `radius_arcmin` is always present and defaults to `"10"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub identifier: Option<String>,
    pub archive: Option<String>,
    pub object_name: Option<String>,
    pub ra: Option<String>,
    pub dec: Option<String>,
    pub radius_arcmin: String,
    pub free_text: Option<String>,
    pub observer: Option<String>,
    pub sort_key: String,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            identifier: None,
            archive: Some(ALL_ARCHIVES.to_string()),
            object_name: None,
            ra: None,
            dec: None,
            radius_arcmin: DEFAULT_RADIUS_ARCMIN.to_string(),
            free_text: None,
            observer: None,
            sort_key: DEFAULT_SORT_KEY.to_string(),
        }
    }
}

/// An open interval of degrees, bounds rounded to 4 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegreeRange {
    pub min: f64,
    pub max: f64,
}

/// Rectangular RA/Dec search window. Either axis may be absent when only
/// one coordinate was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub ra: Option<DegreeRange>,
    pub dec: Option<DegreeRange>,
}

/// The stored collections the service reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Plates,
    Archives,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Plates => f.write_str("plates"),
            Collection::Archives => f.write_str("archives"),
        }
    }
}

/// Paginated response shape returned by every listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub total: u64,
    pub limit: u64,
    pub skip: u64,
    pub results: Vec<Value>,
}

impl ResultEnvelope {
    /// The degraded response: nothing found, window echoed back.
    pub fn empty(skip: u64, limit: u64) -> Self {
        Self { total: 0, limit, skip, results: Vec::new() }
    }
}

/// Unpaginated `{results: [...]}` response used by detail lookups.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailEnvelope {
    pub results: Vec<Value>,
}
