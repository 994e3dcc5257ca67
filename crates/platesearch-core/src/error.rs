use thiserror::Error;

use crate::types::Axis;

/// A right-ascension/declination value or object name could not be turned
/// into degrees.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("cannot parse {axis} value '{value}'")]
    Unparsable { axis: Axis, value: String },

    #[error("{axis} value '{value}' is out of range")]
    OutOfRange { axis: Axis, value: String },

    #[error("cannot resolve object '{name}': {reason}")]
    Unresolved { name: String, reason: String },
}

/// A filter parameter carried a numeric value that cannot be used.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    #[error("invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("search radius must be a positive number of arcminutes, got '{0}'")]
    InvalidRadius(String),
}

/// The document store could not answer a count or find.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(String),
}

/// Every way a search request can fail before producing results.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SearchError {
    /// Short label for the failure family, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Coordinate(_) => "coordinate",
            Self::Filter(_) => "filter",
            Self::Store(_) => "store",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
