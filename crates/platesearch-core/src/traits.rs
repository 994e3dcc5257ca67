use serde_json::Value;

use crate::collation::SortSpec;
use crate::error::{CoordinateError, StoreError};
use crate::query::StructuredQuery;
use crate::types::{Collection, SkyPosition};

/// Read-only access to the catalogue's document store.
///
/// Implementations own connection pooling and retries; the core calls each
/// method once per request.
pub trait DocumentStore: Send + Sync {
    /// Number of documents matching `query`, ignoring any window.
    fn count(&self, collection: Collection, query: &StructuredQuery) -> Result<u64, StoreError>;

    /// Matching documents sorted by `sort`, then windowed by `skip`/`limit`.
    /// A `limit` of zero means no limit.
    fn find(
        &self,
        collection: Collection,
        query: &StructuredQuery,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Value>, StoreError>;

    /// First matching document in store order.
    fn find_one(&self, collection: Collection, query: &StructuredQuery) -> Result<Option<Value>, StoreError>;
}

/// Turns an astronomical object name into a single unambiguous position.
pub trait NameResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<SkyPosition, CoordinateError>;
}
