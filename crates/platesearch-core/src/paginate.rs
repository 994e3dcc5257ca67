use std::sync::Arc;
use tracing::debug;

use crate::collation::SortSpec;
use crate::error::StoreError;
use crate::query::StructuredQuery;
use crate::traits::DocumentStore;
use crate::types::{Collection, ResultEnvelope};

/// Counts, sorts and windows query results into a [`ResultEnvelope`].
pub struct Paginator {
    store: Arc<dyn DocumentStore>,
}

impl Paginator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    /// Run `query` against `collection`.
    ///
    /// `total` is counted before the window is applied, so it does not depend
    /// on `skip` or `limit`.
    ///
    /// # Errors
    ///
    /// Propagates any [`StoreError`] from counting or fetching.
    pub fn execute(
        &self,
        collection: Collection,
        query: &StructuredQuery,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<ResultEnvelope, StoreError> {
        let total = self.store.count(collection, query)?;
        let results = self.store.find(collection, query, sort, skip, limit)?;
        debug!(%collection, total, returned = results.len(), skip, limit, sort = sort.field, "paginated query");
        Ok(ResultEnvelope { total, limit, skip, results })
    }
}
