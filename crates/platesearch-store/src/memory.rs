use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use platesearch_core::collation::SortSpec;
use platesearch_core::error::StoreError;
use platesearch_core::query::StructuredQuery;
use platesearch_core::traits::DocumentStore;
use platesearch_core::types::Collection;

use crate::eval::Matcher;
use crate::load::load_documents;
use crate::order::sort_documents;

/// Read-only store holding each collection as a vector of JSON documents.
///
/// Documents are never mutated after loading, so the store is shared across
/// request threads without locking.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<Collection, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_documents(mut self, collection: Collection, docs: Vec<Value>) -> Self {
        self.collections.entry(collection).or_default().extend(docs);
        self
    }

    /// Load plates and archives from their configured locations.
    pub fn open(plates: &Path, archives: &Path) -> Result<Self> {
        Ok(Self::new()
            .with_documents(Collection::Plates, load_documents(plates)?)
            .with_documents(Collection::Archives, load_documents(archives)?))
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.collections.get(&collection).map_or(0, Vec::len)
    }

    fn matching<'a>(&'a self, collection: Collection, query: &StructuredQuery) -> Result<Vec<&'a Value>, StoreError> {
        let matcher = Matcher::compile(query)?;
        let docs = self.collections.get(&collection).map(Vec::as_slice).unwrap_or_default();
        Ok(docs.iter().filter(|d| matcher.matches(d)).collect())
    }
}

impl DocumentStore for MemoryStore {
    fn count(&self, collection: Collection, query: &StructuredQuery) -> Result<u64, StoreError> {
        Ok(self.matching(collection, query)?.len() as u64)
    }

    fn find(
        &self,
        collection: Collection,
        query: &StructuredQuery,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Value>, StoreError> {
        let mut hits = self.matching(collection, query)?;
        sort_documents(&mut hits, sort);
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let take = match limit {
            0 => usize::MAX,
            n => usize::try_from(n).unwrap_or(usize::MAX),
        };
        let page: Vec<Value> = hits.into_iter().skip(skip).take(take).cloned().collect();
        debug!(%collection, returned = page.len(), "memory store find");
        Ok(page)
    }

    fn find_one(&self, collection: Collection, query: &StructuredQuery) -> Result<Option<Value>, StoreError> {
        Ok(self.matching(collection, query)?.first().map(|d| (*d).clone()))
    }
}
