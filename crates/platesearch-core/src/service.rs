//! Request-level facade over the builder and paginator.
//!
//! Every public method here answers with a response body. Failures are
//! matched per kind, logged, and turned into the empty response for that
//! endpoint; none of them reach the transport layer.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::builder::{BuilderOptions, QueryBuilder, ARCHIVE_FIELD, IDENTIFIER_FIELD};
use crate::collation::SortSpec;
use crate::error::SearchError;
use crate::paginate::Paginator;
use crate::query::{Clause, ClauseKind, Predicate, StructuredQuery};
use crate::traits::{DocumentStore, NameResolver};
use crate::types::{Collection, DetailEnvelope, ResultEnvelope, SearchFilter};

/// Single-plate lookup answer: the bare record, or an empty result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlateLookup {
    Found(Value),
    Missing(DetailEnvelope),
}

pub struct PlateSearch {
    builder: QueryBuilder,
    paginator: Paginator,
    store: Arc<dyn DocumentStore>,
}

fn log_degraded(operation: &'static str, err: &SearchError) {
    let kind = err.kind();
    match err {
        SearchError::Coordinate(e) => warn!(operation, kind, error = %e, "coordinate rejected, returning empty result"),
        SearchError::Filter(e) => warn!(operation, kind, error = %e, "filter rejected, returning empty result"),
        SearchError::Store(e) => error!(operation, kind, error = %e, "store failed, returning empty result"),
    }
}

fn archive_clause(archive_id: &str) -> Clause {
    Clause::new(ClauseKind::Archive, &[ARCHIVE_FIELD], Predicate::contains(ARCHIVE_FIELD, archive_id))
}

impl PlateSearch {
    pub fn new(store: Arc<dyn DocumentStore>, resolver: Arc<dyn NameResolver>, options: BuilderOptions) -> Self {
        Self {
            builder: QueryBuilder::new(resolver, options),
            paginator: Paginator::new(Arc::clone(&store)),
            store,
        }
    }

    /// Filtered plate search. Never fails; see [`try_search`](Self::try_search).
    pub fn search(&self, filter: &SearchFilter, skip: u64, limit: u64) -> ResultEnvelope {
        self.try_search(filter, skip, limit).unwrap_or_else(|e| {
            log_degraded("search", &e);
            ResultEnvelope::empty(skip, limit)
        })
    }

    /// Filtered plate search with failures reported instead of absorbed.
    ///
    /// # Errors
    ///
    /// Any [`SearchError`] from query construction or the store. No store
    /// call is made when the query cannot be built.
    pub fn try_search(&self, filter: &SearchFilter, skip: u64, limit: u64) -> crate::error::Result<ResultEnvelope> {
        let query = self.builder.build(filter)?;
        let sort = SortSpec::for_key(&filter.sort_key);
        let envelope = self.paginator.execute(Collection::Plates, &query, &sort, skip, limit)?;
        info!(total = envelope.total, returned = envelope.results.len(), "plate search");
        Ok(envelope)
    }

    /// All archives, sorted by identifier.
    pub fn list_archives(&self, skip: u64, limit: u64) -> ResultEnvelope {
        self.paginator
            .execute(Collection::Archives, &StructuredQuery::new(), &SortSpec::default(), skip, limit)
            .unwrap_or_else(|e| {
                log_degraded("list_archives", &SearchError::from(e));
                ResultEnvelope::empty(skip, limit)
            })
    }

    /// Archives whose identifier contains `archive_id`.
    pub fn archive_details(&self, archive_id: &str) -> DetailEnvelope {
        let query = StructuredQuery::new().with(Clause::new(
            ClauseKind::Identifier,
            &[IDENTIFIER_FIELD],
            Predicate::contains(IDENTIFIER_FIELD, archive_id),
        ));
        match self.store.find(Collection::Archives, &query, &SortSpec::default(), 0, 0) {
            Ok(results) => DetailEnvelope { results },
            Err(e) => {
                log_degraded("archive_details", &SearchError::from(e));
                DetailEnvelope::default()
            }
        }
    }

    /// Plates whose archive contains `archive_id`, sorted by identifier.
    pub fn plates_in_archive(&self, archive_id: &str, skip: u64, limit: u64) -> ResultEnvelope {
        let query = StructuredQuery::new().with(archive_clause(archive_id));
        self.paginator
            .execute(Collection::Plates, &query, &SortSpec::default(), skip, limit)
            .unwrap_or_else(|e| {
                log_degraded("plates_in_archive", &SearchError::from(e));
                ResultEnvelope::empty(skip, limit)
            })
    }

    /// One plate: archive substring match and exact, case-insensitive
    /// identifier match.
    pub fn plate_details(&self, archive_id: &str, plate_id: &str) -> PlateLookup {
        let query = StructuredQuery::new().with(archive_clause(archive_id)).with(Clause::new(
            ClauseKind::Identifier,
            &[IDENTIFIER_FIELD],
            Predicate::exact(IDENTIFIER_FIELD, plate_id),
        ));
        match self.store.find_one(Collection::Plates, &query) {
            Ok(Some(record)) => PlateLookup::Found(record),
            Ok(None) => PlateLookup::Missing(DetailEnvelope::default()),
            Err(e) => {
                log_degraded("plate_details", &SearchError::from(e));
                PlateLookup::Missing(DetailEnvelope::default())
            }
        }
    }
}
