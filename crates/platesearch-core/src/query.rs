//! Structured query tree handed to the document store.
//!
//! A query is a list of clauses combined by conjunction. Each clause records
//! which part of the filter produced it and which field paths it governs, so
//! adding one constraint can never silently overwrite another.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::types::DegreeRange;

/// How a text predicate compares the stored string with the needle.
/// Both modes are case-insensitive and treat the needle literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextMatch {
    Contains,
    Exact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Predicate {
    /// String field at `path` matches `value`.
    Text { path: String, value: String, mode: TextMatch },
    /// Array at `array` has at least one element whose numeric `field`
    /// lies strictly inside `range`.
    ElemRange { array: String, field: String, range: DegreeRange },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn contains(path: &str, value: &str) -> Self {
        Predicate::Text { path: path.to_string(), value: value.to_string(), mode: TextMatch::Contains }
    }

    pub fn exact(path: &str, value: &str) -> Self {
        Predicate::Text { path: path.to_string(), value: value.to_string(), mode: TextMatch::Exact }
    }

    pub fn elem_range(array: &str, field: &str, range: DegreeRange) -> Self {
        Predicate::ElemRange { array: array.to_string(), field: field.to_string(), range }
    }

    /// Regex source for a text predicate, with the needle escaped.
    pub fn text_pattern(value: &str, mode: TextMatch) -> String {
        let escaped = regex::escape(value);
        match mode {
            TextMatch::Contains => escaped,
            TextMatch::Exact => format!("^{escaped}$"),
        }
    }

    /// Render as a MongoDB-style filter document.
    pub fn to_document(&self) -> Value {
        match self {
            Predicate::Text { path, value, mode } => {
                let mut doc = Map::new();
                doc.insert(
                    path.clone(),
                    json!({ "$regex": Self::text_pattern(value, *mode), "$options": "i" }),
                );
                Value::Object(doc)
            }
            Predicate::ElemRange { array, field, range } => {
                let mut bounds = Map::new();
                bounds.insert(field.clone(), json!({ "$gt": range.min, "$lt": range.max }));
                let mut doc = Map::new();
                doc.insert(array.clone(), json!({ "$elemMatch": Value::Object(bounds) }));
                Value::Object(doc)
            }
            Predicate::And(items) => json!({ "$and": items.iter().map(Predicate::to_document).collect::<Vec<_>>() }),
            Predicate::Or(items) => json!({ "$or": items.iter().map(Predicate::to_document).collect::<Vec<_>>() }),
        }
    }
}

/// Which filter parameter produced a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClauseKind {
    Identifier,
    Archive,
    Position,
    FreeText,
    Observer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clause {
    pub kind: ClauseKind,
    /// Field paths this clause constrains.
    pub governs: Vec<String>,
    pub predicate: Predicate,
}

impl Clause {
    pub fn new(kind: ClauseKind, governs: &[&str], predicate: Predicate) -> Self {
        Self { kind, governs: governs.iter().map(|p| (*p).to_string()).collect(), predicate }
    }
}

/// Conjunction of clauses. An empty query matches every document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StructuredQuery {
    clauses: Vec<Clause>,
}

impl StructuredQuery {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, clause: Clause) { self.clauses.push(clause); }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, clause: Clause) -> Self {
        self.push(clause);
        self
    }

    /// Drop every clause produced by `kind`; returns how many were removed.
    pub fn remove_kind(&mut self, kind: ClauseKind) -> usize {
        let before = self.clauses.len();
        self.clauses.retain(|c| c.kind != kind);
        before - self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] { &self.clauses }

    pub fn is_empty(&self) -> bool { self.clauses.is_empty() }

    /// Clauses that constrain `path`.
    pub fn governing<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Clause> + 'a {
        self.clauses.iter().filter(move |c| c.governs.iter().any(|g| g == path))
    }

    pub fn of_kind(&self, kind: ClauseKind) -> impl Iterator<Item = &Clause> + '_ {
        self.clauses.iter().filter(move |c| c.kind == kind)
    }

    /// Render as a MongoDB-style filter document.
    pub fn to_document(&self) -> Value {
        match self.clauses.as_slice() {
            [] => json!({}),
            [only] => only.predicate.to_document(),
            many => json!({ "$and": many.iter().map(|c| c.predicate.to_document()).collect::<Vec<_>>() }),
        }
    }
}
