//! Predicate evaluation over JSON documents.
//!
//! Dotted paths descend through arrays the way MongoDB does: the path
//! `exposure_info.target` reaches the `target` of every exposure.

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use platesearch_core::error::StoreError;
use platesearch_core::query::{Predicate, StructuredQuery};
use platesearch_core::types::DegreeRange;

/// Every value reachable at `path`, descending through arrays of objects.
pub fn values_at<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![doc];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => next.extend(map.get(segment)),
                Value::Array(items) => {
                    next.extend(items.iter().filter_map(|item| item.as_object()).filter_map(|m| m.get(segment)));
                }
                _ => {}
            }
        }
        current = next;
    }
    current
}

/// Like [`values_at`], with arrays at the end of the path expanded into
/// their elements.
pub fn leaves_at<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut out = Vec::new();
    for value in values_at(doc, path) {
        match value {
            Value::Array(items) => out.extend(items.iter()),
            other => out.push(other),
        }
    }
    out
}

enum Compiled {
    Text { path: String, regex: Regex },
    ElemRange { array: String, field: String, range: DegreeRange },
    And(Vec<Compiled>),
    Or(Vec<Compiled>),
}

impl Compiled {
    fn compile(predicate: &Predicate) -> Result<Self, StoreError> {
        Ok(match predicate {
            Predicate::Text { path, value, mode } => {
                let regex = RegexBuilder::new(&Predicate::text_pattern(value, *mode))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| StoreError::Query(format!("bad pattern for {path}: {e}")))?;
                Compiled::Text { path: path.clone(), regex }
            }
            Predicate::ElemRange { array, field, range } => {
                Compiled::ElemRange { array: array.clone(), field: field.clone(), range: *range }
            }
            Predicate::And(items) => Compiled::And(Self::compile_group("$and", items)?),
            Predicate::Or(items) => Compiled::Or(Self::compile_group("$or", items)?),
        })
    }

    fn compile_group(op: &str, items: &[Predicate]) -> Result<Vec<Self>, StoreError> {
        if items.is_empty() {
            return Err(StoreError::Query(format!("{op} requires a non-empty list")));
        }
        items.iter().map(Self::compile).collect()
    }

    fn matches(&self, doc: &Value) -> bool {
        match self {
            Compiled::Text { path, regex } => {
                leaves_at(doc, path).into_iter().filter_map(Value::as_str).any(|s| regex.is_match(s))
            }
            Compiled::ElemRange { array, field, range } => values_at(doc, array)
                .into_iter()
                .filter_map(Value::as_array)
                .flatten()
                .any(|element| {
                    leaves_at(element, field)
                        .into_iter()
                        .filter_map(Value::as_f64)
                        .any(|v| v > range.min && v < range.max)
                }),
            Compiled::And(items) => items.iter().all(|p| p.matches(doc)),
            Compiled::Or(items) => items.iter().any(|p| p.matches(doc)),
        }
    }
}

/// A [`StructuredQuery`] compiled for repeated evaluation.
pub struct Matcher {
    clauses: Vec<Compiled>,
}

impl Matcher {
    /// # Errors
    ///
    /// [`StoreError::Query`] for an empty logical group or a pattern the
    /// regex engine rejects.
    pub fn compile(query: &StructuredQuery) -> Result<Self, StoreError> {
        let clauses = query
            .clauses()
            .iter()
            .map(|c| Compiled::compile(&c.predicate))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { clauses })
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses.iter().all(|c| c.matches(doc))
    }
}
