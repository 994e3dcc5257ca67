use serde_json::Value;
use std::cmp::Ordering;

use platesearch_core::collation::{Collation, SortSpec};

use crate::eval::leaves_at;

/// Sort key of one document, ordered null < numbers < strings < other.
#[derive(Debug, Clone, Copy)]
enum SortKey<'a> {
    Null,
    Number(f64),
    Text(&'a str),
    Other,
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Null => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Other => 3,
        }
    }

    fn compare(&self, other: &Self, collation: &Collation) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => collation.compare(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn key_of(value: &Value) -> SortKey<'_> {
    match value {
        Value::Null => SortKey::Null,
        Value::Number(n) => n.as_f64().map_or(SortKey::Other, SortKey::Number),
        Value::String(s) => SortKey::Text(s.as_str()),
        _ => SortKey::Other,
    }
}

/// Ascending sort key: the smallest value at the sort path, or null when
/// the path is missing.
fn ascending_key<'a>(doc: &'a Value, field: &str, collation: &Collation) -> SortKey<'a> {
    leaves_at(doc, field)
        .into_iter()
        .map(key_of)
        .min_by(|a, b| a.compare(b, collation))
        .unwrap_or(SortKey::Null)
}

/// Sort `docs` ascending by `sort`. Ties keep their incoming order.
pub fn sort_documents(docs: &mut [&Value], sort: &SortSpec) {
    docs.sort_by(|a, b| {
        let ka = ascending_key(a, sort.field, &sort.collation);
        let kb = ascending_key(b, sort.field, &sort.collation);
        ka.compare(&kb, &sort.collation)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identifiers_sort_with_numeric_collation() {
        let docs = [json!({"identifier": "plate-2"}), json!({"identifier": "plate-10"}), json!({"identifier": "plate-1"})];
        let mut refs: Vec<&Value> = docs.iter().collect();
        sort_documents(&mut refs, &SortSpec::for_key("identifier"));
        let ids: Vec<_> = refs.iter().map(|d| d["identifier"].as_str().unwrap_or_default()).collect();
        assert_eq!(ids, vec!["plate-1", "plate-2", "plate-10"]);
    }

    #[test]
    fn array_field_sorts_by_smallest_element_and_missing_first() {
        let docs = [
            json!({"id": "a", "exposure_info": [{"ra_deg": 50.0}, {"ra_deg": 5.0}]}),
            json!({"id": "b", "exposure_info": [{"ra_deg": 20.0}]}),
            json!({"id": "c"}),
        ];
        let mut refs: Vec<&Value> = docs.iter().collect();
        sort_documents(&mut refs, &SortSpec::for_key("ra"));
        let ids: Vec<_> = refs.iter().map(|d| d["id"].as_str().unwrap_or_default()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
