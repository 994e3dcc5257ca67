//! Query-string models for the search endpoints.

use serde::Deserialize;

use platesearch_core::types::{SearchFilter, ALL_ARCHIVES, DEFAULT_RADIUS_ARCMIN, DEFAULT_SORT_KEY};

/// Query parameters for `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
    pub archive: Option<String>,
    pub identifier: Option<String>,
    /// Object name resolved to a position; overrides `ra`/`dec`.
    pub obj: Option<String>,
    pub ra: Option<String>,
    pub dec: Option<String>,
    /// Search radius in arcminutes.
    pub radius: Option<String>,
    /// Free text matched across the plate's descriptive fields.
    pub text: Option<String>,
    pub observer: Option<String>,
    pub sort_order: Option<String>,
}

impl SearchParams {
    pub fn to_filter(&self) -> SearchFilter {
        SearchFilter {
            identifier: self.identifier.clone(),
            archive: Some(self.archive.clone().unwrap_or_else(|| ALL_ARCHIVES.to_string())),
            object_name: self.obj.clone(),
            ra: self.ra.clone(),
            dec: self.dec.clone(),
            radius_arcmin: self.radius.clone().unwrap_or_else(|| DEFAULT_RADIUS_ARCMIN.to_string()),
            free_text: self.text.clone(),
            observer: self.observer.clone(),
            sort_key: self.sort_order.clone().unwrap_or_else(|| DEFAULT_SORT_KEY.to_string()),
        }
    }
}

/// Query parameters for the paginated listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_contract() {
        let filter = SearchParams::default().to_filter();
        assert_eq!(filter, SearchFilter::default());
    }

    #[test]
    fn names_map_onto_filter_fields() {
        let params = SearchParams {
            obj: Some("M1".into()),
            text: Some("comet".into()),
            radius: Some("5".into()),
            sort_order: Some("ra".into()),
            ..SearchParams::default()
        };
        let filter = params.to_filter();
        assert_eq!(filter.object_name.as_deref(), Some("M1"));
        assert_eq!(filter.free_text.as_deref(), Some("comet"));
        assert_eq!(filter.radius_arcmin, "5");
        assert_eq!(filter.sort_key, "ra");
    }
}
