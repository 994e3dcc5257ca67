use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use platesearch_core::builder::{BuilderOptions, OrGroupMerge};
use platesearch_core::error::CoordinateError;
use platesearch_core::service::{PlateLookup, PlateSearch};
use platesearch_core::traits::{DocumentStore, NameResolver};
use platesearch_core::types::{Collection, SearchFilter, SkyPosition};
use platesearch_store::load::load_documents;
use platesearch_store::MemoryStore;

struct Crab;

impl NameResolver for Crab {
    fn resolve(&self, name: &str) -> Result<SkyPosition, CoordinateError> {
        match name {
            "M1" => Ok(SkyPosition { ra_deg: 83.6331, dec_deg: 22.0145 }),
            _ => Err(CoordinateError::Unresolved { name: name.to_string(), reason: "unknown".to_string() }),
        }
    }
}

fn plates() -> Vec<Value> {
    vec![
        json!({
            "identifier": "plate-10", "archive": "Harvard",
            "plate_info": { "observer": "Leavitt", "emulsion": "Cramer" },
            "obs_info": { "observatory": "Arequipa" },
            "exposure_info": [{ "ra_deg": 181.0, "dec_deg": 45.05, "target": "Field 12" }]
        }),
        json!({
            "identifier": "plate-2", "archive": "Harvard",
            "plate_info": { "observer": "Cannon", "notes": "Comet visible" },
            "exposure_info": [{ "ra_deg": 83.5, "dec_deg": 22.1, "target": "Crab Nebula" }]
        }),
        json!({
            "identifier": "plate-1", "archive": "Yerkes",
            "plate_info": { "observer": "Barnard", "condition": "good" },
            "exposure_info": [
                { "ra_deg": 179.0, "dec_deg": 10.0, "target": "Virgo" },
                { "ra_deg": 10.0, "dec_deg": 45.1, "target": "M31" }
            ]
        }),
    ]
}

fn service(options: BuilderOptions) -> PlateSearch {
    let store = MemoryStore::new()
        .with_documents(Collection::Plates, plates())
        .with_documents(Collection::Archives, vec![json!({"identifier": "Yerkes"}), json!({"identifier": "Harvard"})]);
    PlateSearch::new(Arc::new(store), Arc::new(Crab), options)
}

fn ids(results: &[Value]) -> Vec<&str> {
    results.iter().map(|r| r["identifier"].as_str().unwrap_or_default()).collect()
}

#[test]
fn unfiltered_search_sorts_identifiers_numerically() {
    let envelope = service(BuilderOptions::default()).search(&SearchFilter::default(), 0, 50);
    assert_eq!(envelope.total, 3);
    assert_eq!(ids(&envelope.results), vec!["plate-1", "plate-2", "plate-10"]);
}

#[test]
fn ra_box_uses_fifteen_times_radius() {
    let svc = service(BuilderOptions::default());
    // 10 arcmin -> 2.5 deg RA half-width around 180
    let filter = SearchFilter { ra: Some("12:00:00".into()), ..SearchFilter::default() };
    let envelope = svc.search(&filter, 0, 50);
    assert_eq!(ids(&envelope.results), vec!["plate-1", "plate-10"]);
}

#[test]
fn ra_and_dec_may_match_different_exposures() {
    let svc = service(BuilderOptions::default());
    let filter = SearchFilter { ra: Some("180".into()), dec: Some("45".into()), ..SearchFilter::default() };
    // plate-1 has RA 179 on one exposure and Dec 45.1 on another
    assert_eq!(ids(&svc.search(&filter, 0, 50).results), vec!["plate-1", "plate-10"]);
}

#[test]
fn object_name_search_finds_nearby_plates() {
    let svc = service(BuilderOptions::default());
    let filter = SearchFilter { object_name: Some("M1".into()), ..SearchFilter::default() };
    let envelope = svc.search(&filter, 0, 50);
    assert_eq!(ids(&envelope.results), vec!["plate-2"]);

    let unknown = SearchFilter { object_name: Some("M999".into()), ..SearchFilter::default() };
    assert_eq!(svc.search(&unknown, 0, 50).total, 0);
}

#[test]
fn free_text_reaches_nested_and_array_fields() {
    let svc = service(BuilderOptions::default());
    for (text, expected) in [("comet", vec!["plate-2"]), ("crab", vec!["plate-2"]), ("arequipa", vec!["plate-10"]), ("m31", vec!["plate-1"])] {
        let filter = SearchFilter { free_text: Some(text.into()), ..SearchFilter::default() };
        assert_eq!(ids(&svc.search(&filter, 0, 50).results), expected, "text={text}");
    }
}

#[test]
fn observer_merge_policies_differ() {
    let filter = SearchFilter { free_text: Some("comet".into()), observer: Some("leavitt".into()), ..SearchFilter::default() };

    let corrected = service(BuilderOptions::default()).search(&filter, 0, 50);
    assert_eq!(corrected.total, 0);

    let legacy = BuilderOptions { or_merge: OrGroupMerge::LastWriterWins, ..BuilderOptions::default() };
    let envelope = service(legacy).search(&filter, 0, 50);
    assert_eq!(ids(&envelope.results), vec!["plate-10"]);
}

#[test]
fn regex_metacharacters_match_literally() {
    let svc = service(BuilderOptions::default());
    let filter = SearchFilter { identifier: Some("plate-.".into()), ..SearchFilter::default() };
    assert_eq!(svc.search(&filter, 0, 50).total, 0);
}

#[test]
fn window_applies_after_sort() {
    let svc = service(BuilderOptions::default());
    let page = svc.search(&SearchFilter::default(), 1, 1);
    assert_eq!(page.total, 3);
    assert_eq!(ids(&page.results), vec!["plate-2"]);
}

#[test]
fn listing_and_lookup_endpoints() {
    let svc = service(BuilderOptions::default());

    let archives = svc.list_archives(0, 50);
    assert_eq!(ids(&archives.results), vec!["Harvard", "Yerkes"]);
    assert_eq!(ids(&svc.archive_details("yerk").results), vec!["Yerkes"]);

    let harvard = svc.plates_in_archive("harv", 0, 50);
    assert_eq!(ids(&harvard.results), vec!["plate-2", "plate-10"]);

    match svc.plate_details("harvard", "PLATE-2") {
        PlateLookup::Found(record) => assert_eq!(record["identifier"], "plate-2"),
        PlateLookup::Missing(_) => panic!("plate-2 should be found"),
    }
    // exact identifier match: "plate-1" must not hit "plate-10"
    assert!(matches!(svc.plate_details("harvard", "plate-1"), PlateLookup::Missing(_)));
}

#[test]
fn load_documents_reads_arrays_objects_and_lines() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("a.json"), r#"[{"identifier": "a1"}, {"identifier": "a2"}]"#).unwrap();
    fs::write(dir.join("nested/b.json"), r#"{"identifier": "b1"}"#).unwrap();
    fs::write(dir.join("c.jsonl"), "{\"identifier\": \"c1\"}\n\n{\"identifier\": \"c2\"}\n").unwrap();
    fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let docs = load_documents(dir).expect("load");
    assert_eq!(ids(&docs), vec!["a1", "a2", "c1", "c2", "b1"]);

    let store = MemoryStore::open(&dir.join("a.json"), &dir.join("nested")).expect("open");
    assert_eq!(store.len(Collection::Plates), 2);
    assert_eq!(store.len(Collection::Archives), 1);
    assert_eq!(store.count(Collection::Plates, &Default::default()).unwrap(), 2);
}

#[test]
fn load_documents_reports_bad_json() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.json"), "{ not json").unwrap();
    let err = load_documents(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("broken.json"), "{err}");
}

#[test]
fn load_documents_rejects_missing_path() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("plates");
    let err = load_documents(&missing).unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{err}");

    fs::create_dir_all(tmp.path().join("archives")).unwrap();
    assert!(MemoryStore::open(&missing, &tmp.path().join("archives")).is_err());
}

#[test]
fn empty_directory_is_an_empty_collection() {
    let tmp = TempDir::new().unwrap();
    assert!(load_documents(tmp.path()).expect("load").is_empty());
}
