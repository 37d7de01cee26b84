//! Selection Integration Tests
//!
//! Exercises the selector against a metadata file on disk, covering the
//! documented filtering, ordering, and truncation behavior.

use modcv::engine::{select, EngineError, FilterSpec};
use modcv::MetadataStore;
use std::path::PathBuf;
use tempfile::TempDir;

const METADATA: &str = r#"
experience:
  a_industry:
    tags: [full_cv]
    priority: 2
  b_research:
    tags: [full_cv, academic]
    priority: 1
  c_internship:
    tags: [short_cv]
    priority: 1
projects:
  z_archived:
    tags: [full_cv]
    priority: 5
education: {}
"#;

async fn load_store(temp: &TempDir) -> MetadataStore {
    let path: PathBuf = temp.path().join("unit_metadata.yaml");
    tokio::fs::write(&path, METADATA).await.unwrap();
    MetadataStore::load(&path).await.unwrap()
}

#[tokio::test]
async fn unfiltered_selection_is_all_units_sorted() {
    let temp = TempDir::new().unwrap();
    let store = load_store(&temp).await;

    let ids = select(&store, &FilterSpec::new("experience")).unwrap();
    assert_eq!(ids, vec!["b_research", "c_internship", "a_industry"]);
}

#[tokio::test]
async fn include_tag_selects_matching_units() {
    let temp = TempDir::new().unwrap();
    let store = load_store(&temp).await;

    let spec = FilterSpec::new("experience").include(["academic"]);
    assert_eq!(select(&store, &spec).unwrap(), vec!["b_research"]);
}

#[tokio::test]
async fn max_items_keeps_highest_priority() {
    let temp = TempDir::new().unwrap();
    let store = load_store(&temp).await;

    // priority 1 beats priority 2 even though a_industry sorts first by id
    let spec = FilterSpec::new("experience")
        .include(["full_cv"])
        .max_items(1);
    assert_eq!(select(&store, &spec).unwrap(), vec!["b_research"]);
}

#[tokio::test]
async fn exclude_filters_out_units() {
    let temp = TempDir::new().unwrap();
    let store = load_store(&temp).await;

    let spec = FilterSpec::new("experience").exclude(["short_cv"]);
    assert_eq!(
        select(&store, &spec).unwrap(),
        vec!["b_research", "a_industry"]
    );
}

#[tokio::test]
async fn exclude_wins_when_unit_matches_both() {
    let temp = TempDir::new().unwrap();
    let store = load_store(&temp).await;

    // b_research carries both tags and must be dropped
    let spec = FilterSpec::new("experience")
        .include(["full_cv", "academic"])
        .exclude(["academic"]);
    assert_eq!(select(&store, &spec).unwrap(), vec!["a_industry"]);
}

#[tokio::test]
async fn limited_selection_is_prefix_of_unlimited() {
    let temp = TempDir::new().unwrap();
    let store = load_store(&temp).await;

    let unlimited = select(&store, &FilterSpec::new("experience")).unwrap();

    for k in 0..=unlimited.len() + 1 {
        let limited = select(&store, &FilterSpec::new("experience").max_items(k)).unwrap();
        let expected_len = k.min(unlimited.len());
        assert_eq!(limited.len(), expected_len);
        assert_eq!(limited[..], unlimited[..expected_len]);
    }
}

#[tokio::test]
async fn unknown_tag_yields_empty_not_error() {
    let temp = TempDir::new().unwrap();
    let store = load_store(&temp).await;

    let spec = FilterSpec::new("projects").include(["current"]);
    assert!(select(&store, &spec).unwrap().is_empty());
}

#[tokio::test]
async fn empty_category_yields_empty() {
    let temp = TempDir::new().unwrap();
    let store = load_store(&temp).await;

    assert!(select(&store, &FilterSpec::new("education"))
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn unknown_category_is_category_not_found() {
    let temp = TempDir::new().unwrap();
    let store = load_store(&temp).await;

    let err = select(&store, &FilterSpec::new("awards")).unwrap_err();
    assert!(matches!(
        err,
        EngineError::CategoryNotFound { ref category } if category == "awards"
    ));
}
