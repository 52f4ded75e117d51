#[path = "../common/mod.rs"]
mod common;

use autoblog::catalog::{Catalog, CatalogError};
use common::{product_json, write_product};
use std::fs;
use tempfile::tempdir;

#[test]
fn lists_json_stems_in_order() {
    let dir = tempdir().expect("Failed to create tempdir");
    write_product(dir.path(), "zeta", product_json("Zeta", "gut", &[]));
    write_product(dir.path(), "alpha", product_json("Alpha", "teeth", &[]));
    fs::write(dir.path().join("notes.txt"), "ignore me").expect("Failed to write file");

    let catalog = Catalog::new(dir.path()).expect("Failed to open catalog");

    assert_eq!(catalog.ids().expect("Failed to list"), vec!["alpha", "zeta"]);
}

#[test]
fn empty_directory_lists_nothing() {
    let dir = tempdir().expect("Failed to create tempdir");

    let catalog = Catalog::new(dir.path()).expect("Failed to open catalog");

    assert!(catalog.ids().expect("Failed to list").is_empty());
}

#[test]
fn missing_directory_is_rejected() {
    let dir = tempdir().expect("Failed to create tempdir");

    let err = Catalog::new(dir.path().join("nope")).expect_err("Expected missing directory");

    assert!(matches!(err, CatalogError::MissingDirectory(_)));
}

#[test]
fn loads_record_with_defaults() {
    let dir = tempdir().expect("Failed to create tempdir");
    write_product(
        dir.path(),
        "glucofit",
        serde_json::json!({
            "product_name": "GlucoFit",
            "affiliate_link": "http://x/a",
            "image_urls": ["  http://img/1.jpg ", ""],
        }),
    );

    let record = Catalog::new(dir.path())
        .expect("Failed to open catalog")
        .load("glucofit")
        .expect("Failed to load record");

    assert_eq!(record.id, "glucofit");
    assert_eq!(record.name, "GlucoFit");
    assert_eq!(record.niche, "General");
    assert_eq!(record.target_keywords, "health enthusiasts");
    assert_eq!(record.affiliate_link, "http://x/a");
    assert_eq!(record.image_urls, vec!["http://img/1.jpg"]);
}

#[test]
fn malformed_record_reports_path() {
    let dir = tempdir().expect("Failed to create tempdir");
    fs::write(dir.path().join("broken.json"), r#"{"niche": "gut"}"#)
        .expect("Failed to write file");

    let err = Catalog::new(dir.path())
        .expect("Failed to open catalog")
        .load("broken")
        .expect_err("Expected invalid record");

    match err {
        CatalogError::InvalidRecord { path, .. } => assert!(path.ends_with("broken.json")),
        other => panic!("Unexpected error: {other:?}"),
    }
}
