//! Tests for snapshot versioning in the document store.

use super::*;

#[test]
fn first_upsert_starts_at_version_one() {
    let mut store = DocumentStore::new();
    let snapshot = store.upsert(Uri::from("/app/page.html"), "<div></div>");
    assert_eq!(snapshot.version, 1);
    assert_eq!(&*snapshot.text, "<div></div>");
}

#[test]
fn changed_text_bumps_the_version() {
    let mut store = DocumentStore::new();
    let uri = Uri::from("/app/page.html");
    store.upsert(uri.clone(), "<div></div>");
    let snapshot = store.upsert(uri, "<span></span>");
    assert_eq!(snapshot.version, 2);
}

#[test]
fn identical_text_keeps_the_snapshot_untouched() {
    let mut store = DocumentStore::new();
    let uri = Uri::from("/app/page.html");
    let first_hash = store.upsert(uri.clone(), "<div></div>").content_hash;
    let snapshot = store.upsert(uri, "<div></div>");
    assert_eq!(snapshot.version, 1, "no-op upsert must not bump the version");
    assert_eq!(snapshot.content_hash, first_hash);
}

#[test]
fn remove_forgets_the_document() {
    let mut store = DocumentStore::new();
    let uri = Uri::from("/app/page.html");
    store.upsert(uri.clone(), "<div></div>");
    assert!(store.contains(&uri));
    assert!(store.remove(&uri).is_some());
    assert!(!store.contains(&uri));
    assert!(store.get(&uri).is_none());
}
