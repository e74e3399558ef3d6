//! Tests for versioned snapshots and content hashing.

use super::*;

#[test]
fn identical_text_hashes_identically() {
    let a = DocumentSnapshot::new(Uri::from("/app/page.html"), "<div></div>", 1);
    let b = DocumentSnapshot::new(Uri::from("/app/page.html"), "<div></div>", 2);
    assert_eq!(a.content_hash, b.content_hash);
}

#[test]
fn different_text_hashes_differently() {
    let a = DocumentSnapshot::new(Uri::from("/app/page.html"), "<div></div>", 1);
    let b = DocumentSnapshot::new(Uri::from("/app/page.html"), "<span></span>", 1);
    assert_ne!(a.content_hash, b.content_hash);
}

#[test]
fn text_in_clamps_to_document_bounds() {
    let snapshot = DocumentSnapshot::new(Uri::from("/app/page.html"), "hello", 1);
    assert_eq!(snapshot.text_in(TextSpan::new(1, 3)), "ell");
    assert_eq!(snapshot.text_in(TextSpan::new(3, 100)), "lo");
    assert_eq!(snapshot.text_in(TextSpan::new(100, 5)), "");
}
