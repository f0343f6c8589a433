//! End-to-end checks of the freshness policy against a real folder.
//!
//! These drive the same decision the search command makes (rebuild when
//! the index is missing or the manifest is stale) without touching the
//! embeddings endpoint.

use pdfseek::{IndexStore, manifest};

/// The decision the orchestration layer makes before every query.
fn needs_rebuild(store: &IndexStore) -> bool {
    !store.has_index() || manifest::is_stale(store.folder()).unwrap()
}

/// Stand-in for a completed rebuild: the index artifact and the manifest
/// record are written together.
fn simulate_rebuild(store: &IndexStore) {
    std::fs::write(store.index_path(), "index bytes").unwrap();
    let current = manifest::compute_folder_manifest(store.folder()).unwrap();
    manifest::save_manifest(store.folder(), &current).unwrap();
}

#[test]
fn folder_lifecycle() {
    let tmp = tempfile::tempdir().unwrap();
    let store = IndexStore::resolve(tmp.path()).unwrap();

    // Folder starts with a single document.
    std::fs::write(tmp.path().join("a.pdf"), "X").unwrap();

    // Nothing persisted yet: first invocation must rebuild.
    assert!(needs_rebuild(&store));
    simulate_rebuild(&store);
    assert!(!needs_rebuild(&store));

    // A new document appears.
    std::fs::write(tmp.path().join("b.pdf"), "Y").unwrap();
    assert!(needs_rebuild(&store));

    simulate_rebuild(&store);
    assert!(!needs_rebuild(&store));

    let stored = manifest::load_manifest(tmp.path()).unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.contains_key("a.pdf"));
    assert!(stored.contains_key("b.pdf"));

    // One document is edited in place.
    std::fs::write(tmp.path().join("a.pdf"), "Z").unwrap();
    assert!(needs_rebuild(&store));
    simulate_rebuild(&store);

    // One document is removed.
    std::fs::remove_file(tmp.path().join("b.pdf")).unwrap();
    assert!(needs_rebuild(&store));
    simulate_rebuild(&store);

    // One document is renamed without changing its bytes.
    std::fs::rename(tmp.path().join("a.pdf"), tmp.path().join("c.pdf")).unwrap();
    assert!(needs_rebuild(&store));
    simulate_rebuild(&store);
    assert!(!needs_rebuild(&store));
}

#[test]
fn index_without_manifest_forces_rebuild() {
    let tmp = tempfile::tempdir().unwrap();
    let store = IndexStore::resolve(tmp.path()).unwrap();
    std::fs::write(tmp.path().join("a.pdf"), "X").unwrap();

    // An index artifact exists, but no manifest was ever saved (for
    // example, a rebuild interrupted between the two writes).
    std::fs::write(store.index_path(), "index bytes").unwrap();
    assert!(needs_rebuild(&store));
}

#[test]
fn manifest_without_index_forces_rebuild() {
    let tmp = tempfile::tempdir().unwrap();
    let store = IndexStore::resolve(tmp.path()).unwrap();
    std::fs::write(tmp.path().join("a.pdf"), "X").unwrap();

    let current = manifest::compute_folder_manifest(tmp.path()).unwrap();
    manifest::save_manifest(tmp.path(), &current).unwrap();

    // The manifest is fresh, but the index artifact is gone.
    assert!(!manifest::is_stale(tmp.path()).unwrap());
    assert!(needs_rebuild(&store));
}

#[test]
fn index_artifacts_do_not_perturb_the_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let store = IndexStore::resolve(tmp.path()).unwrap();
    std::fs::write(tmp.path().join("a.pdf"), "X").unwrap();

    simulate_rebuild(&store);
    assert!(!needs_rebuild(&store));

    // Rewriting the index and manifest files themselves must not read as
    // a document change; only *.pdf entries are fingerprinted.
    simulate_rebuild(&store);
    assert!(!needs_rebuild(&store));
}
