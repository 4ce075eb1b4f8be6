mod common;

use std::path::Path;

use goclens::model::Snapshot;
use goclens::profile;
use goclens::registry::CoverageRegistry;

fn snapshot_from(raw: &str) -> Snapshot {
    Snapshot::from_blocks(profile::parse(raw))
}

#[test]
fn query_after_update() {
    let dir = common::setup_workspace("example.org/proj", &[]);
    let registry = CoverageRegistry::new(common::workspace_resolver(dir.path()));

    registry.update(snapshot_from(
        "example.org/proj/main.go:8.13,9.6 1 1\n\
         example.org/proj/main.go:9.6,12.3 2 70\n\
         example.org/proj/h.go:15.1,16.10 3 0\n",
    ));

    // Exact key.
    let blocks = registry.query(Path::new("example.org/proj/main.go"));
    assert_eq!(blocks.len(), 2);

    // Suffix on base name: an editor's absolute path, not a snapshot key.
    let blocks = registry.query(Path::new("/home/dev/proj/h.go"));
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].execution_count, 0);

    // Unknown file: empty, not an error.
    assert!(registry.query(Path::new("/home/dev/proj/other.go")).is_empty());
}

#[test]
fn update_replaces_snapshot_wholesale() {
    let dir = common::setup_workspace("example.org/proj", &[]);
    let registry = CoverageRegistry::new(common::workspace_resolver(dir.path()));

    registry.update(snapshot_from("example.org/proj/a.go:1.1,2.2 1 1\n"));
    registry.update(snapshot_from("example.org/proj/b.go:1.1,2.2 1 1\n"));

    // The first snapshot's entry is gone, not merged.
    assert!(registry.query(Path::new("example.org/proj/a.go")).is_empty());
    assert_eq!(registry.query(Path::new("example.org/proj/b.go")).len(), 1);
}

#[test]
fn clear_empties_state() {
    let dir = common::setup_workspace("example.org/proj", &[]);
    let registry = CoverageRegistry::new(common::workspace_resolver(dir.path()));

    registry.update(snapshot_from("example.org/proj/a.go:1.1,2.2 1 1\n"));
    registry.clear();
    assert!(registry.query(Path::new("example.org/proj/a.go")).is_empty());
}

#[test]
fn query_resolves_workspace_files_opened_after_update() {
    let dir = common::setup_workspace("example.org/proj", &["sub/file.go"]);
    let registry = CoverageRegistry::new(common::workspace_resolver(dir.path()));

    registry.update(snapshot_from(
        "example.org/proj/sub/file.go:3.1,4.2 2 9\n",
    ));

    // A file opened after the snapshot was built still maps to its entry.
    let local = dir.path().join("sub").join("file.go");
    let blocks = registry.query(&local);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].execution_count, 9);
}
