use goclens::model::Snapshot;
use goclens::profile;

#[test]
fn parse_and_group() {
    let raw = "a/b/main.go:8.13,9.6 1 1\n\
               a/b/main.go:9.6,12.3 2 70\n\
               a/b/h.go:15.1,16.10 3 0\n";

    let blocks = profile::parse(raw);
    assert_eq!(blocks.len(), 3);

    let snapshot = Snapshot::from_blocks(blocks);
    assert_eq!(snapshot.len(), 2);

    let files = snapshot.file_coverages();
    let main = files
        .iter()
        .find(|f| f.module_path == "a/b/main.go")
        .unwrap();
    assert_eq!(main.total_statements(), 3);
    assert_eq!(main.covered_statements(), 3);
    assert!((main.coverage_percentage() - 100.0).abs() < 1e-9);

    let handler = files.iter().find(|f| f.module_path == "a/b/h.go").unwrap();
    assert_eq!(handler.total_statements(), 3);
    assert_eq!(handler.covered_statements(), 0);
    assert_eq!(handler.coverage_percentage(), 0.0);
}

#[test]
fn grouping_preserves_every_well_formed_line() {
    let raw = "a/x.go:1.1,2.2 1 1\n\
               garbage line\n\
               b/y.go:3.1,4.2 2 0\n\
               a/x.go:5.1,6.2 1 4\n\
               \n";
    let blocks = profile::parse(raw);
    let well_formed = 3;
    assert_eq!(blocks.len(), well_formed);

    let snapshot = Snapshot::from_blocks(blocks);
    let grouped_total: usize = snapshot.iter().map(|(_, blocks)| blocks.len()).sum();
    assert_eq!(grouped_total, well_formed);
}

#[test]
fn reparse_is_structurally_equal() {
    let raw = "a/b/main.go:8.13,9.6 1 1\nbroken\na/b/h.go:15.1,16.10 3 0\n";
    assert_eq!(profile::parse(raw), profile::parse(raw));
}

#[test]
fn server_url_extraction() {
    assert_eq!(
        profile::extract_server_url("[goc] goc server started: http://127.0.0.1:49598"),
        Some("http://127.0.0.1:49598".to_string())
    );
    assert_eq!(profile::extract_server_url("normal output"), None);
}
