//! Command handler functions for the goclens CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::fmt::Write;

use anyhow::Result;

use crate::goc::ProfileSource;
use crate::model::Snapshot;
use crate::profile;
use crate::resolve::PathResolver;

/// Parse profile text and render the per-file coverage table (or JSON).
pub fn cmd_report(raw: &str, json: bool) -> Result<String> {
    let blocks = profile::parse(raw);
    let snapshot = Snapshot::from_blocks(blocks);
    let files = snapshot.file_coverages();

    if json {
        return Ok(serde_json::to_string_pretty(&files)? + "\n");
    }

    if files.is_empty() {
        return Ok("No coverage blocks in profile.\n".to_string());
    }

    let mut out = String::new();
    writeln!(
        out,
        "{:<60} {:>8} {:>8} {:>8}",
        "FILE", "STMTS", "COVERED", "RATE"
    )
    .unwrap();
    writeln!(out, "{}", "-".repeat(88)).unwrap();
    for f in &files {
        writeln!(
            out,
            "{:<60} {:>8} {:>8} {:>7.1}%",
            f.module_path,
            f.total_statements(),
            f.covered_statements(),
            f.coverage_percentage()
        )
        .unwrap();
    }
    Ok(out)
}

/// Resolve one module path against the workspace.
pub fn cmd_resolve(resolver: &PathResolver, module_path: &str) -> String {
    match resolver.resolve(module_path) {
        Some(path) => format!("{}\n", path.display()),
        None => format!("not found: {module_path}\n"),
    }
}

/// Fetch raw profile text from a source (goc subprocess or file). Returns
/// the library error so callers can tell the no-data-yet case apart.
pub fn cmd_fetch(source: &dyn ProfileSource) -> crate::error::Result<String> {
    source.fetch_profile()
}

/// Scan process output for the aggregation-server announcement line.
pub fn cmd_server_url(output: &str) -> String {
    match profile::extract_server_url(output) {
        Some(url) => format!("{url}\n"),
        None => "not found\n".to_string(),
    }
}
