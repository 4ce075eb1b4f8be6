//! Parser for the raw profile text served by a goc-style aggregation
//! server, plus the scanner that spots the server's startup announcement in
//! process output.
//!
//! Format, one block per line:
//!   <modulePath>:<startLine>.<startCol>,<endLine>.<endCol> <numStmt> <count>
//!
//! e.g. `example.org/pkg/main.go:8.13,9.6 1 1`
//!
//! Parsing is line-tolerant: anything that fails the grammar (including the
//! `mode:` header Go tooling emits) is skipped with a diagnostic, never a
//! hard error.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::CoverageBlock;

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:]+):(\d+)\.(\d+),(\d+)\.(\d+)\s+(\d+)\s+(\d+)$").unwrap()
});

/// Matches an aggregation-server announcement line, e.g.
/// `[goc] goc server started: http://127.0.0.1:49598`
static SERVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]+\][^\r\n]*?\bstarted:\s+([a-z][a-z0-9+.-]*://\S+:\d+)").unwrap()
});

/// Parse raw profile text into blocks, in input line order.
///
/// Blank lines are skipped silently. Malformed lines and lines whose
/// numeric fields do not fit their types are skipped with a log diagnostic.
#[must_use]
pub fn parse(raw: &str) -> Vec<CoverageBlock> {
    let mut blocks = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = BLOCK_RE.captures(line) else {
            log::debug!("skipping non-matching profile line: {line}");
            continue;
        };

        match block_from_captures(&caps) {
            Some(block) => blocks.push(block),
            None => log::warn!("skipping profile line with unparsable numbers: {line}"),
        }
    }

    blocks
}

fn block_from_captures(caps: &regex::Captures<'_>) -> Option<CoverageBlock> {
    Some(CoverageBlock {
        module_path: caps[1].to_string(),
        start_line: caps[2].parse().ok()?,
        start_col: caps[3].parse().ok()?,
        end_line: caps[4].parse().ok()?,
        end_col: caps[5].parse().ok()?,
        num_statements: caps[6].parse().ok()?,
        execution_count: caps[7].parse().ok()?,
    })
}

/// Scan arbitrary process output for an aggregation-server announcement and
/// return the first URL found.
///
/// Stateless: callers feed every new chunk of output through this and decide
/// themselves whether to remember a previously detected address.
#[must_use]
pub fn extract_server_url(output: &str) -> Option<String> {
    SERVER_RE
        .captures(output)
        .map(|caps| caps[1].to_string())
}
