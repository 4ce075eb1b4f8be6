//! Uniform in-memory representation of coverage data. The profile parser
//! produces `CoverageBlock`s which are grouped into a `Snapshot` and handed
//! to the registry; per-file aggregates are computed on demand.

use std::collections::HashMap;

/// One basic block from a coverage profile: a contiguous source range with
/// a statement count and an execution count. Per-block coverage is binary —
/// a block is either covered (entered at least once) or not.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CoverageBlock {
    /// Module-qualified source identifier as it appears in the report,
    /// e.g. `github.com/user/repo/main.go`. Not necessarily an on-disk path.
    pub module_path: String,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub num_statements: u32,
    pub execution_count: u64,
}

impl CoverageBlock {
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.execution_count > 0
    }
}

/// Aggregate over all blocks sharing one module path. Computed on demand
/// when summarizing a snapshot; not separately stored.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileCoverage {
    pub module_path: String,
    /// Blocks in profile input order, not sorted.
    pub blocks: Vec<CoverageBlock>,
}

impl FileCoverage {
    #[must_use]
    pub fn total_statements(&self) -> u64 {
        self.blocks.iter().map(|b| u64::from(b.num_statements)).sum()
    }

    #[must_use]
    pub fn covered_statements(&self) -> u64 {
        self.blocks
            .iter()
            .filter(|b| b.is_covered())
            .map(|b| u64::from(b.num_statements))
            .sum()
    }

    /// Statement coverage in percent, 0.0 when the file has no statements.
    #[must_use]
    pub fn coverage_percentage(&self) -> f64 {
        let total = self.total_statements();
        if total == 0 {
            0.0
        } else {
            self.covered_statements() as f64 / total as f64 * 100.0
        }
    }
}

/// The complete, atomically replaceable coverage state: module path ->
/// blocks, preserving first-seen key order. Key order matters because the
/// registry's suffix matching takes the first key that qualifies; that
/// tie-break is insertion-order-defined and nothing stronger.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    order: Vec<String>,
    blocks: HashMap<String, Vec<CoverageBlock>>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Group parsed blocks by module path, preserving the order in which
    /// module paths first appear and the input order of blocks within each.
    #[must_use]
    pub fn from_blocks(blocks: Vec<CoverageBlock>) -> Self {
        let mut snapshot = Self::new();
        for block in blocks {
            snapshot.push(block);
        }
        snapshot
    }

    pub fn push(&mut self, block: CoverageBlock) {
        if !self.blocks.contains_key(&block.module_path) {
            self.order.push(block.module_path.clone());
        }
        self.blocks
            .entry(block.module_path.clone())
            .or_default()
            .push(block);
    }

    #[must_use]
    pub fn get(&self, module_path: &str) -> Option<&[CoverageBlock]> {
        self.blocks.get(module_path).map(Vec::as_slice)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CoverageBlock])> {
        self.order
            .iter()
            .map(|key| (key.as_str(), self.blocks[key].as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn total_blocks(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }

    /// Per-file aggregates, sorted by coverage percentage descending.
    /// This is the presentation order used by coverage detail tables.
    #[must_use]
    pub fn file_coverages(&self) -> Vec<FileCoverage> {
        let mut files: Vec<FileCoverage> = self
            .iter()
            .map(|(path, blocks)| FileCoverage {
                module_path: path.to_string(),
                blocks: blocks.to_vec(),
            })
            .collect();
        files.sort_by(|a, b| {
            b.coverage_percentage().total_cmp(&a.coverage_percentage())
        });
        files
    }
}
