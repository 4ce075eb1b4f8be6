use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use goclens::resolve::{PathResolver, ResolverConfig};

/// Create a temporary Go workspace with a go.mod declaring `module_name`
/// and the given files (paths relative to the root). The caller must hold
/// onto `TempDir` to keep the workspace alive.
pub fn setup_workspace(module_name: &str, files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("go.mod"),
        format!("module {module_name}\n\ngo 1.21\n"),
    )
    .unwrap();
    for file in files {
        let path = dir.path().join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, "package x\n").unwrap();
    }
    dir
}

/// Resolver over the workspace with external-root strategies disabled.
pub fn workspace_resolver(root: &Path) -> Arc<PathResolver> {
    Arc::new(PathResolver::new(
        ResolverConfig::new(root).with_gopath(None),
    ))
}
