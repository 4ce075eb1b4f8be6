//! Maps module-qualified paths from a coverage profile (e.g.
//! `github.com/user/repo/main.go`) onto concrete files in the local
//! workspace.
//!
//! Resolution tries an ordered list of strategies; the first hit wins and is
//! cached. A miss is `None`, never an error — it means "no local file for
//! this module path right now".

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Directories never descended into by the filename search.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    ".git",
    ".gradle",
    ".idea",
    "build",
    "node_modules",
    "target",
    "vendor",
];

/// How deep the filename search walks below the workspace root.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Configuration for a [`PathResolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub workspace_root: PathBuf,
    /// External module root; `None` disables the `<root>/src` and
    /// `<root>/pkg/mod` strategies.
    pub gopath: Option<PathBuf>,
    pub skip_dirs: Vec<String>,
    pub max_depth: usize,
}

impl ResolverConfig {
    /// Defaults: `GOPATH` from the environment, the standard skip set, and
    /// a depth bound of 10.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            gopath: std::env::var_os("GOPATH").map(PathBuf::from),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn with_gopath(mut self, gopath: Option<PathBuf>) -> Self {
        self.gopath = gopath;
        self
    }
}

#[derive(Default)]
struct ResolverState {
    /// Successful resolutions, module path -> local file. Entries are only
    /// dropped wholesale by `clear_cache`; a cached path that no longer
    /// exists falls through to the strategies again.
    cache: HashMap<String, PathBuf>,
    /// From the `module <name>` line of `<root>/go.mod`; `None` when the
    /// file is absent, which only disables the workspace-relative strategy.
    module_name: Option<String>,
}

pub struct PathResolver {
    config: ResolverConfig,
    state: Mutex<ResolverState>,
    /// Counts invocations of the recursive filename search. Logged, and read
    /// by tests to confirm cache hits skip the file system.
    fs_searches: AtomicU64,
}

impl PathResolver {
    pub fn new(config: ResolverConfig) -> Self {
        let module_name = read_module_name(&config.workspace_root);
        log::info!(
            "workspace module name: {}",
            module_name.as_deref().unwrap_or("<none>")
        );
        Self {
            config,
            state: Mutex::new(ResolverState {
                cache: HashMap::new(),
                module_name,
            }),
            fs_searches: AtomicU64::new(0),
        }
    }

    /// Resolve a module path to a local file, or `None` if no strategy
    /// produced an existing file.
    pub fn resolve(&self, module_path: &str) -> Option<PathBuf> {
        {
            let state = self.state.lock().unwrap();
            if let Some(cached) = state.cache.get(module_path) {
                if cached.is_file() {
                    log::debug!("cache hit: {module_path} -> {}", cached.display());
                    return Some(cached.clone());
                }
                log::debug!("cached path vanished, re-resolving: {module_path}");
            }
        }

        let strategies: [(&str, fn(&Self, &str) -> Option<PathBuf>); 4] = [
            ("workspace-relative", Self::resolve_in_workspace),
            ("filename-search", Self::resolve_by_filename),
            ("gopath-src", Self::resolve_in_gopath_src),
            ("gopath-mod-cache", Self::resolve_in_mod_cache),
        ];

        for (name, strategy) in strategies {
            if let Some(path) = strategy(self, module_path) {
                log::debug!("resolved via {name}: {module_path} -> {}", path.display());
                let mut state = self.state.lock().unwrap();
                state.cache.insert(module_path.to_string(), path.clone());
                return Some(path);
            }
        }

        log::debug!("unresolved module path: {module_path}");
        None
    }

    /// Drop all cached resolutions and re-read the workspace module name.
    /// Call whenever the workspace's module identity may have changed.
    pub fn clear_cache(&self) {
        let module_name = read_module_name(&self.config.workspace_root);
        let mut state = self.state.lock().unwrap();
        state.cache.clear();
        state.module_name = module_name;
    }

    /// Strategy 1: if the module path starts with the workspace module name,
    /// the remainder is a path relative to the workspace root.
    fn resolve_in_workspace(&self, module_path: &str) -> Option<PathBuf> {
        let state = self.state.lock().unwrap();
        let module_name = state.module_name.as_deref()?;
        let rest = module_path.strip_prefix(module_name)?;
        drop(state);

        let relative = rest.trim_start_matches('/');
        existing_file(self.config.workspace_root.join(relative))
    }

    /// Strategy 2: depth-bounded search of the workspace tree for a file
    /// with the same name as the module path's last segment. No ranking
    /// among multiple matches; the first one in directory order wins.
    fn resolve_by_filename(&self, module_path: &str) -> Option<PathBuf> {
        let file_name = module_path.rsplit('/').next()?;
        if file_name.is_empty() {
            return None;
        }
        let n = self.fs_searches.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("filename search #{n}: {file_name}");
        self.search_file(&self.config.workspace_root, file_name, 0)
    }

    fn search_file(&self, dir: &Path, file_name: &str, depth: usize) -> Option<PathBuf> {
        if depth > self.config.max_depth {
            return None;
        }
        if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
            if self.config.skip_dirs.iter().any(|skip| skip == name) {
                return None;
            }
        }

        let entries = std::fs::read_dir(dir).ok()?;
        let mut subdirs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() {
                if entry.file_name().to_str() == Some(file_name) {
                    return Some(path);
                }
            } else if path.is_dir() {
                subdirs.push(path);
            }
        }

        subdirs
            .iter()
            .find_map(|sub| self.search_file(sub, file_name, depth + 1))
    }

    /// Strategy 3: `<gopath>/src/<modulePath>` verbatim.
    fn resolve_in_gopath_src(&self, module_path: &str) -> Option<PathBuf> {
        let gopath = self.config.gopath.as_ref()?;
        existing_file(gopath.join("src").join(module_path))
    }

    /// Strategy 4: the module cache keeps version-suffixed directories under
    /// `<gopath>/pkg/mod/<domain>/`; try the remainder of the module path
    /// under each, in directory-listing order.
    fn resolve_in_mod_cache(&self, module_path: &str) -> Option<PathBuf> {
        let gopath = self.config.gopath.as_ref()?;
        let (domain, rest) = module_path.split_once('/')?;

        let domain_dir = gopath.join("pkg").join("mod").join(domain);
        let entries = std::fs::read_dir(&domain_dir).ok()?;
        for entry in entries.flatten() {
            let version_dir = entry.path();
            if !version_dir.is_dir() {
                continue;
            }
            if let Some(path) = existing_file(version_dir.join(rest)) {
                return Some(path);
            }
        }
        None
    }
}

fn existing_file(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Read the workspace module name from `<root>/go.mod`. A missing or
/// unreadable file is not an error.
fn read_module_name(workspace_root: &Path) -> Option<String> {
    let go_mod = workspace_root.join("go.mod");
    let content = match std::fs::read_to_string(&go_mod) {
        Ok(content) => content,
        Err(err) => {
            log::debug!("no readable go.mod at {}: {err}", go_mod.display());
            return None;
        }
    };

    content.lines().find_map(|line| {
        line.trim()
            .strip_prefix("module ")
            .map(|name| name.trim().to_string())
    })
}
