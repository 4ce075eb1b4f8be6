//! Owns the current coverage snapshot and answers "which blocks apply to
//! this local file" queries for viewers.
//!
//! The snapshot is replaced wholesale on every update; readers never see a
//! half-replaced state. Viewers subscribe per file with non-owning
//! references, so dropping a viewer needs no cooperation from the registry.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock, Weak};

use crate::model::{CoverageBlock, Snapshot};
use crate::resolve::PathResolver;

/// Implemented by anything that renders coverage for one file and wants to
/// be told when the snapshot changes.
pub trait CoverageListener: Send + Sync {
    /// Called with the blocks now applying to the listener's file. An empty
    /// slice means the file has no known coverage.
    fn coverage_changed(&self, local_path: &Path, blocks: &[CoverageBlock]);
}

pub struct CoverageRegistry {
    resolver: Arc<PathResolver>,
    snapshot: RwLock<Snapshot>,
    listeners: Mutex<Vec<(PathBuf, Weak<dyn CoverageListener>)>>,
}

impl CoverageRegistry {
    pub fn new(resolver: Arc<PathResolver>) -> Self {
        Self {
            resolver,
            snapshot: RwLock::new(Snapshot::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Atomically replace the whole snapshot, then refresh every live
    /// listener. When updates race, the last replace wins.
    pub fn update(&self, snapshot: Snapshot) {
        log::info!(
            "coverage snapshot updated: {} files, {} blocks",
            snapshot.len(),
            snapshot.total_blocks()
        );
        *self.snapshot.write().unwrap() = snapshot;
        self.notify_all();
    }

    /// Drop all coverage state and tell listeners they have zero blocks.
    pub fn clear(&self) {
        *self.snapshot.write().unwrap() = Snapshot::new();
        self.notify_all();
    }

    /// Blocks applying to a concrete local file, in snapshot order.
    ///
    /// Matching order: exact key, then suffix (first snapshot key ending in
    /// the full path or in its file name — insertion order decides ties),
    /// then reverse resolution of each remaining key through the resolver.
    /// No match means no known coverage, represented as an empty vec.
    pub fn query(&self, local_path: &Path) -> Vec<CoverageBlock> {
        let snapshot = self.snapshot.read().unwrap();
        let path_str = local_path.to_string_lossy();

        if let Some(blocks) = snapshot.get(&path_str) {
            return blocks.to_vec();
        }

        let file_name = local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        for (key, blocks) in snapshot.iter() {
            let suffix_hit = key.ends_with(path_str.as_ref())
                || file_name.as_deref().is_some_and(|name| key.ends_with(name));
            if suffix_hit {
                return blocks.to_vec();
            }
        }

        for (key, blocks) in snapshot.iter() {
            if let Some(resolved) = self.resolver.resolve(key) {
                if resolved == local_path {
                    return blocks.to_vec();
                }
            }
        }

        Vec::new()
    }

    /// Subscribe a listener for one file. Only a weak reference is kept.
    pub fn watch(&self, local_path: impl Into<PathBuf>, listener: &Arc<dyn CoverageListener>) {
        let mut listeners = self.listeners.lock().unwrap();
        listeners.push((local_path.into(), Arc::downgrade(listener)));
    }

    /// Remove subscriptions for a file (and prune dead listeners).
    pub fn unwatch(&self, local_path: &Path) {
        let mut listeners = self.listeners.lock().unwrap();
        listeners.retain(|(path, listener)| {
            path != local_path && listener.strong_count() > 0
        });
    }

    fn notify_all(&self) {
        // Snapshot the listener list so queries run without the lock held.
        let targets: Vec<(PathBuf, Arc<dyn CoverageListener>)> = {
            let mut listeners = self.listeners.lock().unwrap();
            listeners.retain(|(_, listener)| listener.strong_count() > 0);
            listeners
                .iter()
                .filter_map(|(path, listener)| {
                    listener.upgrade().map(|listener| (path.clone(), listener))
                })
                .collect()
        };

        for (path, listener) in targets {
            let blocks = self.query(&path);
            listener.coverage_changed(&path, &blocks);
        }
    }
}
