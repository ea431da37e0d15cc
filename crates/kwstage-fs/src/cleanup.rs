use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

static EXIT_REGISTRY: Lazy<CleanupRegistry> = Lazy::new(CleanupRegistry::new);

/// The process-lifetime registry behind all staging calls.
pub fn exit_registry() -> &'static CleanupRegistry {
    &EXIT_REGISTRY
}

/// Paths to delete, best effort, when the process shuts down.
///
/// Staging appends every directory and file it creates. The embedding
/// application drains the registry from its shutdown path via [`purge`];
/// a killed process never drains, which is why staging re-checks the
/// output file instead of trusting leftover directories blindly.
///
/// [`purge`]: CleanupRegistry::purge
#[derive(Debug, Default)]
pub struct CleanupRegistry {
    paths: Mutex<Vec<PathBuf>>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, path: impl Into<PathBuf>) {
        self.lock().push(path.into());
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().iter().any(|registered| registered == path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove every registered path, later registrations first, so files
    /// staged into a directory go before the directory itself.
    ///
    /// Individual removal failures are ignored; the registry is emptied
    /// either way. Returns how many paths were actually removed.
    pub fn purge(&self) -> usize {
        let paths = std::mem::take(&mut *self.lock());
        let mut removed = 0;
        for path in paths.iter().rev() {
            let result = if path.is_dir() {
                std::fs::remove_dir_all(path)
            } else {
                std::fs::remove_file(path)
            };
            if result.is_ok() {
                removed += 1;
            }
        }
        removed
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
