use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve `.` and `..` components lexically, without touching the
/// filesystem.
fn resolve_lexical(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Prove that `candidate` stays under `root` after lexical resolution.
///
/// Returns the resolved path on success. `root` must already be in
/// canonical form; the proof holds for paths that do not exist yet. A
/// `join` with an absolute operand replaces the base outright and is
/// caught here as well.
pub fn ensure_contained(candidate: &Path, root: &Path) -> Result<PathBuf> {
    let resolved = resolve_lexical(candidate);
    if !resolved.starts_with(root) {
        return Err(Error::Escape {
            path: resolved,
            root: root.to_path_buf(),
        });
    }
    Ok(resolved)
}
