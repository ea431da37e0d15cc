use std::fs;
use std::path::{Path, PathBuf};

use kwstage_fs::{CleanupRegistry, ensure_contained};
use tracing::debug;

use crate::error::{Error, Result};

/// Directory-name prefix for every staging sandbox under the temp root.
pub(crate) const SANDBOX_PREFIX: &str = "speech-sdk-keyword-";

pub(crate) struct Sandbox {
    /// Canonical staging directory, proven to live under the temp root.
    pub(crate) dir: PathBuf,
    /// True when the directory pre-existed; staging is then skipped and
    /// prior contents are trusted up to the final table check.
    pub(crate) reused: bool,
}

/// Resolve and create the staging directory for a validated name.
///
/// The temp root comes from the platform and is not overridable: the
/// escape proof is anchored to that specific root. The proof runs twice,
/// lexically before anything exists and on the canonical path afterwards,
/// so neither a hostile name nor a pre-planted symlink at the sandbox
/// path can redirect staging outside the root.
pub(crate) fn prepare_sandbox(name: &str, registry: &CleanupRegistry) -> Result<Sandbox> {
    let temp_root = std::env::temp_dir().canonicalize()?;
    let candidate = ensure_contained(&temp_root.join(format!("{SANDBOX_PREFIX}{name}")), &temp_root)?;

    if candidate.exists() {
        let dir = canonical_within(&candidate, &temp_root)?;
        debug!(dir = %dir.display(), "staging directory already exists, trusting prior contents");
        return Ok(Sandbox { dir, reused: true });
    }

    fs::create_dir_all(&candidate).map_err(|source| Error::DirectoryCreationFailed {
        path: candidate.clone(),
        source,
    })?;
    registry.register(&candidate);

    let dir = canonical_within(&candidate, &temp_root)?;
    Ok(Sandbox { dir, reused: false })
}

fn canonical_within(path: &Path, root: &Path) -> Result<PathBuf> {
    let canonical = path.canonicalize()?;
    if !canonical.starts_with(root) {
        return Err(Error::SandboxEscape {
            path: canonical,
            root: root.to_path_buf(),
        });
    }
    Ok(canonical)
}
