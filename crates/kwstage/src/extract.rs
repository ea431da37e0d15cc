use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use kwstage_fs::{CleanupRegistry, copy_reader, ensure_contained, replace_file};
use tracing::debug;

use crate::TABLE_FILE_NAME;
use crate::error::{Error, Result};

/// Longest entry name accepted from an archive, in bytes.
const MAX_ENTRY_NAME: usize = 128;

/// Extract every regular-file entry of a zip payload into the sandbox.
///
/// Directory entries are skipped outright; only regular files under the
/// sandbox root are needed, so directories stay implicit. One malformed
/// or unsafe entry fails the whole operation: an archive that carries one
/// is untrusted as a whole.
pub(crate) fn extract_archive<R: Read + Seek>(
    reader: R,
    sandbox: &Path,
    registry: &CleanupRegistry,
) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader)
        .map_err(|e| Error::InvalidEntry(format!("malformed zip payload: {e}")))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::InvalidEntry(format!("malformed zip entry #{index}: {e}")))?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        validate_entry_name(&name)?;
        let target = entry_target(sandbox, &name)?;

        registry.register(&target);
        let mut output = replace_file(&target)?;
        let bytes = copy_reader(&mut entry, &mut output).map_err(|source| Error::ExtractionFailed {
            path: target.clone(),
            source,
        })?;
        debug!(entry = %name, bytes, "staged archive entry");
    }

    Ok(())
}

/// Copy a non-archived payload verbatim to the fixed table filename.
///
/// No entry-name validation applies: the output name is fixed and never
/// derived from payload content.
pub(crate) fn write_raw<R: Read>(
    reader: &mut R,
    sandbox: &Path,
    registry: &CleanupRegistry,
) -> Result<()> {
    let target = sandbox.join(TABLE_FILE_NAME);
    registry.register(&target);

    let mut output = replace_file(&target)?;
    let bytes = copy_reader(reader, &mut output).map_err(|source| Error::ExtractionFailed {
        path: target.clone(),
        source,
    })?;
    debug!(bytes, "staged raw table payload");
    Ok(())
}

fn validate_entry_name(name: &str) -> Result<()> {
    if name.len() > MAX_ENTRY_NAME {
        return Err(Error::InvalidEntry(format!(
            "entry name of {} bytes exceeds {MAX_ENTRY_NAME}",
            name.len()
        )));
    }
    if name.contains("..") {
        return Err(Error::InvalidEntry(format!(
            "entry '{name}' contains a parent-directory sequence"
        )));
    }
    if name.trim().is_empty() {
        return Err(Error::InvalidEntry("entry has a blank name".to_string()));
    }
    Ok(())
}

/// Join the sandbox with an already-validated entry name and re-prove
/// containment; the length and `..` filter alone does not cover absolute
/// entry names.
fn entry_target(sandbox: &Path, name: &str) -> Result<PathBuf> {
    Ok(ensure_contained(&sandbox.join(name), sandbox)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_entry_names_pass() {
        for name in ["kws.table", "extra.bin", "weights", "a b c.dat"] {
            assert!(validate_entry_name(name).is_ok(), "rejected {name:?}");
        }
    }

    #[test]
    fn oversized_entry_name_fails() {
        let name = "a".repeat(MAX_ENTRY_NAME + 1);
        assert!(matches!(validate_entry_name(&name), Err(Error::InvalidEntry(_))));
    }

    #[test]
    fn exactly_max_length_passes() {
        let name = "a".repeat(MAX_ENTRY_NAME);
        assert!(validate_entry_name(&name).is_ok());
    }

    #[test]
    fn traversal_entry_name_fails_before_path_resolution() {
        assert!(matches!(
            validate_entry_name("../../etc/passwd"),
            Err(Error::InvalidEntry(_))
        ));
    }

    #[test]
    fn embedded_dotdot_fails() {
        assert!(matches!(validate_entry_name("a..b"), Err(Error::InvalidEntry(_))));
    }

    #[test]
    fn blank_entry_name_fails() {
        for name in ["", "   "] {
            assert!(matches!(validate_entry_name(name), Err(Error::InvalidEntry(_))), "accepted {name:?}");
        }
    }

    #[test]
    fn absolute_entry_name_escapes() {
        let result = entry_target(Path::new("/tmp/speech-sdk-keyword-x"), "/etc/passwd");
        assert!(matches!(result, Err(Error::SandboxEscape { .. })));
    }

    #[test]
    fn relative_entry_name_is_contained() {
        let target = entry_target(Path::new("/tmp/speech-sdk-keyword-x"), "kws.table").unwrap();
        assert_eq!(target, Path::new("/tmp/speech-sdk-keyword-x/kws.table"));
    }
}
