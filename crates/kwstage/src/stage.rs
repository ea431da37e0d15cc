use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use kwstage_fs::exit_registry;
use tracing::debug;

use crate::TABLE_FILE_NAME;
use crate::detect::sniff_archive;
use crate::error::{Error, Result};
use crate::extract::{extract_archive, write_raw};
use crate::name::validate_name;
use crate::sandbox::prepare_sandbox;

/// Validated handle to a staged model table.
///
/// Holds the absolute path of a `kws.table` that existed as a regular
/// file when staging finished; the bytes behind it are opaque here and
/// consumed by the native recognition engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedModel {
    table: PathBuf,
}

impl StagedModel {
    /// Absolute path of the staged table file.
    pub fn table_path(&self) -> &Path {
        &self.table
    }

    pub fn into_table_path(self) -> PathBuf {
        self.table
    }
}

/// Stage a model payload from an open stream under a caller-chosen name.
///
/// `archived` selects the extraction branch; callers that do not already
/// know can ask [`sniff_archive`] first. The name keys the staging
/// directory, so a new model version needs a new name (or the previous
/// version wins: an existing directory is reused as-is).
///
/// Staging never retries and never rolls back: a failed call leaves the
/// directory indeterminate, and a retry under the same name runs
/// straight into the final table check.
pub fn stage_from_reader<R: Read + Seek>(mut reader: R, name: &str, archived: bool) -> Result<StagedModel> {
    validate_name(name)?;

    let registry = exit_registry();
    let sandbox = prepare_sandbox(name, registry)?;

    if sandbox.reused {
        debug!(name, "sandbox already staged, skipping extraction");
    } else if archived {
        extract_archive(reader, &sandbox.dir, registry)?;
    } else {
        write_raw(&mut reader, &sandbox.dir, registry)?;
    }

    table_handle(sandbox.dir)
}

/// Stage a model from a file path, sniffing for the zip magic first.
///
/// A zipped file is staged under a name derived from its file stem. A
/// raw file already is the table, so its canonical path is returned
/// without copying anything.
pub fn stage_from_file(path: impl AsRef<Path>) -> Result<StagedModel> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    if sniff_archive(&mut reader)? {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        debug!(name, path = %path.display(), "staging zipped model file");
        stage_from_reader(reader, name, true)
    } else {
        let table = path.canonicalize()?;
        debug!(path = %table.display(), "model file is not zipped, using it in place");
        Ok(StagedModel { table })
    }
}

/// The unconditional output check: whatever branch ran (or was skipped),
/// the staged directory must now hold the table as a regular file.
fn table_handle(sandbox_dir: PathBuf) -> Result<StagedModel> {
    let table = sandbox_dir.join(TABLE_FILE_NAME);
    if !table.is_file() {
        return Err(Error::MissingTable(sandbox_dir));
    }
    let table = table.canonicalize()?;
    Ok(StagedModel { table })
}
