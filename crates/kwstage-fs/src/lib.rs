//! Filesystem primitives for sandboxed staging.
//!
//! This crate owns no staging policy: callers decide where files go. What
//! lives here is the mechanics they share:
//!
//! - `copy_reader` - bounded-buffer stream copy
//! - `replace_file` - delete-then-create file writes
//! - `contain.rs` - lexical containment proof
//! - `cleanup.rs` - process-exit cleanup registry

pub use cleanup::{CleanupRegistry, exit_registry};
pub use contain::ensure_contained;
pub use error::{Error, Result};

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

mod cleanup;
mod contain;
mod error;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Copy `reader` to `writer` through a bounded buffer.
///
/// Returns the number of bytes copied. No correctness depends on the
/// buffer size; it only bounds memory use for arbitrarily large payloads.
pub fn copy_reader<R, W>(reader: &mut R, writer: &mut W) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        writer.write_all(&buffer[..read])?;
        total += read as u64;
    }
    Ok(total)
}

/// Remove any existing file at `path`, then open a fresh one for writing.
///
/// Replacement is full: there is no partial-overwrite merge. A failed
/// removal is an error, not a silent fallthrough to truncation.
pub fn replace_file(path: &Path) -> Result<File> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|source| Error::Remove {
            path: path.to_path_buf(),
            source,
        })?;
    }
    File::create(path).map_err(|source| Error::Create {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn copy_reader_counts_bytes() {
        let mut reader = Cursor::new(vec![7u8; 1000]);
        let mut sink = Vec::new();
        let copied = copy_reader(&mut reader, &mut sink).unwrap();
        assert_eq!(copied, 1000);
        assert_eq!(sink, vec![7u8; 1000]);
    }

    #[test]
    fn copy_reader_empty_stream() {
        let mut reader = Cursor::new(Vec::new());
        let mut sink = Vec::new();
        let copied = copy_reader(&mut reader, &mut sink).unwrap();
        assert_eq!(copied, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn copy_reader_larger_than_buffer() {
        let payload = vec![0xAB; COPY_BUFFER_SIZE * 2 + 17];
        let mut reader = Cursor::new(payload.clone());
        let mut sink = Vec::new();
        let copied = copy_reader(&mut reader, &mut sink).unwrap();
        assert_eq!(copied, payload.len() as u64);
        assert_eq!(sink, payload);
    }

    #[test]
    fn replace_file_creates_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let mut file = replace_file(&path).unwrap();
        file.write_all(b"first").unwrap();
        drop(file);
        assert_eq!(std::fs::read(&path).unwrap(), b"first");
    }

    #[test]
    fn replace_file_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"a much longer previous payload").unwrap();

        let mut file = replace_file(&path).unwrap();
        file.write_all(b"new").unwrap();
        drop(file);
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn replace_file_missing_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("out.bin");
        let result = replace_file(&path);
        assert!(matches!(result, Err(Error::Create { .. })));
    }
}
