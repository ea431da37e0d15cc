use std::io::{Read, Seek, SeekFrom};

use crate::Result;

/// Zip local-header magic, "PK".
const ARCHIVE_MAGIC: [u8; 2] = [0x50, 0x4B];

/// Classify a payload as archived or raw by peeking its first two bytes.
///
/// The stream position is restored before returning, so downstream
/// readers see the full payload including the peeked bytes. Streams
/// shorter than two bytes are never archives.
pub fn sniff_archive<R: Read + Seek>(reader: &mut R) -> Result<bool> {
    let origin = reader.stream_position()?;

    let mut magic = [0u8; 2];
    let mut filled = 0;
    while filled < magic.len() {
        let read = reader.read(&mut magic[filled..])?;
        if read == 0 {
            break;
        }
        filled += read;
    }

    reader.seek(SeekFrom::Start(origin))?;
    Ok(filled == magic.len() && magic == ARCHIVE_MAGIC)
}
