//! Archive packager: named text entries to an in-memory zip.
//!
//! Entries are deflate-compressed and written in the caller's order. Every
//! entry gets the zip epoch timestamp and fixed permissions, so the same input
//! always produces the same bytes.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use tracing::{debug, error, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::contract::GenerationResult;
use crate::error::PackagingError;

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644)
}

/// Packs `(file name, text)` pairs into a zip byte stream.
///
/// File names must be unique; text is stored as its UTF-8 bytes.
pub fn package<I, N, C>(entries: I) -> Result<Vec<u8>, PackagingError>
where
    I: IntoIterator<Item = (N, C)>,
    N: AsRef<str>,
    C: AsRef<str>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut seen = HashSet::new();

    for (name, content) in entries {
        let name = name.as_ref();
        let content = content.as_ref();
        if !seen.insert(name.to_owned()) {
            error!(entry = name, "[PACK][ERROR] Duplicate archive entry");
            return Err(PackagingError::DuplicateEntry(name.to_owned()));
        }
        writer.start_file(name, entry_options())?;
        writer.write_all(content.as_bytes())?;
        debug!(entry = name, size = content.len(), "[PACK] Wrote archive entry");
    }

    let bytes = writer.finish()?.into_inner();
    info!(entries = seen.len(), size = bytes.len(), "[PACK] Archive built");
    Ok(bytes)
}

/// Packs a generation result as `app.py`, `README.md` and `requirements.txt`.
pub fn package_result(result: &GenerationResult) -> Result<Vec<u8>, PackagingError> {
    package(result.archive_entries())
}
