//! Archive extraction
//!
//! Unpacks the ZIP payload of a request into its workspace. Entry names are
//! checked before anything is written: absolute names and names that climb
//! out of the target directory fail the whole extraction.

use pak_parser_core::{ParseError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Cursor};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Totals of one extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Number of files written
    pub files: usize,
    /// Number of directories created from explicit directory entries
    pub directories: usize,
    /// Uncompressed bytes written
    pub bytes: u64,
}

/// Extract an in-memory ZIP archive into `into`.
///
/// Fails with [`ParseError::Extraction`] when `data` is not a readable ZIP
/// container or an entry is encrypted, and with [`ParseError::PathTraversal`]
/// when an entry would land outside `into`. Files already written stay in
/// place on failure; the caller owns the directory and removes it.
pub fn extract_archive(data: &[u8], into: &Path) -> Result<ExtractSummary> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| ParseError::extraction(format!("Not a valid archive: {}", e)))?;

    // Reject unsafe names before touching the filesystem
    for index in 0..archive.len() {
        let entry = archive
            .by_index_raw(index)
            .map_err(|e| ParseError::extraction(format!("Entry {}: {}", index, e)))?;
        if entry.enclosed_name().is_none() {
            return Err(ParseError::path_traversal(entry.name()));
        }
    }

    let mut summary = ExtractSummary::default();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ParseError::extraction(format!("Entry {}: {}", index, e)))?;

        if entry.encrypted() {
            return Err(ParseError::extraction(format!(
                "Encrypted entry: {}",
                entry.name()
            )));
        }

        let Some(relative) = entry.enclosed_name() else {
            return Err(ParseError::path_traversal(entry.name()));
        };
        let target = into.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(&target)?);
        let written = std::io::copy(&mut entry, &mut writer).map_err(|e| {
            ParseError::extraction(format!("Failed to inflate {}: {}", entry.name(), e))
        })?;

        debug!(entry = entry.name(), bytes = written, "Extracted");
        summary.files += 1;
        summary.bytes += written;
    }

    Ok(summary)
}
