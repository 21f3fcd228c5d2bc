//! Line-delimited JSON writer
//!
//! Each record becomes one self-contained JSON object followed by a newline.
//! `serde_json` escapes embedded newlines, so a record can never span lines.

use crate::output::{OutputError, OutputResult};
use crate::state::PageRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

/// Outcome of writing a record set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Records written to the artifact
    pub written: usize,

    /// Records dropped because they failed to encode
    pub skipped: usize,
}

/// Writes records to `path`, replacing any previous artifact
///
/// Records are written in the order given. A record that fails to encode is
/// logged and skipped; I/O failures abort the write. The file handle is
/// closed on every return path.
///
/// # Returns
///
/// * `Ok(WriteReport)` - Counts of written and skipped records
/// * `Err(OutputError::Create)` - The artifact could not be created
/// * `Err(OutputError::Io)` - Removing, writing or flushing failed
pub fn write_records(path: &Path, records: &[PageRecord]) -> OutputResult<WriteReport> {
    remove_existing(path)?;

    let file = File::create(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    let report = write_lines(&mut writer, records)?;
    writer.flush()?;

    tracing::info!(
        "Wrote {} records to {} ({} skipped)",
        report.written,
        path.display(),
        report.skipped
    );

    Ok(report)
}

/// Writes one JSON line per item, skipping items that fail to encode
fn write_lines<W: Write, T: Serialize + Labelled>(
    writer: &mut W,
    items: &[T],
) -> OutputResult<WriteReport> {
    let mut report = WriteReport::default();

    for item in items {
        let line = match serde_json::to_string(item) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Error encoding record for {}: {}", item.label(), e);
                report.skipped += 1;
                continue;
            }
        };

        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        report.written += 1;
    }

    Ok(report)
}

/// Identifies an item in encode-failure logs
trait Labelled {
    fn label(&self) -> &str;
}

impl Labelled for PageRecord {
    fn label(&self) -> &str {
        &self.source_url
    }
}

fn remove_existing(path: &Path) -> OutputResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed previous artifact {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
