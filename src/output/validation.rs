//! Post-crawl artifact checks
//!
//! Both checks must pass before a run is reported as successful:
//! existence and non-emptiness first, then the structure of every record.

use crate::output::{JsonlMode, OutputError, OutputResult};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

const REQUIRED_FIELDS: [&str; 2] = ["url", "text"];

/// Checks that the artifact exists and is not empty
///
/// # Returns
///
/// * `Ok(u64)` - The artifact size in bytes
/// * `Err(OutputError::Missing)` - No regular file at `path`
/// * `Err(OutputError::Empty)` - The file has zero bytes
pub fn validate_output_file(path: &Path) -> OutputResult<u64> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(OutputError::Missing {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_file() {
        return Err(OutputError::Missing {
            path: path.to_path_buf(),
        });
    }

    if metadata.len() == 0 {
        return Err(OutputError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(metadata.len())
}

/// Checks that every record in the artifact is well formed
///
/// A record must be a JSON object whose `url` and `text` fields are
/// non-empty strings. The first offending record fails the whole check with
/// its 1-based line number.
///
/// # Returns
///
/// * `Ok(usize)` - The number of records read
/// * `Err(OutputError::MalformedRecord)` - The first invalid record
/// * `Err(OutputError::Io)` - The file could not be read
pub fn validate_jsonl_structure(path: &Path, mode: JsonlMode) -> OutputResult<usize> {
    let count = match mode {
        JsonlMode::Strict => validate_strict(path)?,
        JsonlMode::Stream => validate_stream(path)?,
    };

    tracing::debug!("{} records in {} passed {:?} validation", count, path.display(), mode);
    Ok(count)
}

/// One object per line, no blank lines
fn validate_strict(path: &Path) -> OutputResult<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut count = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => malformed(line_number, "line is not valid UTF-8"),
            _ => OutputError::Io(e),
        })?;

        let value: Value = serde_json::from_str(&line)
            .map_err(|e| malformed(line_number, format!("invalid JSON: {}", e)))?;
        check_record(&value).map_err(|reason| malformed(line_number, reason))?;

        count += 1;
    }

    Ok(count)
}

/// Whitespace-separated objects, which may span lines
fn validate_stream(path: &Path) -> OutputResult<usize> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8(bytes).map_err(|e| {
        let offset = e.utf8_error().valid_up_to();
        malformed(
            line_at(e.as_bytes(), offset),
            "content is not valid UTF-8",
        )
    })?;

    let mut stream = serde_json::Deserializer::from_str(&content).into_iter::<Value>();
    let mut count = 0;

    loop {
        let start = stream.byte_offset();
        let value = match stream.next() {
            None => break,
            Some(Ok(value)) => value,
            Some(Err(e)) => return Err(malformed(e.line(), format!("invalid JSON: {}", e))),
        };

        let line = line_at(content.as_bytes(), skip_whitespace(&content, start));
        check_record(&value).map_err(|reason| malformed(line, reason))?;
        count += 1;
    }

    Ok(count)
}

/// Checks the shape of a single decoded record
fn check_record(value: &Value) -> Result<(), String> {
    let object = value
        .as_object()
        .ok_or_else(|| "expected a JSON object".to_string())?;

    for field in REQUIRED_FIELDS {
        match object.get(field) {
            None => return Err(format!("missing required field '{}'", field)),
            Some(Value::String(s)) if s.is_empty() => {
                return Err(format!("field '{}' is empty", field))
            }
            Some(Value::String(_)) => {}
            Some(_) => return Err(format!("field '{}' must be a string", field)),
        }
    }

    Ok(())
}

fn malformed(line: usize, reason: impl Into<String>) -> OutputError {
    OutputError::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

/// 1-based line containing byte `offset`
fn line_at(bytes: &[u8], offset: usize) -> usize {
    let end = offset.min(bytes.len());
    bytes
        .get(..end)
        .map_or(0, |prefix| prefix.iter().filter(|&&b| b == b'\n').count())
        + 1
}

/// Byte offset of the first non-whitespace character at or after `offset`
fn skip_whitespace(content: &str, offset: usize) -> usize {
    content
        .get(offset..)
        .map_or(offset, |rest| offset + (rest.len() - rest.trim_start().len()))
}
