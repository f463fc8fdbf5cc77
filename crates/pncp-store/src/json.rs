//! Whole-document JSON reads and atomic writes.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// Reads a JSON array of records.
///
/// A missing file is an empty list. A file that exists but is unreadable,
/// not JSON, or not an array is an error.
///
/// # Errors
///
/// Returns [`StoreError::Io`] or [`StoreError::Malformed`].
pub fn read_records(path: &Path) -> Result<Vec<Value>, StoreError> {
    let Some(doc) = read_document(path)? else {
        tracing::debug!(path = %path.display(), "artifact absent; treating as empty");
        return Ok(Vec::new());
    };
    match doc {
        Value::Array(items) => Ok(items),
        other => Err(StoreError::Malformed {
            path: path.to_owned(),
            reason: format!("expected a JSON array, found {}", json_kind(&other)),
        }),
    }
}

/// Reads and parses a JSON document, returning `None` when the file is absent.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file exists but cannot be read, or
/// [`StoreError::Malformed`] if it is not valid JSON.
pub fn read_document(path: &Path) -> Result<Option<Value>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.to_owned(),
                source: e,
            })
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| StoreError::Malformed {
            path: path.to_owned(),
            reason: e.to_string(),
        })
}

/// Serializes `value` to `path`, replacing any previous file atomically.
///
/// Parent directories are created as needed. Non-ASCII text is written as
/// UTF-8, not escaped.
///
/// # Errors
///
/// Returns [`StoreError::Io`] on filesystem failures or
/// [`StoreError::Serialize`] if `value` cannot be encoded.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_owned(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let temp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        serde_json::to_writer(&mut writer, value).map_err(|e| StoreError::Serialize {
            path: path.to_owned(),
            source: e,
        })?;
        writer.flush().map_err(io_err)?;
    }
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
