//! Whole-table CSV persistence with atomic replacement
//!
//! Every persisted table (manifest, station master, station mapping, trip
//! ledger) is read and written as a whole. Writes go through
//! [`write_if_changed`], which skips the write when the encoded table is
//! byte-identical to the file on disk and otherwise replaces the file using
//! the temp-file + rename pattern, so readers never observe a partial table.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, error};

use crate::constants::files;
use crate::errors::{StorageError, StorageResult};

/// Read every row of a CSV table
///
/// Returns `Ok(None)` when the table file does not exist yet, so callers can
/// tell "never written" apart from "written but empty".
pub async fn read_table<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<Vec<T>>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    decode_rows(path, &bytes).map(Some)
}

/// Decode CSV bytes into typed rows
pub fn decode_rows<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> StorageResult<Vec<T>> {
    let mut reader = csv::Reader::from_reader(bytes);
    reader
        .deserialize()
        .map(|row| {
            row.map_err(|source| StorageError::Csv {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

/// Encode typed rows as CSV bytes, header first
pub fn encode_rows<T: Serialize>(path: &Path, rows: &[T]) -> StorageResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).map_err(|source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    }

    writer.into_inner().map_err(|e| StorageError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })
}

/// Encode and persist a table if its content changed
///
/// Returns `true` when the file was (re)written.
pub async fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> StorageResult<bool> {
    let content = encode_rows(path, rows)?;
    write_if_changed(path, &content).await
}

/// Replace `path` with `content` unless the file already holds exactly that
///
/// Returns `true` when the file was written.
pub async fn write_if_changed(path: &Path, content: &[u8]) -> StorageResult<bool> {
    match fs::read(path).await {
        Ok(existing) if existing == content => {
            debug!("Table unchanged, skipping write: {}", path.display());
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
    }

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content)
        .await
        .map_err(|source| StorageError::Io {
            path: temp_path.clone(),
            source,
        })?;

    if let Err(source) = fs::rename(&temp_path, path).await {
        error!("Failed to rename temporary table file: {}", source);
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::AtomicOperationFailed {
            temp_path,
            final_path: path.to_path_buf(),
            source,
        });
    }

    debug!("Wrote table: {} ({} bytes)", path.display(), content.len());
    Ok(true)
}

/// Sibling path used while a table is being replaced
fn temp_path_for(path: &Path) -> PathBuf {
    path.with_extension(format!(
        "{}{}",
        path.extension().unwrap_or_default().to_string_lossy(),
        files::TEMP_FILE_SUFFIX
    ))
}

/// Serde adapter for the on-disk timestamp format
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::constants::tables::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(raw.trim()).map_err(serde::de::Error::custom)
    }

    /// Parse the on-disk format, tolerating fractional seconds on input
    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
    }

    /// Same format, with empty cells mapped to `None`
    pub mod optional {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        use crate::constants::tables::TIMESTAMP_FORMAT;

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => serializer.collect_str(&value.format(TIMESTAMP_FORMAT)),
                None => serializer.serialize_str(""),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(raw) => super::parse(raw).map(Some).map_err(serde::de::Error::custom),
            }
        }
    }
}
