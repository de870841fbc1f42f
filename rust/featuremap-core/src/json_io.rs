use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{MapError, Result};

pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn io_error(path: &Path, source: std::io::Error) -> MapError {
    if source.kind() == ErrorKind::NotFound {
        MapError::NotFound { path: path.to_path_buf() }
    } else {
        MapError::Io { path: path.to_path_buf(), source }
    }
}

/// Read and deserialize a whole JSON file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|source| MapError::Parse { path: path.to_path_buf(), source })
}

/// Like [`load_json`], but a missing file yields `T::default()`.
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    match load_json(path) {
        Err(MapError::NotFound { .. }) => {
            warn!(path = %path.display(), "file not found, a new one will be created");
            Ok(T::default())
        }
        other => other,
    }
}

/// Serialize with 4-space indentation.
pub fn to_pretty_string<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_json_pretty<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let text = to_pretty_string(value)
        .map_err(|e| MapError::Io { path: path.to_path_buf(), source: e.into() })?;
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut w = BufWriter::new(file);
    w.write_all(text.as_bytes())
        .and_then(|_| w.flush())
        .map_err(|e| io_error(path, e))
}

/// `<path>.<timestamp>.bak`
pub fn backup_path_for(path: &Path, timestamp: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{timestamp}.bak"));
    PathBuf::from(name)
}

/// Write `value` to `path`, first renaming any existing file to a timestamped backup.
///
/// Returns the backup path when one was made. The old file is never edited in place.
pub fn write_with_backup<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<Option<PathBuf>> {
    let path = path.as_ref();
    let backup = if path.exists() {
        let stamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup = backup_path_for(path, &stamp);
        info!(from = %path.display(), to = %backup.display(), "backing up existing file");
        fs::rename(path, &backup).map_err(|e| io_error(path, e))?;
        Some(backup)
    } else {
        None
    };
    write_json_pretty(path, value)?;
    info!(path = %path.display(), "saved");
    Ok(backup)
}
