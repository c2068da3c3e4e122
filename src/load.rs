use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use std::{
    fmt::{self, Display},
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

/// Reasons a data file yields no usable records.
#[derive(Debug)]
pub enum LoadError {
    NotFound(PathBuf),
    Io(PathBuf, io::Error),
    Malformed(PathBuf, serde_json::Error),
    NotAList(PathBuf),
    Empty(PathBuf),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => write!(f, "file {} not found", path.display()),
            LoadError::Io(path, e) => write!(f, "reading {}: {e}", path.display()),
            LoadError::Malformed(path, e) => {
                write!(f, "{} is not valid JSON: {e}", path.display())
            }
            LoadError::NotAList(path) => {
                write!(f, "{} does not contain a list of records", path.display())
            }
            LoadError::Empty(path) => write!(f, "{} contains no data", path.display()),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(_, e) => Some(e),
            LoadError::Malformed(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Reads the JSON list of records at `path`.
///
/// Each element of the list is decoded into a `T` on its own; elements that
/// don't fit the schema are skipped.
///
/// # Errors
///
/// Returns a [`LoadError`] if:
/// * The file does not exist, or cannot be opened or read
/// * The contents are not valid JSON
/// * The JSON is not a list (`null` and `[]` count as [`LoadError::Empty`])
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io(path.to_path_buf(), e),
    })?;
    let value: Value = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        if e.is_io() {
            LoadError::Io(path.to_path_buf(), e.into())
        } else {
            LoadError::Malformed(path.to_path_buf(), e)
        }
    })?;
    let items = match value {
        Value::Null => return Err(LoadError::Empty(path.to_path_buf())),
        Value::Array(items) if items.is_empty() => {
            return Err(LoadError::Empty(path.to_path_buf()))
        }
        Value::Array(items) => items,
        _ => return Err(LoadError::NotAList(path.to_path_buf())),
    };
    let count = items.len();
    let records: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if records.len() < count {
        debug!(
            "{}: skipped {} malformed records",
            path.display(),
            count - records.len()
        );
    }
    Ok(records)
}
