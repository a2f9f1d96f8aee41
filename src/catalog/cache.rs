//! JSON cache of parsed component records.

use std::path::Path;

use super::ComponentRecord;
use crate::error::CatalogError;

/// Reads the cached records from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of
/// component records.
pub fn load(path: &Path) -> Result<Vec<ComponentRecord>, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&contents).map_err(|e| CatalogError::Cache {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Writes `records` to `path` as pretty-printed JSON, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns an error if serialisation fails or the file cannot be written.
pub fn save(path: &Path, records: &[ComponentRecord]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CatalogError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(records).map_err(CatalogError::Serialise)?;

    std::fs::write(path, json).map_err(|e| CatalogError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
