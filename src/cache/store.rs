// Cache store for reading and writing cached tables.
// Handles JSON serialization and filesystem operations.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::Result;

/// Wrapper for cached data with metadata.
///
/// Published survey vintages never change, so entries carry no expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }
}

/// Read cached JSON data from a file.
pub fn read_cached<T: DeserializeOwned>(path: &Path) -> Result<Option<CachedData<T>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let cached: CachedData<T> = serde_json::from_str(&contents)?;
    Ok(Some(cached))
}

/// Write data to cache as JSON.
pub fn write_cached<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let cached = CachedData::new(data);
    let json = serde_json::to_string(&cached)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Delete a cached directory and all contents.
pub fn delete_dir(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::census::RawTable;

    fn sample_table() -> RawTable {
        RawTable {
            header: vec!["NAME".to_string(), "state".to_string()],
            rows: vec![vec![Some("Alabama".to_string()), Some("01".to_string())]],
        }
    }

    #[test]
    fn test_write_and_read_cached() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tables/state.json");

        let before = Utc::now();
        write_cached(&path, &sample_table()).unwrap();

        let cached: CachedData<RawTable> = read_cached(&path).unwrap().unwrap();
        assert_eq!(cached.data, sample_table());
        assert!(cached.cached_at >= before);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let cached: Option<CachedData<RawTable>> = read_cached(&path).unwrap();
        assert!(cached.is_none());
    }

    #[test]
    fn test_read_corrupt_entry() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        assert!(read_cached::<RawTable>(&path).is_err());
    }

    #[test]
    fn test_delete_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("tables");
        write_cached(&dir.join("a.json"), &sample_table()).unwrap();

        delete_dir(&dir).unwrap();
        assert!(!dir.exists());
        // Deleting again is a no-op
        delete_dir(&dir).unwrap();
    }
}
