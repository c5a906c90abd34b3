//! Local user-profile persistence.
//!
//! The favourite genres live inside a larger preferences record that also
//! holds the sort method and theme. Stores only ever replace the genre list
//! and leave the other fields as they found them.

use crate::error::Result;
use catalog::GenreId;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Backing store for the genre preference list
pub trait LocalProfileStore: Send + Sync {
    /// The persisted list, exactly as stored (may contain duplicates if the
    /// record was edited by hand). Empty when nothing was ever saved.
    fn favorite_genres(&self) -> Result<Vec<GenreId>>;

    /// Replace the persisted list
    fn set_favorite_genres(&self, ids: &[GenreId]) -> Result<()>;
}

/// How list screens order their content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMethod {
    #[default]
    Popularity,
    Rating,
    ReleaseDate,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// The whole persisted preferences record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub favorite_genres: Vec<GenreId>,
    #[serde(default)]
    pub sort_method: SortMethod,
    #[serde(default)]
    pub theme: Theme,
}

/// Keeps the record in memory only
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    record: RwLock<UserPreferences>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record
    pub fn with_preferences(record: UserPreferences) -> Self {
        Self {
            record: RwLock::new(record),
        }
    }

    pub fn preferences(&self) -> UserPreferences {
        self.record.read().clone()
    }
}

impl LocalProfileStore for MemoryProfileStore {
    fn favorite_genres(&self) -> Result<Vec<GenreId>> {
        Ok(self.record.read().favorite_genres.clone())
    }

    fn set_favorite_genres(&self, ids: &[GenreId]) -> Result<()> {
        self.record.write().favorite_genres = ids.to_vec();
        Ok(())
    }
}

/// Persists the record as a JSON file
#[derive(Debug)]
pub struct JsonProfileStore {
    path: PathBuf,
    // Serializes load-modify-save cycles within this process
    io_lock: Mutex<()>,
}

impl JsonProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full record; a missing file yields the default record
    pub fn load(&self) -> Result<UserPreferences> {
        let _guard = self.io_lock.lock();
        self.read_record()
    }

    /// Overwrite the full record
    pub fn save(&self, record: &UserPreferences) -> Result<()> {
        let _guard = self.io_lock.lock();
        self.write_record(record)
    }

    fn read_record(&self) -> Result<UserPreferences> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No profile file yet, using defaults");
                Ok(UserPreferences::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn write_record(&self, record: &UserPreferences) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Write then rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(record)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl LocalProfileStore for JsonProfileStore {
    fn favorite_genres(&self) -> Result<Vec<GenreId>> {
        Ok(self.load()?.favorite_genres)
    }

    fn set_favorite_genres(&self, ids: &[GenreId]) -> Result<()> {
        let _guard = self.io_lock.lock();
        let mut record = self.read_record()?;
        record.favorite_genres = ids.to_vec();
        self.write_record(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT: AtomicUsize = AtomicUsize::new(0);

    fn temp_profile_path() -> PathBuf {
        std::env::temp_dir().join(format!(
            "catalog-recs-profile-{}-{}.json",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ))
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let store = JsonProfileStore::new(temp_profile_path());
        assert!(store.favorite_genres().unwrap().is_empty());
        assert_eq!(store.load().unwrap(), UserPreferences::default());
    }

    #[test]
    fn test_json_round_trip_keeps_other_fields() {
        let path = temp_profile_path();
        let store = JsonProfileStore::new(&path);
        store
            .save(&UserPreferences {
                favorite_genres: vec![],
                sort_method: SortMethod::Rating,
                theme: Theme::Dark,
            })
            .unwrap();

        store.set_favorite_genres(&[28, 12, 16]).unwrap();

        let record = JsonProfileStore::new(&path).load().unwrap();
        assert_eq!(record.favorite_genres, vec![28, 12, 16]);
        assert_eq!(record.sort_method, SortMethod::Rating);
        assert_eq!(record.theme, Theme::Dark);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let path = temp_profile_path();
        fs::write(&path, "not json").unwrap();

        let err = JsonProfileStore::new(&path).favorite_genres().unwrap_err();
        assert!(matches!(err, crate::PreferenceError::Serialization(_)));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryProfileStore::new();
        store.set_favorite_genres(&[35, 18]).unwrap();
        assert_eq!(store.favorite_genres().unwrap(), vec![35, 18]);
        assert_eq!(store.preferences().theme, Theme::System);
    }
}
