//! # Preferences Crate
//!
//! The user's favourite genres and the local profile record they live in.
//!
//! ## Components
//!
//! ### Profile stores
//! `LocalProfileStore` abstracts where the preferences record is kept:
//! - `JsonProfileStore`: a JSON file on disk
//! - `MemoryProfileStore`: process memory (tests, throwaway sessions)
//!
//! ### GenrePreferenceStore
//! Validated access to the favourite genre list:
//! - get / set / add / remove, rejecting ids missing from the genre table
//! - match scoring of an item's genres against the preferences
//! - completion status (3 genres make a personalized feed)
//! - an explicit validation report over the stored record
//!
//! ## Example Usage
//!
//! ```ignore
//! use preferences::{GenrePreferenceStore, JsonProfileStore};
//! use catalog::GenreTable;
//! use std::sync::Arc;
//!
//! let profile = Arc::new(JsonProfileStore::new("profile.json"));
//! let store = GenrePreferenceStore::new(profile, Arc::new(GenreTable::bundled()));
//!
//! store.set(&[28, 12, 16])?;
//! assert!(store.completion_status()?.is_complete);
//! ```

// Public modules
pub mod error;
pub mod profile;
pub mod store;

// Re-export commonly used types
pub use error::{PreferenceError, Result};
pub use profile::{
    JsonProfileStore, LocalProfileStore, MemoryProfileStore, SortMethod, Theme, UserPreferences,
};
pub use store::{
    CompletionStatus, GenrePreferenceStore, MAX_RECOMMENDED_PREFERENCES,
    MIN_COMPLETE_PREFERENCES, PreferenceIssue, ValidationReport, match_score,
};

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::GenreTable;
    use std::sync::Arc;

    #[test]
    fn test_store_over_memory_profile() {
        let profile = Arc::new(MemoryProfileStore::new());
        let store = GenrePreferenceStore::new(profile, Arc::new(GenreTable::bundled()));

        store.set(&[28, 12, 16]).unwrap();
        assert!(store.completion_status().unwrap().is_complete);
        assert!(store.match_score(&[28]).unwrap() > 0.0);
    }
}
