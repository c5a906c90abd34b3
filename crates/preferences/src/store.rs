//! The user's genre preference set.
//!
//! Writes are validated against the genre reference table: an unknown id is
//! rejected with [`PreferenceError::InvalidGenreId`] and nothing is persisted.
//! Selection order is preserved because the engine builds its per-genre
//! categories from the first preferred genres.

use crate::error::{PreferenceError, Result};
use crate::profile::LocalProfileStore;
use catalog::{GenreId, GenreTable};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of genres needed before recommendations are personalized
pub const MIN_COMPLETE_PREFERENCES: usize = 3;

/// Above this many genres the preference signal gets too broad to be useful
pub const MAX_RECOMMENDED_PREFERENCES: usize = 15;

/// Weight of "covers many of my genres" in [`match_score`]
const PREFERENCE_COVERAGE_WEIGHT: f32 = 0.7;
/// Weight of "is mostly about genres I like" in [`match_score`]
const ITEM_FOCUS_WEIGHT: f32 = 0.3;

/// How well an item's genres match a preference set, in `[0, 1]`.
///
/// `0.7 * |P ∩ G| / |P| + 0.3 * |P ∩ G| / |G|`, and 0 when either side is
/// empty. Duplicate ids on either side are counted once.
pub fn match_score(preferences: &[GenreId], item_genres: &[GenreId]) -> f32 {
    let preferred: HashSet<GenreId> = preferences.iter().copied().collect();
    let genres: HashSet<GenreId> = item_genres.iter().copied().collect();
    if preferred.is_empty() || genres.is_empty() {
        return 0.0;
    }

    let overlap = preferred.intersection(&genres).count() as f32;
    PREFERENCE_COVERAGE_WEIGHT * (overlap / preferred.len() as f32)
        + ITEM_FOCUS_WEIGHT * (overlap / genres.len() as f32)
}

/// How far the user is from a personalized feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionStatus {
    pub is_complete: bool,
    /// `min(count / 3, 1) * 100`
    pub coverage_percent: f32,
    /// Genres still to pick before the feed is personalized
    pub missing_genres: usize,
    pub recommendation_text: String,
}

/// A single finding from [`GenrePreferenceStore::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PreferenceIssue {
    UnknownGenre(GenreId),
    DuplicateGenre(GenreId),
    NoPreferences,
    TooManyPreferences(usize),
}

impl fmt::Display for PreferenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceIssue::UnknownGenre(id) => write!(f, "Genre {} does not exist", id),
            PreferenceIssue::DuplicateGenre(id) => write!(f, "Genre {} is selected more than once", id),
            PreferenceIssue::NoPreferences => write!(f, "No genres selected"),
            PreferenceIssue::TooManyPreferences(count) => write!(
                f,
                "{} genres selected; more than {} makes recommendations less focused",
                count, MAX_RECOMMENDED_PREFERENCES
            ),
        }
    }
}

/// Result of an explicit validation pass; errors make the set invalid,
/// warnings do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<PreferenceIssue>,
    pub warnings: Vec<PreferenceIssue>,
}

/// Owns the user's favourite genres on top of a [`LocalProfileStore`]
pub struct GenrePreferenceStore {
    profile: Arc<dyn LocalProfileStore>,
    genres: Arc<GenreTable>,
    // Held across read-modify-write in add/remove
    write_lock: Mutex<()>,
}

impl GenrePreferenceStore {
    pub fn new(profile: Arc<dyn LocalProfileStore>, genres: Arc<GenreTable>) -> Self {
        Self {
            profile,
            genres,
            write_lock: Mutex::new(()),
        }
    }

    pub fn genre_table(&self) -> &GenreTable {
        &self.genres
    }

    /// The preferred genres in selection order, each id once
    pub fn get(&self) -> Result<Vec<GenreId>> {
        Ok(dedup_in_order(self.profile.favorite_genres()?))
    }

    /// Replace the whole set. Duplicates collapse onto their first
    /// occurrence.
    #[instrument(skip(self))]
    pub fn set(&self, ids: &[GenreId]) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.write(ids)
    }

    /// Add one genre; adding a genre already present is a no-op
    #[instrument(skip(self))]
    pub fn add(&self, id: GenreId) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut current = self.get()?;
        if current.contains(&id) {
            return Ok(());
        }
        current.push(id);
        self.write(&current)
    }

    /// Remove one genre; removing a genre that is absent is a no-op
    #[instrument(skip(self))]
    pub fn remove(&self, id: GenreId) -> Result<()> {
        let _guard = self.write_lock.lock();
        let current = self.get()?;
        if !current.contains(&id) {
            return Ok(());
        }
        let remaining: Vec<GenreId> = current.into_iter().filter(|&g| g != id).collect();
        self.write(&remaining)
    }

    fn write(&self, ids: &[GenreId]) -> Result<()> {
        if let Some(&unknown) = ids.iter().find(|&&id| !self.genres.contains(id)) {
            return Err(PreferenceError::InvalidGenreId(unknown));
        }
        let ids = dedup_in_order(ids.to_vec());
        debug!(count = ids.len(), "Saving genre preferences");
        self.profile.set_favorite_genres(&ids)
    }

    /// [`match_score`] against the current preferences
    pub fn match_score(&self, item_genres: &[GenreId]) -> Result<f32> {
        Ok(match_score(&self.get()?, item_genres))
    }

    pub fn completion_status(&self) -> Result<CompletionStatus> {
        let count = self.get()?.len();
        let is_complete = count >= MIN_COMPLETE_PREFERENCES;
        let coverage = (count as f32 / MIN_COMPLETE_PREFERENCES as f32).min(1.0);
        let missing_genres = MIN_COMPLETE_PREFERENCES.saturating_sub(count);

        let recommendation_text = match missing_genres {
            0 => "Your feed is personalized to your favourite genres.".to_string(),
            1 => "Pick 1 more genre to personalize your feed.".to_string(),
            n => format!("Pick {} more genres to personalize your feed.", n),
        };

        Ok(CompletionStatus {
            is_complete,
            coverage_percent: coverage * 100.0,
            missing_genres,
            recommendation_text,
        })
    }

    /// Inspect the persisted list as stored, including anything written
    /// outside this store.
    pub fn validate(&self) -> Result<ValidationReport> {
        let stored = self.profile.favorite_genres()?;
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for &id in &stored {
            if !seen.insert(id) {
                if reported.insert(id) {
                    warnings.push(PreferenceIssue::DuplicateGenre(id));
                }
                continue;
            }
            if !self.genres.contains(id) {
                errors.push(PreferenceIssue::UnknownGenre(id));
            }
        }

        if seen.is_empty() {
            warnings.push(PreferenceIssue::NoPreferences);
        } else if seen.len() > MAX_RECOMMENDED_PREFERENCES {
            warnings.push(PreferenceIssue::TooManyPreferences(seen.len()));
        }

        Ok(ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        })
    }
}

fn dedup_in_order(ids: Vec<GenreId>) -> Vec<GenreId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MemoryProfileStore;

    fn create_store() -> (Arc<MemoryProfileStore>, GenrePreferenceStore) {
        let profile = Arc::new(MemoryProfileStore::new());
        let store = GenrePreferenceStore::new(profile.clone(), Arc::new(GenreTable::bundled()));
        (profile, store)
    }

    #[test]
    fn test_match_score_empty_sides() {
        assert_eq!(match_score(&[], &[28, 12]), 0.0);
        assert_eq!(match_score(&[28, 12], &[]), 0.0);
    }

    #[test]
    fn test_match_score_formula() {
        // 1 of 2 preferred genres, item has 4 genres: 0.7 * 0.5 + 0.3 * 0.25
        let score = match_score(&[28, 12], &[28, 35, 18, 80]);
        assert!((score - 0.425).abs() < 1e-6);

        // Perfect match
        assert!((match_score(&[28, 12], &[12, 28]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_match_score_monotonic_in_overlap() {
        let prefs = [28, 12, 16];
        let none = match_score(&prefs, &[35, 18, 80]);
        let one = match_score(&prefs, &[28, 18, 80]);
        let two = match_score(&prefs, &[28, 12, 80]);
        let three = match_score(&prefs, &[28, 12, 16]);
        assert!(none <= one && one <= two && two <= three);
        assert!((0.0..=1.0).contains(&three));
    }

    #[test]
    fn test_set_and_get_round_trip() {
        let (_, store) = create_store();
        store.set(&[28, 12, 16]).unwrap();
        let got: HashSet<_> = store.get().unwrap().into_iter().collect();
        assert_eq!(got, HashSet::from([28, 12, 16]));
    }

    #[test]
    fn test_set_rejects_unknown_genre() {
        let (_, store) = create_store();
        store.set(&[28]).unwrap();

        let err = store.set(&[28, 999_999]).unwrap_err();
        assert!(matches!(err, PreferenceError::InvalidGenreId(999_999)));
        // Nothing was written
        assert_eq!(store.get().unwrap(), vec![28]);
    }

    #[test]
    fn test_set_collapses_duplicates_keeping_order() {
        let (profile, store) = create_store();
        store.set(&[12, 28, 12, 16]).unwrap();
        assert_eq!(profile.favorite_genres().unwrap(), vec![12, 28, 16]);
    }

    #[test]
    fn test_add_and_remove_are_idempotent() {
        let (_, store) = create_store();
        store.add(28).unwrap();
        store.add(28).unwrap();
        store.add(12).unwrap();
        assert_eq!(store.get().unwrap(), vec![28, 12]);

        store.remove(28).unwrap();
        store.remove(28).unwrap();
        assert_eq!(store.get().unwrap(), vec![12]);

        assert!(matches!(store.add(1), Err(PreferenceError::InvalidGenreId(1))));
    }

    #[test]
    fn test_completion_status() {
        let (_, store) = create_store();

        let status = store.completion_status().unwrap();
        assert!(!status.is_complete);
        assert_eq!(status.coverage_percent, 0.0);
        assert_eq!(status.missing_genres, 3);

        store.set(&[28, 12]).unwrap();
        let status = store.completion_status().unwrap();
        assert!(!status.is_complete);
        assert!((status.coverage_percent - 2.0 / 3.0 * 100.0).abs() < 1e-4);
        assert_eq!(status.missing_genres, 1);

        store.set(&[28, 12, 16, 35]).unwrap();
        let status = store.completion_status().unwrap();
        assert!(status.is_complete);
        assert_eq!(status.coverage_percent, 100.0);
        assert_eq!(status.missing_genres, 0);
    }

    #[test]
    fn test_validate_reports_raw_profile() {
        let (profile, store) = create_store();

        let report = store.validate().unwrap();
        assert!(report.is_valid);
        assert_eq!(report.warnings, vec![PreferenceIssue::NoPreferences]);

        // Written behind the store's back
        profile.set_favorite_genres(&[28, 28, 424242]).unwrap();
        let report = store.validate().unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec![PreferenceIssue::UnknownGenre(424242)]);
        assert_eq!(report.warnings, vec![PreferenceIssue::DuplicateGenre(28)]);
    }

    #[test]
    fn test_validate_warns_on_too_many() {
        let (_, store) = create_store();
        let all: Vec<GenreId> = GenreTable::bundled().genres().iter().map(|g| g.id).collect();
        assert!(all.len() > MAX_RECOMMENDED_PREFERENCES);
        store.set(&all).unwrap();

        let report = store.validate().unwrap();
        assert!(report.is_valid);
        assert_eq!(report.warnings, vec![PreferenceIssue::TooManyPreferences(all.len())]);
    }
}
