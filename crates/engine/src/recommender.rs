//! # Recommender
//!
//! Coordinates one recommendation request:
//! 1. Read the preferred genres
//! 2. Pick general or personalized mode
//! 3. Load the movie and series pools from the cache in parallel
//! 4. Assemble the categories for the mode
//!
//! Upstream failures never escape `get_recommendations`: the result carries
//! an empty category list and the error instead.

use std::sync::Arc;
use std::time::Instant;

use catalog::{CatalogClient, CatalogError, ContentItem, GenreId, GenreTable, MediaType};
use preferences::{CompletionStatus, GenrePreferenceStore, ValidationReport};
use tracing::{debug, info, instrument, warn};

use crate::cache::RecommendationCache;
use crate::categories::{Category, general_categories, personalized_categories};
use crate::config::EngineConfig;
use crate::search::SearchService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationMode {
    /// Fewer preferences than needed; popular and top rated lists
    General,
    /// Ranked against the preferred genres
    Personalized,
}

/// Outcome of one recommendation request
#[derive(Debug, Clone)]
pub struct Recommendations {
    pub mode: RecommendationMode,
    pub categories: Vec<Category>,
    /// Set when the pools could not be loaded; `categories` is then empty
    pub error: Option<CatalogError>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Read-only access to the engine's preference store.
///
/// Changes go through [`RecommendationEngine::set_preferences`] and friends,
/// which also drop the pools and searches computed for the old genres.
#[derive(Clone, Copy)]
pub struct PreferencesView<'a> {
    store: &'a GenrePreferenceStore,
}

impl<'a> PreferencesView<'a> {
    pub fn get(&self) -> preferences::Result<Vec<GenreId>> {
        self.store.get()
    }

    pub fn genre_table(&self) -> &'a GenreTable {
        self.store.genre_table()
    }

    pub fn match_score(&self, item_genres: &[GenreId]) -> preferences::Result<f32> {
        self.store.match_score(item_genres)
    }

    pub fn completion_status(&self) -> preferences::Result<CompletionStatus> {
        self.store.completion_status()
    }

    pub fn validate(&self) -> preferences::Result<ValidationReport> {
        self.store.validate()
    }
}

/// Owns the caches and serves recommendations and search to the UI shell
pub struct RecommendationEngine {
    cache: Arc<RecommendationCache>,
    search: SearchService,
    preferences: Arc<GenrePreferenceStore>,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(client: Arc<dyn CatalogClient>, preferences: Arc<GenrePreferenceStore>) -> Self {
        Self::with_config(client, preferences, EngineConfig::default())
    }

    pub fn with_config(
        client: Arc<dyn CatalogClient>,
        preferences: Arc<GenrePreferenceStore>,
        config: EngineConfig,
    ) -> Self {
        let cache = Arc::new(RecommendationCache::new(
            client.clone(),
            config.freshness_window,
        ));
        let search = SearchService::new(client, preferences.clone(), config.clone());

        Self {
            cache,
            search,
            preferences,
            config,
        }
    }

    pub fn preferences(&self) -> PreferencesView<'_> {
        PreferencesView {
            store: &self.preferences,
        }
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    pub fn search_service(&self) -> &SearchService {
        &self.search
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Preferred genres, or none when the profile cannot be read
    fn current_preferences(&self) -> Vec<GenreId> {
        match self.preferences.get() {
            Ok(genres) => genres,
            Err(err) => {
                warn!(error = %err, "Could not read preferences, using general mode");
                Vec::new()
            }
        }
    }

    /// Mode and the genre set its pools are keyed by
    fn mode_for(&self, preferences: &[GenreId]) -> (RecommendationMode, Vec<GenreId>) {
        if preferences.len() >= self.config.min_personalized_genres {
            (RecommendationMode::Personalized, preferences.to_vec())
        } else {
            (RecommendationMode::General, Vec::new())
        }
    }

    /// Load both media type pools for a genre set in parallel
    async fn load_pools(
        &self,
        genre_ids: &[GenreId],
    ) -> catalog::Result<(Vec<ContentItem>, Vec<ContentItem>)> {
        let (movies, series) = tokio::join!(
            self.cache.get_pool(MediaType::Movie, genre_ids),
            self.cache.get_pool(MediaType::Series, genre_ids)
        );
        Ok((movies?, series?))
    }

    /// Main entry point: the categories for the current preferences
    #[instrument(skip(self))]
    pub async fn get_recommendations(&self) -> Recommendations {
        let start_time = Instant::now();

        let preferences = self.current_preferences();
        let (mode, fingerprint) = self.mode_for(&preferences);
        debug!(?mode, preferences = preferences.len(), "Selected recommendation mode");

        let (movies, series) = match self.load_pools(&fingerprint).await {
            Ok(pools) => pools,
            Err(err) => {
                warn!(error = %err, "No recommendation data available");
                return Recommendations {
                    mode,
                    categories: Vec::new(),
                    error: Some(err),
                };
            }
        };
        info!(
            movies = movies.len(),
            series = series.len(),
            "Loaded recommendation pools"
        );

        let categories = match mode {
            RecommendationMode::General => {
                general_categories(movies, series, self.config.category_size)
            }
            RecommendationMode::Personalized => personalized_categories(
                movies,
                series,
                &preferences,
                self.preferences.genre_table(),
                self.config.category_size,
                self.config.genre_categories,
            ),
        };

        info!(
            categories = categories.len(),
            elapsed = ?start_time.elapsed(),
            "Assembled recommendations"
        );
        Recommendations {
            mode,
            categories,
            error: None,
        }
    }

    /// Drop every cached pool, then fetch both pools for the current mode
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> catalog::Result<()> {
        self.cache.clear().await;

        let preferences = self.current_preferences();
        let (mode, fingerprint) = self.mode_for(&preferences);
        let (movies, series) = self.load_pools(&fingerprint).await?;

        info!(?mode, movies = movies.len(), series = series.len(), "Refreshed pools");
        Ok(())
    }

    /// Ranked search results, see [`SearchService::search`]
    pub async fn search(
        &self,
        query: &str,
        active_genres: &[GenreId],
    ) -> catalog::Result<Vec<ContentItem>> {
        self.search.search(query, active_genres).await
    }

    /// Replace the preferred genres and drop results computed for the old set
    pub async fn set_preferences(&self, genre_ids: &[GenreId]) -> preferences::Result<()> {
        self.preferences.set(genre_ids)?;
        self.preferences_changed().await;
        Ok(())
    }

    pub async fn add_preference(&self, genre_id: GenreId) -> preferences::Result<()> {
        self.preferences.add(genre_id)?;
        self.preferences_changed().await;
        Ok(())
    }

    pub async fn remove_preference(&self, genre_id: GenreId) -> preferences::Result<()> {
        self.preferences.remove(genre_id)?;
        self.preferences_changed().await;
        Ok(())
    }

    async fn preferences_changed(&self) {
        self.cache.clear_personalized().await;
        self.search.clear_cache();
        debug!("Preferences changed, cleared personalized pools and searches");
    }
}
