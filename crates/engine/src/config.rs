//! Tunables of the recommendation and search flows.

use preferences::MIN_COMPLETE_PREFERENCES;
use std::time::Duration;

/// Engine configuration; `Default` gives the production values.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Age after which a cached pool is refetched
    pub freshness_window: Duration,
    /// Maximum items per category
    pub category_size: usize,
    /// Preference count at which recommendations become personalized
    pub min_personalized_genres: usize,
    /// Number of preferred genres that get a "Best ..." category
    pub genre_categories: usize,
    /// Maximum number of cached search queries
    pub search_cache_capacity: usize,
    /// Maximum results kept from one upstream search
    pub search_result_limit: usize,
    /// Shorter trimmed queries never reach the catalog
    pub min_query_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            freshness_window: Duration::from_secs(5 * 60),
            category_size: 20,
            min_personalized_genres: MIN_COMPLETE_PREFERENCES,
            genre_categories: 2,
            search_cache_capacity: 10,
            search_result_limit: 20,
            min_query_len: 3,
        }
    }
}

impl EngineConfig {
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn with_category_size(mut self, size: usize) -> Self {
        self.category_size = size;
        self
    }

    pub fn with_min_personalized_genres(mut self, count: usize) -> Self {
        self.min_personalized_genres = count;
        self
    }

    pub fn with_genre_categories(mut self, count: usize) -> Self {
        self.genre_categories = count;
        self
    }

    pub fn with_search_cache_capacity(mut self, capacity: usize) -> Self {
        self.search_cache_capacity = capacity;
        self
    }

    pub fn with_search_result_limit(mut self, limit: usize) -> Self {
        self.search_result_limit = limit;
        self
    }

    pub fn with_min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.freshness_window, Duration::from_secs(300));
        assert_eq!(config.category_size, 20);
        assert_eq!(config.min_personalized_genres, 3);
        assert_eq!(config.search_cache_capacity, 10);
        assert_eq!(config.min_query_len, 3);
    }

    #[test]
    fn test_builder_setters() {
        let config = EngineConfig::default()
            .with_category_size(5)
            .with_search_cache_capacity(2);
        assert_eq!(config.category_size, 5);
        assert_eq!(config.search_cache_capacity, 2);
        assert_eq!(config.genre_categories, 2);
    }
}
