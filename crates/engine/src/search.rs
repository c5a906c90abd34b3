//! Interactive search with a bounded result cache.
//!
//! Results are cached per normalized query and genre filter combination.
//! The cache evicts in insertion order: a lookup never refreshes an entry's
//! position, so the oldest inserted query always goes first.

use crate::config::EngineConfig;
use catalog::{CatalogClient, ContentItem, GenreId, Result, SearchHit};
use parking_lot::Mutex;
use pipeline::filters::{ActiveGenreFilter, DedupFilter};
use pipeline::{FilterPipeline, RankingContext, rank_search_results};
use preferences::GenrePreferenceStore;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Composite cache key: lower-cased trimmed query, then the sorted filter
/// ids joined by commas (`"batman:28,80"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey(String);

impl SearchKey {
    pub fn new(query: &str, active_genres: &[GenreId]) -> Self {
        let mut genres = active_genres.to_vec();
        genres.sort_unstable();
        genres.dedup();
        let genres: Vec<String> = genres.iter().map(|id| id.to_string()).collect();

        Self(format!("{}:{}", query.trim().to_lowercase(), genres.join(",")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounded map of ranked results, evicting the oldest insertion first
#[derive(Debug)]
pub struct SearchCache {
    capacity: usize,
    entries: HashMap<SearchKey, Vec<ContentItem>>,
    order: VecDeque<SearchKey>,
}

impl SearchCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Look up a key without changing its eviction position
    pub fn get(&self, key: &SearchKey) -> Option<&Vec<ContentItem>> {
        self.entries.get(key)
    }

    /// Store results under `key`, returning the key evicted to stay within
    /// capacity, if any. Replacing an existing key keeps its position.
    pub fn insert(&mut self, key: SearchKey, results: Vec<ContentItem>) -> Option<SearchKey> {
        if self.entries.insert(key.clone(), results).is_none() {
            self.order.push_back(key);
        }

        let mut evicted = None;
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                evicted = Some(oldest);
            }
        }
        evicted
    }

    pub fn contains(&self, key: &SearchKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys from oldest to newest insertion
    pub fn keys(&self) -> impl Iterator<Item = &SearchKey> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Search flow: gate, cache, fetch, filter, rank, store
pub struct SearchService {
    client: Arc<dyn CatalogClient>,
    preferences: Arc<GenrePreferenceStore>,
    cache: Mutex<SearchCache>,
    filters: FilterPipeline,
    config: EngineConfig,
}

impl SearchService {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        preferences: Arc<GenrePreferenceStore>,
        config: EngineConfig,
    ) -> Self {
        let filters = FilterPipeline::new()
            .add_filter(DedupFilter)
            .add_filter(ActiveGenreFilter);

        Self {
            client,
            preferences,
            cache: Mutex::new(SearchCache::new(config.search_cache_capacity)),
            filters,
            config,
        }
    }

    /// Ranked movie and series results for `query`.
    ///
    /// Queries shorter than the configured minimum after trimming return an
    /// empty list without contacting the catalog. Upstream failures are
    /// returned as errors and never cached.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, active_genres: &[GenreId]) -> Result<Vec<ContentItem>> {
        let query = query.trim();
        if query.chars().count() < self.config.min_query_len {
            debug!("Query too short, not searching");
            return Ok(Vec::new());
        }

        let key = SearchKey::new(query, active_genres);
        let cached = self.cache.lock().get(&key).cloned();
        if let Some(results) = cached {
            debug!(%key, results = results.len(), "Search cache hit");
            return Ok(results);
        }

        let page = self.client.search_multi(query, 1).await?;
        let items: Vec<ContentItem> = page
            .results
            .into_iter()
            .filter_map(|hit| match hit {
                SearchHit::Title(item) => Some(item),
                SearchHit::Person { .. } => None,
            })
            .take(self.config.search_result_limit)
            .collect();

        let context = RankingContext::new()
            .with_preferred_genres(self.preferred_genres())
            .with_active_genres(active_genres.to_vec());
        let filtered = self.filters.apply(items, &context);
        let ranked = rank_search_results(filtered, &context.preferred_genres);

        info!(%key, results = ranked.len(), "Search completed");
        if let Some(evicted) = self.cache.lock().insert(key, ranked.clone()) {
            debug!(%evicted, "Evicted oldest search");
        }
        Ok(ranked)
    }

    fn preferred_genres(&self) -> Vec<GenreId> {
        match self.preferences.get() {
            Ok(genres) => genres,
            Err(err) => {
                warn!(error = %err, "Could not read preferences, ranking without them");
                Vec::new()
            }
        }
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}
