//! Time-bounded cache of merged catalog pools.
//!
//! There is one slot per media type for general recommendations and one for
//! personalized recommendations. A personalized slot holds the pool of a
//! single genre set at a time; a different set replaces it.
//!
//! Each slot sits behind an async mutex that stays locked while the slot is
//! being populated, so concurrent callers for the same stale slot wait for
//! one upstream round instead of starting their own.

use catalog::{CatalogClient, ContentItem, GenreId, MediaType, Result, SortKey};
use pipeline::filters::DedupFilter;
use pipeline::{Filter, RankingContext};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Identity of the genre set a pool was computed for.
///
/// Order-independent: `[28, 12]` and `[12, 28]` are the same fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fingerprint(BTreeSet<GenreId>);

impl Fingerprint {
    /// The empty set, used for non-personalized pools
    pub fn general() -> Self {
        Self::default()
    }

    pub fn from_genres(genre_ids: &[GenreId]) -> Self {
        Self(genre_ids.iter().copied().collect())
    }

    pub fn is_general(&self) -> bool {
        self.0.is_empty()
    }

    /// Genres in ascending id order
    pub fn genres(&self) -> Vec<GenreId> {
        self.0.iter().copied().collect()
    }

    pub fn kind(&self) -> PoolKind {
        if self.is_general() {
            PoolKind::General
        } else {
            PoolKind::Personalized
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_general() {
            return write!(f, "general");
        }
        let ids: Vec<String> = self.0.iter().map(|id| id.to_string()).collect();
        write!(f, "{}", ids.join(","))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    General,
    Personalized,
}

/// A merged, deduplicated pool and when it was fetched
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub items: Vec<ContentItem>,
    pub fetched_at: Instant,
    pub fingerprint: Fingerprint,
}

impl CacheEntry {
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }
}

/// Snapshot of one populated slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotStats {
    pub media_type: MediaType,
    pub kind: PoolKind,
    pub fingerprint: Fingerprint,
    pub items: usize,
    pub age: Duration,
    pub fresh: bool,
}

type Slot = Mutex<Option<CacheEntry>>;

pub struct RecommendationCache {
    client: Arc<dyn CatalogClient>,
    freshness_window: Duration,
    movie_general: Slot,
    movie_personalized: Slot,
    series_general: Slot,
    series_personalized: Slot,
}

impl RecommendationCache {
    pub fn new(client: Arc<dyn CatalogClient>, freshness_window: Duration) -> Self {
        Self {
            client,
            freshness_window,
            movie_general: Mutex::new(None),
            movie_personalized: Mutex::new(None),
            series_general: Mutex::new(None),
            series_personalized: Mutex::new(None),
        }
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    fn slot(&self, media_type: MediaType, kind: PoolKind) -> &Slot {
        match (media_type, kind) {
            (MediaType::Movie, PoolKind::General) => &self.movie_general,
            (MediaType::Movie, PoolKind::Personalized) => &self.movie_personalized,
            (MediaType::Series, PoolKind::General) => &self.series_general,
            (MediaType::Series, PoolKind::Personalized) => &self.series_personalized,
        }
    }

    fn slots(&self) -> [(MediaType, PoolKind, &Slot); 4] {
        [
            (MediaType::Movie, PoolKind::General, &self.movie_general),
            (MediaType::Movie, PoolKind::Personalized, &self.movie_personalized),
            (MediaType::Series, PoolKind::General, &self.series_general),
            (MediaType::Series, PoolKind::Personalized, &self.series_personalized),
        ]
    }

    /// Merged pool for `media_type` and the genre set `genre_ids` (empty for
    /// general recommendations).
    ///
    /// ## Algorithm
    /// 1. A fresh entry with the same fingerprint is returned as is
    /// 2. Otherwise four pages are fetched concurrently, merged in request
    ///    order and deduplicated (first occurrence wins)
    /// 3. If the fetch fails, an expired entry for the same fingerprint is
    ///    served instead; with no such entry the error is returned
    #[instrument(skip(self, genre_ids), fields(fingerprint))]
    pub async fn get_pool(
        &self,
        media_type: MediaType,
        genre_ids: &[GenreId],
    ) -> Result<Vec<ContentItem>> {
        let fingerprint = Fingerprint::from_genres(genre_ids);
        tracing::Span::current().record("fingerprint", tracing::field::display(&fingerprint));

        let mut slot = self.slot(media_type, fingerprint.kind()).lock().await;

        if let Some(entry) = slot
            .as_ref()
            .filter(|entry| entry.fingerprint == fingerprint)
            .filter(|entry| entry.age() < self.freshness_window)
        {
            debug!(items = entry.items.len(), age = ?entry.age(), "Pool cache hit");
            return Ok(entry.items.clone());
        }
        debug!("Pool cache miss");

        match self.fetch_merged(media_type, &fingerprint).await {
            Ok(items) => {
                info!(items = items.len(), "Populated pool");
                *slot = Some(CacheEntry {
                    items: items.clone(),
                    fetched_at: Instant::now(),
                    fingerprint,
                });
                Ok(items)
            }
            Err(err) => match slot.as_ref().filter(|entry| entry.fingerprint == fingerprint) {
                Some(stale) => {
                    warn!(error = %err, age = ?stale.age(), "Fetch failed, serving stale pool");
                    Ok(stale.items.clone())
                }
                None => Err(err),
            },
        }
    }

    /// Issue the four page requests for one pool and merge them
    async fn fetch_merged(
        &self,
        media_type: MediaType,
        fingerprint: &Fingerprint,
    ) -> Result<Vec<ContentItem>> {
        let client = self.client.as_ref();

        let pages = if fingerprint.is_general() {
            let (popular_1, popular_2, top_rated, current) = tokio::try_join!(
                client.popular(media_type, 1),
                client.popular(media_type, 2),
                client.top_rated(media_type, 1),
                client.now_playing_or_on_the_air(media_type, 1)
            )?;
            [popular_1, popular_2, top_rated, current]
        } else {
            let genres = fingerprint.genres();
            let (popular_1, popular_2, rated, recent) = tokio::try_join!(
                client.discover_by_genre(media_type, &genres, 1, SortKey::PopularityDesc),
                client.discover_by_genre(media_type, &genres, 2, SortKey::PopularityDesc),
                client.discover_by_genre(media_type, &genres, 1, SortKey::RatingDesc),
                client.discover_by_genre(media_type, &genres, 1, SortKey::ReleaseDateDesc)
            )?;
            [popular_1, popular_2, rated, recent]
        };

        let merged: Vec<ContentItem> = pages.into_iter().flat_map(|page| page.results).collect();
        let fetched = merged.len();
        let unique = DedupFilter.apply(merged, &RankingContext::new());
        debug!(fetched, unique = unique.len(), "Merged pool pages");
        Ok(unique)
    }

    /// Drop every slot
    pub async fn clear(&self) {
        for (_, _, slot) in self.slots() {
            *slot.lock().await = None;
        }
        debug!("Cleared recommendation cache");
    }

    /// Drop the personalized slots, keeping the general pools
    pub async fn clear_personalized(&self) {
        for (_, kind, slot) in self.slots() {
            if kind == PoolKind::Personalized {
                *slot.lock().await = None;
            }
        }
        debug!("Cleared personalized pools");
    }

    /// Populated slots; waits for any population in progress
    pub async fn stats(&self) -> Vec<SlotStats> {
        let mut stats = Vec::new();
        for (media_type, kind, slot) in self.slots() {
            if let Some(entry) = slot.lock().await.as_ref() {
                let age = entry.age();
                stats.push(SlotStats {
                    media_type,
                    kind,
                    fingerprint: entry.fingerprint.clone(),
                    items: entry.items.len(),
                    age,
                    fresh: age < self.freshness_window,
                });
            }
        }
        stats
    }
}
