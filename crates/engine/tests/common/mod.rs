//! Shared fixtures: an in-memory catalog and engine builders.

#![allow(dead_code)]

use async_trait::async_trait;
use catalog::{
    CatalogClient, CatalogError, ContentItem, Genre, GenreId, GenreTable, MediaType, Page,
    Result, SearchHit, SortKey,
};
use engine::{EngineConfig, RecommendationEngine};
use parking_lot::Mutex;
use preferences::{GenrePreferenceStore, LocalProfileStore, MemoryProfileStore};
use std::cmp::Ordering as CmpOrdering;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const PAGE_SIZE: usize = 5;

const GENRE_CYCLE: [&[GenreId]; 6] = [&[28, 12], &[12, 16], &[16, 35], &[18], &[35, 80], &[28, 18]];

/// Twelve items of one media type with distinct popularity values
pub fn sample_pool(media_type: MediaType) -> Vec<ContentItem> {
    (1..=12u64)
        .map(|id| {
            let item = match media_type {
                MediaType::Movie => ContentItem::movie(id, format!("Movie {id}")),
                MediaType::Series => ContentItem::series(id, format!("Show {id}")),
            };
            item.with_genres(GENRE_CYCLE[(id % 6) as usize].to_vec())
                .with_popularity((id * 13 % 50) as f32 * 10.0)
                .with_rating((id * 7 % 10) as f32 + 0.5, 100 * id as u32)
                .with_release_date(format!("20{:02}-01-01", id + 10))
        })
        .collect()
}

fn by_popularity(a: &ContentItem, b: &ContentItem) -> CmpOrdering {
    b.popularity.partial_cmp(&a.popularity).unwrap()
}

fn by_rating(a: &ContentItem, b: &ContentItem) -> CmpOrdering {
    b.vote_average.partial_cmp(&a.vote_average).unwrap()
}

fn page_of(items: Vec<ContentItem>, page: u32) -> Page<ContentItem> {
    let total_results = items.len() as u32;
    let start = page.saturating_sub(1) as usize * PAGE_SIZE;
    Page {
        page,
        results: items.into_iter().skip(start).take(PAGE_SIZE).collect(),
        total_pages: total_results.div_ceil(PAGE_SIZE as u32),
        total_results,
    }
}

/// One list or discover request received by [`FakeCatalog`]
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    Popular(MediaType, u32),
    TopRated(MediaType, u32),
    Current(MediaType, u32),
    Discover(MediaType, Vec<GenreId>, u32, SortKey),
}

/// Send test logs to the harness writer, once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Catalog backed by fixed pools that records calls and can be made to fail
pub struct FakeCatalog {
    movies: Vec<ContentItem>,
    series: Vec<ContentItem>,
    search_hits: Mutex<Vec<SearchHit>>,
    failure: Mutex<Option<CatalogError>>,
    pool_calls: AtomicUsize,
    search_calls: AtomicUsize,
    calls: Mutex<Vec<CatalogCall>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        init_tracing();
        Self {
            movies: sample_pool(MediaType::Movie),
            series: sample_pool(MediaType::Series),
            search_hits: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            pool_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_search_hits(self, hits: Vec<SearchHit>) -> Self {
        *self.search_hits.lock() = hits;
        self
    }

    /// Every following call fails with `error` until cleared
    pub fn fail_with(&self, error: CatalogError) {
        *self.failure.lock() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// Calls to the list and discover endpoints
    pub fn pool_calls(&self) -> usize {
        self.pool_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// List and discover requests, in the order they were issued
    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().clone()
    }

    /// Genre lists passed to discover, in call order
    pub fn discover_genres(&self) -> Vec<Vec<GenreId>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CatalogCall::Discover(_, genres, _, _) => Some(genres),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: CatalogCall) {
        self.calls.lock().push(call);
    }

    fn pool(&self, media_type: MediaType) -> Vec<ContentItem> {
        match media_type {
            MediaType::Movie => self.movies.clone(),
            MediaType::Series => self.series.clone(),
        }
    }

    fn check(&self, counter: &AtomicUsize) -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn popular(&self, media_type: MediaType, page: u32) -> Result<Page<ContentItem>> {
        self.record(CatalogCall::Popular(media_type, page));
        self.check(&self.pool_calls)?;
        let mut items = self.pool(media_type);
        items.sort_by(by_popularity);
        Ok(page_of(items, page))
    }

    async fn top_rated(&self, media_type: MediaType, page: u32) -> Result<Page<ContentItem>> {
        self.record(CatalogCall::TopRated(media_type, page));
        self.check(&self.pool_calls)?;
        let mut items = self.pool(media_type);
        items.sort_by(by_rating);
        Ok(page_of(items, page))
    }

    async fn now_playing_or_on_the_air(
        &self,
        media_type: MediaType,
        page: u32,
    ) -> Result<Page<ContentItem>> {
        self.record(CatalogCall::Current(media_type, page));
        self.check(&self.pool_calls)?;
        Ok(page_of(self.pool(media_type), page))
    }

    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_ids: &[GenreId],
        page: u32,
        sort: SortKey,
    ) -> Result<Page<ContentItem>> {
        self.record(CatalogCall::Discover(media_type, genre_ids.to_vec(), page, sort));
        self.check(&self.pool_calls)?;

        let mut items: Vec<ContentItem> = self
            .pool(media_type)
            .into_iter()
            .filter(|item| genre_ids.iter().any(|&g| item.has_genre(g)))
            .collect();
        match sort {
            SortKey::PopularityDesc => items.sort_by(by_popularity),
            SortKey::RatingDesc => items.sort_by(by_rating),
            SortKey::ReleaseDateDesc => items.reverse(),
        }
        Ok(page_of(items, page))
    }

    async fn search_multi(&self, _query: &str, _page: u32) -> Result<Page<SearchHit>> {
        self.check(&self.search_calls)?;
        Ok(Page::single(self.search_hits.lock().clone()))
    }

    async fn genre_list(&self) -> Result<Vec<Genre>> {
        Ok(GenreTable::bundled().genres())
    }
}

pub fn preference_store(genres: &[GenreId]) -> Arc<GenrePreferenceStore> {
    let profile = Arc::new(MemoryProfileStore::new());
    profile.set_favorite_genres(genres).unwrap();
    Arc::new(GenrePreferenceStore::new(profile, Arc::new(GenreTable::bundled())))
}

pub fn engine_with(catalog: Arc<FakeCatalog>, genres: &[GenreId]) -> RecommendationEngine {
    RecommendationEngine::new(catalog, preference_store(genres))
}

pub fn engine_with_config(
    catalog: Arc<FakeCatalog>,
    genres: &[GenreId],
    config: EngineConfig,
) -> RecommendationEngine {
    RecommendationEngine::with_config(catalog, preference_store(genres), config)
}
