//! Recommendation and search core for the catalog app.
//!
//! This crate ties the catalog client, the preference store and the ranking
//! pipeline together:
//! - `RecommendationCache`: time-bounded pools per media type and genre set
//! - `RecommendationEngine`: general or personalized categories
//! - `SearchService`: gated, cached and ranked search
//!
//! ## Example Usage
//! ```ignore
//! use engine::RecommendationEngine;
//!
//! let engine = RecommendationEngine::new(client, preferences);
//! let recommendations = engine.get_recommendations().await;
//! for category in &recommendations.categories {
//!     println!("{} ({} items)", category.title, category.items.len());
//! }
//! ```

pub mod cache;
pub mod categories;
pub mod config;
pub mod recommender;
pub mod search;

pub use cache::{CacheEntry, Fingerprint, PoolKind, RecommendationCache, SlotStats};
pub use categories::Category;
pub use config::EngineConfig;
pub use recommender::{
    PreferencesView, RecommendationEngine, RecommendationMode, Recommendations,
};
pub use search::{SearchCache, SearchKey, SearchService};
