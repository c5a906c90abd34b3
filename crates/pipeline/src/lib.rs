//! Filtering and ranking of catalog items.
//!
//! This crate provides:
//! - Filter trait and implementations for trimming item lists
//! - FilterPipeline for composing filters
//! - Scoring functions and stable top-N ranking helpers
//!
//! ## Architecture
//! Recommendation categories and search results go through the same stages:
//! 1. Filters drop duplicates and items outside the requested genres
//! 2. Items are scored in parallel and sorted, highest first
//! 3. The top N are kept
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, RankingContext};
//! use pipeline::filters::*;
//! use pipeline::scoring::top_for_preferences;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(DedupFilter)
//!     .add_filter(ActiveGenreFilter);
//!
//! let context = RankingContext::new().with_active_genres([28]);
//! let filtered = pipeline.apply(items, &context);
//! let ranked = top_for_preferences(filtered, &[28, 12, 16], 20);
//! ```

pub mod context;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod scoring;

// Re-export main types
pub use context::RankingContext;
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use scoring::{
    ScoredItem, personalized_score, rank_by, rank_search_results, search_score,
    top_by_popularity, top_by_rating, top_for_preferences,
};
