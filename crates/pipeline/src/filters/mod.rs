//! Filter implementations for the item pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod active_genre;
pub mod dedup;
pub mod required_genre;

// Re-export for convenience
pub use active_genre::ActiveGenreFilter;
pub use dedup::DedupFilter;
pub use required_genre::RequiredGenreFilter;
