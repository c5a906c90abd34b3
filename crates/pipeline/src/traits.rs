//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to lists of content items.

use crate::context::RankingContext;
use catalog::ContentItem;

/// Core trait for filtering content items.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across tasks
/// - Filters take ownership of the Vec<ContentItem> and return a filtered Vec
/// - Relative order of the items that survive is preserved
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a list of items.
    ///
    /// # Arguments
    /// * `items` - The items to filter (takes ownership)
    /// * `context` - Preferences and active filters of the current request
    fn apply(&self, items: Vec<ContentItem>, context: &RankingContext) -> Vec<ContentItem>;
}
