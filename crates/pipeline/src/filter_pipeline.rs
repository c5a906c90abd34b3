//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::context::RankingContext;
use crate::traits::Filter;
use catalog::ContentItem;
use tracing;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(DedupFilter)
///     .add_filter(ActiveGenreFilter);
///
/// let filtered = pipeline.apply(items, &context);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Apply all filters in sequence to the items.
    ///
    /// ## Algorithm
    /// 1. Start with the input items
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered list
    pub fn apply(&self, items: Vec<ContentItem>, context: &RankingContext) -> Vec<ContentItem> {
        let mut current = items;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, context);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{DedupFilter, RequiredGenreFilter};

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let items = vec![ContentItem::movie(1, "A"), ContentItem::movie(2, "B")];

        let filtered = pipeline.apply(items, &RankingContext::new());
        assert_eq!(filtered.len(), 2);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_filters_run_in_order() {
        let pipeline = FilterPipeline::new()
            .add_filter(DedupFilter)
            .add_filter(RequiredGenreFilter::new(28));

        let items = vec![
            ContentItem::movie(1, "Action").with_genres([28]),
            ContentItem::movie(1, "Action again").with_genres([28]),
            ContentItem::movie(2, "Drama").with_genres([18]),
        ];

        let filtered = pipeline.apply(items, &RankingContext::new());
        assert_eq!(pipeline.len(), 2);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Action");
    }
}
