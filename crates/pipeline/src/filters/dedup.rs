//! Filter to drop repeated items after several result pages are merged.

use crate::context::RankingContext;
use crate::traits::Filter;
use catalog::{ContentItem, ItemKey};
use std::collections::HashSet;

/// Keeps the first occurrence of each (id, media type) pair.
///
/// Earlier items win even when a later duplicate carries different field
/// values, so callers control priority through input order.
pub struct DedupFilter;

impl Filter for DedupFilter {
    fn name(&self) -> &str {
        "DedupFilter"
    }

    fn apply(&self, items: Vec<ContentItem>, _context: &RankingContext) -> Vec<ContentItem> {
        let mut seen: HashSet<ItemKey> = HashSet::with_capacity(items.len());
        items
            .into_iter()
            .filter(|item| seen.insert(item.key()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let items = vec![
            ContentItem::movie(1, "First").with_popularity(10.0),
            ContentItem::movie(2, "Other"),
            ContentItem::movie(1, "Second").with_popularity(99.0),
        ];

        let unique = DedupFilter.apply(items, &RankingContext::new());
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "First");
        assert_eq!(unique[0].popularity, 10.0);
        assert_eq!(unique[1].id, 2);
    }

    #[test]
    fn test_same_id_across_media_types_is_kept() {
        let items = vec![ContentItem::movie(7, "Film"), ContentItem::series(7, "Show")];
        let unique = DedupFilter.apply(items, &RankingContext::new());
        assert_eq!(unique.len(), 2);
    }
}
