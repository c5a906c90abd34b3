//! Filter to keep only items matching the genre filters chosen on the
//! search screen.

use crate::context::RankingContext;
use crate::traits::Filter;
use catalog::ContentItem;

/// Keeps items sharing at least one genre with `context.active_genres`.
///
/// ## Algorithm
/// 1. No active genres: every item passes
/// 2. Otherwise keep items with at least one overlapping genre id
pub struct ActiveGenreFilter;

impl Filter for ActiveGenreFilter {
    fn name(&self) -> &str {
        "ActiveGenreFilter"
    }

    fn apply(&self, items: Vec<ContentItem>, context: &RankingContext) -> Vec<ContentItem> {
        if context.active_genres.is_empty() {
            return items;
        }

        items
            .into_iter()
            .filter(|item| {
                item.genre_ids
                    .iter()
                    .any(|genre| context.active_genres.contains(genre))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_items() -> Vec<ContentItem> {
        vec![
            ContentItem::movie(1, "Action Movie").with_genres([28, 12]),
            ContentItem::movie(2, "Drama Movie").with_genres([18]),
            ContentItem::series(3, "Sci-Fi Show").with_genres([10765]),
            ContentItem::movie(4, "No Genres"),
        ]
    }

    #[test]
    fn test_active_genre_filter() {
        let context = RankingContext::new().with_active_genres([12, 18]);

        let filtered = ActiveGenreFilter.apply(create_test_items(), &context);

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().any(|item| item.id == 1));
        assert!(filtered.iter().any(|item| item.id == 2));
    }

    #[test]
    fn test_no_active_genres_passes_everything() {
        let filtered = ActiveGenreFilter.apply(create_test_items(), &RankingContext::new());
        assert_eq!(filtered.len(), 4);
    }
}
