//! Scoring and ranking of content items.
//!
//! Every ranking here is a stable descending sort: items with equal scores
//! keep their input order, so repeated calls over the same input always
//! produce the same list.

use catalog::{ContentItem, GenreId};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Weight of genre overlap in the personalized score
const GENRE_WEIGHT: f32 = 0.7;
/// Weight of the normalized rating in the personalized score
const RATING_WEIGHT: f32 = 0.3;

/// Weights of the search score without preferences
const SEARCH_POPULARITY_WEIGHT: f32 = 0.3;
const SEARCH_RATING_WEIGHT: f32 = 0.7;

/// An item together with the score it was ranked by
#[derive(Debug, Clone)]
pub struct ScoredItem {
    pub item: ContentItem,
    pub score: f32,
}

/// Personalized score used by "For You" and by search when the user has
/// preferences.
///
/// `0.7 * (matching preferred genres / preferred genre count) + 0.3 * (rating / 10)`
pub fn personalized_score(preferences: &[GenreId], item: &ContentItem) -> f32 {
    let preferred: HashSet<GenreId> = preferences.iter().copied().collect();
    let overlap_ratio = if preferred.is_empty() {
        0.0
    } else {
        let matching = preferred.iter().filter(|&&g| item.has_genre(g)).count();
        matching as f32 / preferred.len() as f32
    };
    GENRE_WEIGHT * overlap_ratio + RATING_WEIGHT * (item.vote_average / 10.0)
}

/// Search score without preferences: `0.3 * popularity + 0.7 * rating`
pub fn search_score(item: &ContentItem) -> f32 {
    SEARCH_POPULARITY_WEIGHT * item.popularity + SEARCH_RATING_WEIGHT * item.vote_average
}

/// NaN sorts as 0 so a bad upstream value cannot jump to the top
fn sanitize(score: f32) -> f32 {
    if score.is_nan() { 0.0 } else { score }
}

fn descending(a: f32, b: f32) -> Ordering {
    sanitize(b).total_cmp(&sanitize(a))
}

/// Score every item in parallel and sort by score, highest first.
pub fn rank_by<F>(items: Vec<ContentItem>, score: F) -> Vec<ScoredItem>
where
    F: Fn(&ContentItem) -> f32 + Sync,
{
    // par_iter().map().collect() keeps input order, so the stable sort
    // below still breaks ties by input position
    let mut scored: Vec<ScoredItem> = items
        .into_par_iter()
        .map(|item| {
            let score = score(&item);
            ScoredItem { item, score }
        })
        .collect();

    scored.sort_by(|a, b| descending(a.score, b.score));
    scored
}

fn top(scored: Vec<ScoredItem>, limit: usize) -> Vec<ContentItem> {
    scored
        .into_iter()
        .take(limit)
        .map(|scored| scored.item)
        .collect()
}

/// Highest popularity first, at most `limit` items
pub fn top_by_popularity(items: Vec<ContentItem>, limit: usize) -> Vec<ContentItem> {
    top(rank_by(items, |item| item.popularity), limit)
}

/// Highest rating first, at most `limit` items
pub fn top_by_rating(items: Vec<ContentItem>, limit: usize) -> Vec<ContentItem> {
    top(rank_by(items, |item| item.vote_average), limit)
}

/// Highest [`personalized_score`] first, at most `limit` items
pub fn top_for_preferences(
    items: Vec<ContentItem>,
    preferences: &[GenreId],
    limit: usize,
) -> Vec<ContentItem> {
    top(
        rank_by(items, |item| personalized_score(preferences, item)),
        limit,
    )
}

/// Order search results: by the personalized score when there are
/// preferences, otherwise by [`search_score`].
pub fn rank_search_results(items: Vec<ContentItem>, preferences: &[GenreId]) -> Vec<ContentItem> {
    let limit = items.len();
    if preferences.is_empty() {
        top(rank_by(items, search_score), limit)
    } else {
        top_for_preferences(items, preferences, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_items() -> Vec<ContentItem> {
        vec![
            ContentItem::movie(1, "Popular")
                .with_popularity(500.0)
                .with_rating(6.0, 1000)
                .with_genres([28]),
            ContentItem::movie(2, "Acclaimed")
                .with_popularity(20.0)
                .with_rating(9.0, 5000)
                .with_genres([18]),
            ContentItem::series(3, "Middling")
                .with_popularity(100.0)
                .with_rating(7.5, 300)
                .with_genres([28, 12]),
        ]
    }

    fn ids(items: &[ContentItem]) -> Vec<u64> {
        items.iter().map(|item| item.id).collect()
    }

    #[test]
    fn test_personalized_score() {
        let item = ContentItem::movie(1, "A").with_genres([28, 35]).with_rating(8.0, 10);
        // 1 of 2 preferences matched, rating 8/10
        let score = personalized_score(&[28, 12], &item);
        assert!((score - (0.7 * 0.5 + 0.3 * 0.8)).abs() < 1e-6);

        // No preferences: only the rating term remains
        assert!((personalized_score(&[], &item) - 0.24).abs() < 1e-6);
    }

    #[test]
    fn test_top_by_popularity_and_rating() {
        assert_eq!(ids(&top_by_popularity(create_test_items(), 10)), vec![1, 3, 2]);
        assert_eq!(ids(&top_by_rating(create_test_items(), 2)), vec![2, 3]);
    }

    #[test]
    fn test_top_for_preferences() {
        let ranked = top_for_preferences(create_test_items(), &[28, 12], 10);
        // item 3 matches both genres, item 1 one, item 2 none
        assert_eq!(ids(&ranked), vec![3, 1, 2]);
    }

    #[test]
    fn test_search_ranking_without_preferences() {
        let ranked = rank_search_results(create_test_items(), &[]);
        // 0.3*500+0.7*6 = 154.2, 0.3*100+0.7*7.5 = 35.25, 0.3*20+0.7*9 = 12.3
        assert_eq!(ids(&ranked), vec![1, 3, 2]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items: Vec<ContentItem> = (1..=20)
            .map(|id| ContentItem::movie(id, "Same").with_popularity(5.0))
            .collect();

        let first = top_by_popularity(items.clone(), 20);
        let second = top_by_popularity(items, 20);
        assert_eq!(ids(&first), (1..=20).collect::<Vec<_>>());
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_nan_scores_sort_as_zero() {
        let items = vec![
            ContentItem::movie(1, "Broken").with_popularity(f32::NAN),
            ContentItem::movie(2, "Fine").with_popularity(1.0),
        ];
        assert_eq!(ids(&top_by_popularity(items, 2)), vec![2, 1]);
    }
}
