//! Filter to keep only items tagged with one specific genre.

use crate::context::RankingContext;
use crate::traits::Filter;
use catalog::{ContentItem, GenreId};

/// Keeps items whose genres include `genre`.
pub struct RequiredGenreFilter {
    genre: GenreId,
}

impl RequiredGenreFilter {
    pub fn new(genre: GenreId) -> Self {
        Self { genre }
    }
}

impl Filter for RequiredGenreFilter {
    fn name(&self) -> &str {
        "RequiredGenreFilter"
    }

    fn apply(&self, items: Vec<ContentItem>, _context: &RankingContext) -> Vec<ContentItem> {
        items
            .into_iter()
            .filter(|item| item.has_genre(self.genre))
            .collect()
    }
}
