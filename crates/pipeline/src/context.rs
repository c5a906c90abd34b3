//! Per-request inputs shared by filters and ranking.

use catalog::GenreId;

/// What the current request knows about the user and the active filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingContext {
    /// Preferred genres in selection order
    pub preferred_genres: Vec<GenreId>,
    /// Genre filters chosen on the search screen
    pub active_genres: Vec<GenreId>,
}

impl RankingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferred_genres(mut self, genres: impl Into<Vec<GenreId>>) -> Self {
        self.preferred_genres = genres.into();
        self
    }

    pub fn with_active_genres(mut self, genres: impl Into<Vec<GenreId>>) -> Self {
        self.active_genres = genres.into();
        self
    }

    pub fn has_preferences(&self) -> bool {
        !self.preferred_genres.is_empty()
    }
}
