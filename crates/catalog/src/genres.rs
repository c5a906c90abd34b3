//! Genre reference table.
//!
//! Loaded once per session from the catalog (movie and series genre lists
//! merged). When the catalog cannot be reached the bundled table below is
//! used instead, so preference validation keeps working offline.

use crate::client::CatalogClient;
use crate::types::{Genre, GenreId};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Standard catalog genres, movie list followed by the series-only entries.
const BUNDLED_GENRES: &[(GenreId, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
    (10759, "Action & Adventure"),
    (10762, "Kids"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
];

/// Immutable id -> name lookup for the session
#[derive(Debug, Clone, Default)]
pub struct GenreTable {
    by_id: BTreeMap<GenreId, String>,
}

impl GenreTable {
    /// Build a table from a list of genres. Later duplicates of an id are
    /// ignored.
    pub fn new(genres: impl IntoIterator<Item = Genre>) -> Self {
        let mut by_id = BTreeMap::new();
        for genre in genres {
            by_id.entry(genre.id).or_insert(genre.name);
        }
        Self { by_id }
    }

    /// The bundled fallback table
    pub fn bundled() -> Self {
        Self::new(
            BUNDLED_GENRES
                .iter()
                .map(|&(id, name)| Genre::new(id, name)),
        )
    }

    /// Fetch the table from the catalog, falling back to the bundled one if
    /// the request fails or comes back empty.
    pub async fn load<C>(client: &C) -> Self
    where
        C: CatalogClient + ?Sized,
    {
        match client.genre_list().await {
            Ok(genres) if !genres.is_empty() => {
                let table = Self::new(genres);
                info!("Loaded {} genres from catalog", table.len());
                table
            }
            Ok(_) => {
                warn!("Catalog returned no genres, using bundled genre table");
                Self::bundled()
            }
            Err(err) => {
                warn!(error = %err, "Genre list unavailable, using bundled genre table");
                Self::bundled()
            }
        }
    }

    pub fn contains(&self, id: GenreId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn name(&self, id: GenreId) -> Option<&str> {
        self.by_id.get(&id).map(|s| s.as_str())
    }

    /// All genres, ordered by id
    pub fn genres(&self) -> Vec<Genre> {
        self.by_id
            .iter()
            .map(|(&id, name)| Genre::new(id, name.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_table_has_standard_genres() {
        let table = GenreTable::bundled();
        assert_eq!(table.name(28), Some("Action"));
        assert_eq!(table.name(10765), Some("Sci-Fi & Fantasy"));
        assert!(!table.contains(1));
        assert_eq!(table.len(), BUNDLED_GENRES.len());
    }

    #[test]
    fn test_first_name_wins_on_duplicate_id() {
        let table = GenreTable::new(vec![Genre::new(16, "Animation"), Genre::new(16, "Cartoons")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.name(16), Some("Animation"));
    }
}
