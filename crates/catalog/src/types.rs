//! Core domain types for catalog content.
//!
//! Movies and series share one struct; the `media_type` discriminator is set
//! explicitly when an item is built and is part of its identity.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Upstream-assigned identifier, unique only within one media type
pub type ContentId = u64;

/// Identifier into the genre reference table
pub type GenreId = u32;

// =============================================================================
// Media Type
// =============================================================================

/// Discriminator between the two kinds of content the catalog serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    /// Path segment the catalog API uses for this media type
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "tv",
        }
    }

    pub fn all() -> [MediaType; 2] {
        [MediaType::Movie, MediaType::Series]
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Series => write!(f, "series"),
        }
    }
}

// =============================================================================
// Content Item
// =============================================================================

/// Identity of a content item: the numeric id alone is not unique, the same
/// number can name both a movie and a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub id: ContentId,
    pub media_type: MediaType,
}

/// A movie or a series as returned by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub media_type: MediaType,
    /// Movie title or series name
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: String,
    /// Release date for movies, first-air date for series (`YYYY-MM-DD`)
    pub release_date: Option<String>,
    /// Average rating, 0.0 - 10.0
    pub vote_average: f32,
    pub vote_count: u32,
    /// Upstream popularity, unbounded
    pub popularity: f32,
    pub genre_ids: Vec<GenreId>,
}

impl ContentItem {
    /// Build a movie with the given identity and title; remaining fields
    /// start empty.
    pub fn movie(id: ContentId, title: impl Into<String>) -> Self {
        Self::with_media_type(id, MediaType::Movie, title)
    }

    /// Build a series with the given identity and name.
    pub fn series(id: ContentId, title: impl Into<String>) -> Self {
        Self::with_media_type(id, MediaType::Series, title)
    }

    fn with_media_type(id: ContentId, media_type: MediaType, title: impl Into<String>) -> Self {
        Self {
            id,
            media_type,
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            genre_ids: Vec::new(),
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey {
            id: self.id,
            media_type: self.media_type,
        }
    }

    pub fn has_genre(&self, genre: GenreId) -> bool {
        self.genre_ids.contains(&genre)
    }

    /// Release (or first-air) year, if the date is present and well formed
    pub fn year(&self) -> Option<u16> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }

    // Builder-style setters, mostly used when assembling fixtures

    pub fn with_genres(mut self, genre_ids: impl Into<Vec<GenreId>>) -> Self {
        self.genre_ids = genre_ids.into();
        self
    }

    pub fn with_rating(mut self, vote_average: f32, vote_count: u32) -> Self {
        self.vote_average = vote_average;
        self.vote_count = vote_count;
        self
    }

    pub fn with_popularity(mut self, popularity: f32) -> Self {
        self.popularity = popularity;
        self
    }

    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }
}

// =============================================================================
// Genre
// =============================================================================

/// Immutable (id, name) pair from the catalog's genre metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

impl Genre {
    pub fn new(id: GenreId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// =============================================================================
// Paging and query parameters
// =============================================================================

/// One page of results from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl<T> Page<T> {
    /// A single page holding `results`
    pub fn single(results: Vec<T>) -> Self {
        let total = results.len() as u32;
        Self {
            page: 1,
            results,
            total_pages: 1,
            total_results: total,
        }
    }

    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

/// Sort orders supported by the discover endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    PopularityDesc,
    RatingDesc,
    ReleaseDateDesc,
}

impl SortKey {
    /// Value of the `sort_by` query parameter for this sort and media type
    pub fn as_query(&self, media_type: MediaType) -> &'static str {
        match (self, media_type) {
            (SortKey::PopularityDesc, _) => "popularity.desc",
            (SortKey::RatingDesc, _) => "vote_average.desc",
            (SortKey::ReleaseDateDesc, MediaType::Movie) => "primary_release_date.desc",
            (SortKey::ReleaseDateDesc, MediaType::Series) => "first_air_date.desc",
        }
    }
}

/// One hit from a multi-type search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchHit {
    /// A movie or series
    Title(ContentItem),
    /// A person (actor, director, ...), never surfaced as content
    Person { id: ContentId, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_different_media_type_has_distinct_key() {
        let movie = ContentItem::movie(42, "Film");
        let series = ContentItem::series(42, "Show");
        assert_ne!(movie.key(), series.key());
        assert_eq!(movie.key(), ContentItem::movie(42, "Other title").key());
    }

    #[test]
    fn test_year_from_release_date() {
        let item = ContentItem::movie(1, "Film").with_release_date("1999-03-31");
        assert_eq!(item.year(), Some(1999));
        assert_eq!(ContentItem::movie(2, "Undated").year(), None);
    }

    #[test]
    fn test_release_sort_depends_on_media_type() {
        assert_eq!(
            SortKey::ReleaseDateDesc.as_query(MediaType::Movie),
            "primary_release_date.desc"
        );
        assert_eq!(
            SortKey::ReleaseDateDesc.as_query(MediaType::Series),
            "first_air_date.desc"
        );
    }
}
