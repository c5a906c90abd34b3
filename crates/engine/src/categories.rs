//! Assembly of the named categories shown on the home screen.

use catalog::{ContentItem, GenreId, GenreTable};
use pipeline::filters::RequiredGenreFilter;
use pipeline::{
    FilterPipeline, RankingContext, top_by_popularity, top_by_rating, top_for_preferences,
};
use serde::Serialize;

/// A titled group of items, rebuilt on every recommendation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// Stable key for the UI
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub items: Vec<ContentItem>,
}

impl Category {
    fn new(id: impl Into<String>, title: impl Into<String>, items: Vec<ContentItem>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            items,
        }
    }

    fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

/// Categories without preferences: popular and top rated, per media type
pub fn general_categories(
    movies: Vec<ContentItem>,
    series: Vec<ContentItem>,
    size: usize,
) -> Vec<Category> {
    vec![
        Category::new("popular_movies", "Popular Movies", top_by_popularity(movies.clone(), size)),
        Category::new("top_rated_movies", "Top Rated Movies", top_by_rating(movies, size)),
        Category::new("popular_series", "Popular TV Shows", top_by_popularity(series.clone(), size)),
        Category::new("top_rated_series", "Top Rated TV Shows", top_by_rating(series, size)),
    ]
}

/// Categories for a user with enough preferences.
///
/// ## Order
/// 1. "For You": both media types ranked by genre overlap and rating
/// 2. "Trending Now": both media types by popularity, ignoring preferences
/// 3. "Best {genre}" for the first `genre_categories` preferred genres, in
///    selection order, skipped when no item carries the genre
pub fn personalized_categories(
    movies: Vec<ContentItem>,
    series: Vec<ContentItem>,
    preferences: &[GenreId],
    genres: &GenreTable,
    size: usize,
    genre_categories: usize,
) -> Vec<Category> {
    let mut combined = movies;
    combined.extend(series);

    let mut categories = vec![
        Category::new(
            "for_you",
            "For You",
            top_for_preferences(combined.clone(), preferences, size),
        )
        .with_subtitle("Based on your favorite genres"),
        Category::new("trending", "Trending Now", top_by_popularity(combined.clone(), size))
            .with_subtitle("What everyone is watching"),
    ];

    for &genre in preferences.iter().take(genre_categories) {
        let pipeline = FilterPipeline::new().add_filter(RequiredGenreFilter::new(genre));
        let matching = pipeline.apply(combined.clone(), &RankingContext::new());
        if matching.is_empty() {
            continue;
        }

        let name = genres
            .name(genre)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Genre {genre}"));
        categories.push(
            Category::new(
                format!("best_genre_{genre}"),
                format!("Best {name}"),
                top_by_rating(matching, size),
            )
            .with_subtitle(format!("Top rated {name} titles")),
        );
    }

    categories
}
