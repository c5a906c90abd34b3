//! Parser for catalog API payloads.
//!
//! The upstream API returns movies with a `title`/`release_date` pair and
//! series with a `name`/`first_air_date` pair. We decode each shape into its
//! own raw struct and convert to [`ContentItem`], setting the media type from
//! the endpoint (or from the `media_type` tag on multi-search results).

use crate::error::Result;
use crate::types::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize)]
struct RawPage<T> {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct RawMovie {
    id: ContentId,
    #[serde(default)]
    title: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f32,
    #[serde(default)]
    vote_count: u32,
    #[serde(default)]
    popularity: f32,
    #[serde(default)]
    genre_ids: Vec<GenreId>,
}

#[derive(Debug, Deserialize)]
struct RawSeries {
    id: ContentId,
    #[serde(default)]
    name: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    overview: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    vote_average: f32,
    #[serde(default)]
    vote_count: u32,
    #[serde(default)]
    popularity: f32,
    #[serde(default)]
    genre_ids: Vec<GenreId>,
}

#[derive(Debug, Deserialize)]
struct RawPerson {
    id: ContentId,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
enum RawMultiResult {
    Movie(RawMovie),
    Tv(RawSeries),
    Person(RawPerson),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct RawGenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

/// Upstream sends `""` for unknown dates
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<RawMovie> for ContentItem {
    fn from(raw: RawMovie) -> Self {
        ContentItem {
            poster_path: non_empty(raw.poster_path),
            backdrop_path: non_empty(raw.backdrop_path),
            overview: raw.overview.unwrap_or_default(),
            release_date: non_empty(raw.release_date),
            vote_average: raw.vote_average,
            vote_count: raw.vote_count,
            popularity: raw.popularity,
            genre_ids: raw.genre_ids,
            ..ContentItem::movie(raw.id, raw.title)
        }
    }
}

impl From<RawSeries> for ContentItem {
    fn from(raw: RawSeries) -> Self {
        ContentItem {
            poster_path: non_empty(raw.poster_path),
            backdrop_path: non_empty(raw.backdrop_path),
            overview: raw.overview.unwrap_or_default(),
            release_date: non_empty(raw.first_air_date),
            vote_average: raw.vote_average,
            vote_count: raw.vote_count,
            popularity: raw.popularity,
            genre_ids: raw.genre_ids,
            ..ContentItem::series(raw.id, raw.name)
        }
    }
}

fn parse_page<R, T>(body: &str, convert: impl Fn(R) -> Option<T>) -> Result<Page<T>>
where
    R: DeserializeOwned,
{
    let raw: RawPage<R> = serde_json::from_str(body)?;
    Ok(Page {
        page: raw.page,
        results: raw.results.into_iter().filter_map(convert).collect(),
        total_pages: raw.total_pages,
        total_results: raw.total_results,
    })
}

/// Parse a page of results from a movie list endpoint
pub fn parse_movie_page(body: &str) -> Result<Page<ContentItem>> {
    parse_page(body, |raw: RawMovie| Some(ContentItem::from(raw)))
}

/// Parse a page of results from a series list endpoint
pub fn parse_series_page(body: &str) -> Result<Page<ContentItem>> {
    parse_page(body, |raw: RawSeries| Some(ContentItem::from(raw)))
}

/// Parse a page from the endpoint that serves `media_type`
pub fn parse_content_page(media_type: MediaType, body: &str) -> Result<Page<ContentItem>> {
    match media_type {
        MediaType::Movie => parse_movie_page(body),
        MediaType::Series => parse_series_page(body),
    }
}

/// Parse a multi-search page; result types other than movie, series and
/// person are dropped.
pub fn parse_multi_page(body: &str) -> Result<Page<SearchHit>> {
    parse_page(body, |raw: RawMultiResult| match raw {
        RawMultiResult::Movie(movie) => Some(SearchHit::Title(movie.into())),
        RawMultiResult::Tv(series) => Some(SearchHit::Title(series.into())),
        RawMultiResult::Person(person) => Some(SearchHit::Person {
            id: person.id,
            name: person.name,
        }),
        RawMultiResult::Unknown => None,
    })
}

/// Parse a `{"genres": [...]}` payload
pub fn parse_genre_list(body: &str) -> Result<Vec<Genre>> {
    let raw: RawGenreList = serde_json::from_str(body)?;
    Ok(raw.genres)
}
