//! Upstream catalog client.
//!
//! [`CatalogClient`] is the seam the recommendation engine and search flow
//! depend on; [`TmdbClient`] is the HTTP implementation.

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::{ContentItem, Genre, GenreId, MediaType, Page, SearchHit, SortKey};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

/// Read-only access to paginated catalog data
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Popular titles of one media type
    async fn popular(&self, media_type: MediaType, page: u32) -> Result<Page<ContentItem>>;

    /// Highest rated titles of one media type
    async fn top_rated(&self, media_type: MediaType, page: u32) -> Result<Page<ContentItem>>;

    /// Movies now in theatres, or series currently on the air
    async fn now_playing_or_on_the_air(
        &self,
        media_type: MediaType,
        page: u32,
    ) -> Result<Page<ContentItem>>;

    /// Titles carrying any of `genre_ids`, in the given order
    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_ids: &[GenreId],
        page: u32,
        sort: SortKey,
    ) -> Result<Page<ContentItem>>;

    /// Search across movies, series and people
    async fn search_multi(&self, query: &str, page: u32) -> Result<Page<SearchHit>>;

    /// Movie and series genres combined
    async fn genre_list(&self) -> Result<Vec<Genre>>;
}

/// HTTP client for the TMDB v3 API
pub struct TmdbClient {
    client: Client,
    config: CatalogConfig,
}

impl TmdbClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok(Self::with_client(client, config))
    }

    /// Use an existing reqwest client (its timeout settings are kept)
    pub fn with_client(client: Client, config: CatalogConfig) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key().is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET `path` with the common parameters plus `params`, returning the
    /// body of a successful response.
    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let api_key = self.config.api_key().ok_or(CatalogError::NotConfigured)?;

        debug!(path, "Catalog request");
        let response = self
            .client
            .get(self.url(path))
            .query(&[("api_key", api_key), ("language", self.config.language.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.text().await?);
        }

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse().ok());
                Err(CatalogError::RateLimited { retry_after })
            }
            StatusCode::UNAUTHORIZED => Err(CatalogError::NotConfigured),
            _ => {
                let message = response.text().await.unwrap_or_default();
                Err(CatalogError::Api {
                    status_code: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn list(&self, media_type: MediaType, list: &str, page: u32) -> Result<Page<ContentItem>> {
        let path = format!("/{}/{}", media_type.path_segment(), list);
        let body = self.get(&path, &[("page", page.to_string())]).await?;
        parser::parse_content_page(media_type, &body)
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    #[instrument(skip(self))]
    async fn popular(&self, media_type: MediaType, page: u32) -> Result<Page<ContentItem>> {
        self.list(media_type, "popular", page).await
    }

    #[instrument(skip(self))]
    async fn top_rated(&self, media_type: MediaType, page: u32) -> Result<Page<ContentItem>> {
        self.list(media_type, "top_rated", page).await
    }

    #[instrument(skip(self))]
    async fn now_playing_or_on_the_air(
        &self,
        media_type: MediaType,
        page: u32,
    ) -> Result<Page<ContentItem>> {
        let list = match media_type {
            MediaType::Movie => "now_playing",
            MediaType::Series => "on_the_air",
        };
        self.list(media_type, list, page).await
    }

    #[instrument(skip(self))]
    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_ids: &[GenreId],
        page: u32,
        sort: SortKey,
    ) -> Result<Page<ContentItem>> {
        // `|` is OR in the discover API: any of the genres matches
        let genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("|");
        let path = format!("/discover/{}", media_type.path_segment());
        let body = self
            .get(
                &path,
                &[
                    ("with_genres", genres),
                    ("page", page.to_string()),
                    ("sort_by", sort.as_query(media_type).to_string()),
                ],
            )
            .await?;
        parser::parse_content_page(media_type, &body)
    }

    #[instrument(skip(self))]
    async fn search_multi(&self, query: &str, page: u32) -> Result<Page<SearchHit>> {
        let body = self
            .get(
                "/search/multi",
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;
        parser::parse_multi_page(&body)
    }

    #[instrument(skip(self))]
    async fn genre_list(&self) -> Result<Vec<Genre>> {
        let (movie, series) = tokio::join!(
            self.get("/genre/movie/list", &[]),
            self.get("/genre/tv/list", &[])
        );
        let mut genres = parser::parse_genre_list(&movie?)?;
        genres.extend(parser::parse_genre_list(&series?)?);
        Ok(genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        // Unroutable base URL: reaching the network would yield Network, not NotConfigured
        let config = CatalogConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..CatalogConfig::default()
        };
        let client = TmdbClient::new(config).unwrap();
        assert!(!client.is_configured());

        let err = client.popular(MediaType::Movie, 1).await.unwrap_err();
        assert_eq!(err, CatalogError::NotConfigured);

        let err = client.search_multi("batman", 1).await.unwrap_err();
        assert_eq!(err, CatalogError::NotConfigured);
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let config = CatalogConfig {
            base_url: "https://example.test/3/".to_string(),
            ..CatalogConfig::default()
        };
        let client = TmdbClient::new(config).unwrap();
        assert_eq!(client.url("/movie/popular"), "https://example.test/3/movie/popular");
    }
}
