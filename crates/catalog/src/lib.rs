//! # Catalog Crate
//!
//! This crate is the boundary to the upstream movie/TV catalog.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (ContentItem, MediaType, Genre, Page)
//! - **parser**: Decode catalog API payloads into domain types
//! - **genres**: The session-wide genre reference table
//! - **client**: The `CatalogClient` trait and its HTTP implementation
//! - **config**: Client configuration from `TMDB_*` environment variables
//! - **error**: Error kinds for upstream failures
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogClient, CatalogConfig, GenreTable, MediaType, TmdbClient};
//!
//! let client = TmdbClient::new(CatalogConfig::from_env()?)?;
//! let genres = GenreTable::load(&client).await;
//! let page = client.popular(MediaType::Movie, 1).await?;
//!
//! println!("{} popular movies, {} genres", page.results.len(), genres.len());
//! ```

// Public modules
pub mod client;
pub mod config;
pub mod error;
pub mod genres;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use client::{CatalogClient, TmdbClient};
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use genres::GenreTable;
pub use types::{
    // Type aliases
    ContentId,
    GenreId,
    // Core types
    ContentItem,
    Genre,
    ItemKey,
    Page,
    SearchHit,
    // Enums
    MediaType,
    SortKey,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_single() {
        let page = Page::single(vec![ContentItem::movie(1, "A"), ContentItem::movie(2, "B")]);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_results, 2);
        assert!(Page::<ContentItem>::empty().results.is_empty());
    }

    #[test]
    fn test_media_type_path_segments() {
        assert_eq!(MediaType::Movie.path_segment(), "movie");
        assert_eq!(MediaType::Series.path_segment(), "tv");
        assert_eq!(MediaType::all().len(), 2);
    }
}
