//! Catalog data: typed records, the metadata API gateway and the home feed.

mod feed;
mod models;
mod tmdb;

pub use feed::{CatalogSlice, FeedSection, HomeFeed, SliceItems};
pub use models::{CatalogPage, MovieSummary, SeriesSummary, image_url};
pub use tmdb::TmdbGateway;

use crate::error::FetchError;

/// One operation per catalog slice.
///
/// Operations share no mutable state and may be awaited concurrently;
/// responses can complete in any order relative to issuance.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn trending_movies(&self) -> Result<CatalogPage<MovieSummary>, FetchError>;
    async fn trending_series(&self) -> Result<CatalogPage<SeriesSummary>, FetchError>;
    async fn popular(&self) -> Result<CatalogPage<MovieSummary>, FetchError>;
    async fn upcoming(&self) -> Result<CatalogPage<MovieSummary>, FetchError>;
    async fn top_rated(&self) -> Result<CatalogPage<MovieSummary>, FetchError>;
    async fn discover(&self) -> Result<CatalogPage<MovieSummary>, FetchError>;
    async fn search(&self, query: &str) -> Result<CatalogPage<MovieSummary>, FetchError>;
}
