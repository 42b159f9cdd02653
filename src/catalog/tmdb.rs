use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::ResultsEnvelope;
use super::{CatalogPage, CatalogProvider, MovieSummary, SeriesSummary};
use crate::config::MetadataConfig;
use crate::error::FetchError;
use crate::http::{HttpClient, parse_url};

/// Gateway for a TMDB-compatible metadata API.
///
/// Constructed explicitly from configuration and passed to consumers;
/// every call builds its URL from the base, a fixed path and the credential.
#[derive(Debug, Clone)]
pub struct TmdbGateway {
    http: HttpClient,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbGateway {
    /// Fails fast on a malformed base URL or an empty credential.
    pub fn new(http: HttpClient, config: &MetadataConfig) -> Result<Self, FetchError> {
        if config.api_key.trim().is_empty() {
            return Err(FetchError::MissingCredential("metadata.api_key"));
        }
        parse_url(&config.base_url)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Listing endpoints that take the language and first page.
    fn listing_endpoint(&self, path: &str) -> String {
        self.endpoint(path, &[("language", self.language.as_str()), ("page", "1")])
    }

    fn discover_endpoint(&self) -> String {
        self.endpoint(
            "/discover/movie",
            &[
                ("language", self.language.as_str()),
                ("sort_by", "popularity.desc"),
                ("include_adult", "false"),
                ("include_video", "false"),
                ("page", "1"),
                ("with_watch_monetization_types", "flatrate"),
            ],
        )
    }

    fn search_endpoint(&self, query: &str) -> Result<String, FetchError> {
        if query.trim().is_empty() {
            return Err(FetchError::InvalidUrl("empty search query".to_string()));
        }
        Ok(self.endpoint("/search/movie", &[("query", query)]))
    }

    async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<CatalogPage<T>, FetchError> {
        let envelope: ResultsEnvelope<T> = self.http.fetch_json(url).await?;
        debug!(count = envelope.results.len(), "Decoded catalog page");
        Ok(envelope.results)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbGateway {
    async fn trending_movies(&self) -> Result<CatalogPage<MovieSummary>, FetchError> {
        self.fetch_page(&self.endpoint("/trending/movie/day", &[])).await
    }

    async fn trending_series(&self) -> Result<CatalogPage<SeriesSummary>, FetchError> {
        self.fetch_page(&self.endpoint("/trending/tv/day", &[])).await
    }

    async fn popular(&self) -> Result<CatalogPage<MovieSummary>, FetchError> {
        self.fetch_page(&self.listing_endpoint("/movie/popular")).await
    }

    async fn upcoming(&self) -> Result<CatalogPage<MovieSummary>, FetchError> {
        self.fetch_page(&self.listing_endpoint("/movie/upcoming")).await
    }

    async fn top_rated(&self) -> Result<CatalogPage<MovieSummary>, FetchError> {
        self.fetch_page(&self.listing_endpoint("/movie/top_rated")).await
    }

    async fn discover(&self) -> Result<CatalogPage<MovieSummary>, FetchError> {
        self.fetch_page(&self.discover_endpoint()).await
    }

    async fn search(&self, query: &str) -> Result<CatalogPage<MovieSummary>, FetchError> {
        let url = self.search_endpoint(query)?;
        self.fetch_page(&url).await
    }
}
