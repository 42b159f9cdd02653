//! JSON-over-HTTPS fetch-and-decode primitive shared by the gateways.

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;

const USER_AGENT: &str = concat!("cinelist/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around a shared `reqwest::Client`.
///
/// Every call is a fresh GET with no caching, retry or rate limiting.
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch `url` and decode the body as `T`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let url = parse_url(url)?;

        debug!(host = url.host_str().unwrap_or(""), path = url.path(), "GET");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        decode_body(&body)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn parse_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!(
            "{url}: unsupported scheme {other}"
        ))),
    }
}

pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    if body.is_empty() {
        return Err(FetchError::NoData);
    }

    Ok(serde_json::from_slice(body)?)
}
