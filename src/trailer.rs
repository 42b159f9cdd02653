//! Trailer lookup against a YouTube Data API compatible video search.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::VideoConfig;
use crate::error::FetchError;
use crate::http::{HttpClient, parse_url};

const EMBED_BASE_URL: &str = "https://www.youtube.com/embed";
const QUERY_SUFFIX: &str = "trailer";

/// Outcome of a trailer lookup. `video_id: None` means nothing matched,
/// which is a normal result rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerResult {
    pub video_id: Option<String>,
}

impl TrailerResult {
    pub fn is_found(&self) -> bool {
        self.video_id.is_some()
    }

    /// Inline-playable embed URL for the found video.
    pub fn embed_url(&self) -> Option<String> {
        self.video_id
            .as_ref()
            .map(|id| format!("{}/{}?playsinline=1", EMBED_BASE_URL, id))
    }
}

#[async_trait::async_trait]
pub trait TrailerProvider: Send + Sync {
    async fn find_trailer(&self, title: &str) -> Result<TrailerResult, FetchError>;
}

#[derive(Debug, Deserialize)]
struct VideoSearchResponse {
    items: Vec<VideoSearchItem>,
}

#[derive(Debug, Deserialize)]
struct VideoSearchItem {
    id: VideoSearchId,
}

#[derive(Debug, Deserialize)]
struct VideoSearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct YouTubeGateway {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl YouTubeGateway {
    pub fn new(http: HttpClient, config: &VideoConfig) -> Result<Self, FetchError> {
        if config.api_key.trim().is_empty() {
            return Err(FetchError::MissingCredential("video.api_key"));
        }
        parse_url(&config.base_url)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn search_endpoint(&self, title: &str) -> String {
        let query = format!("{} {}", title, QUERY_SUFFIX);
        format!(
            "{}/search?part=snippet&type=video&maxResults=1&q={}&key={}",
            self.base_url,
            urlencoding::encode(&query),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait::async_trait]
impl TrailerProvider for YouTubeGateway {
    async fn find_trailer(&self, title: &str) -> Result<TrailerResult, FetchError> {
        let response: VideoSearchResponse = self.http.fetch_json(&self.search_endpoint(title)).await?;

        let video_id = response.items.into_iter().next().and_then(|item| item.id.video_id);
        debug!(title = %title, found = video_id.is_some(), "Trailer lookup finished");

        Ok(TrailerResult { video_id })
    }
}
