//! Debounced search-as-you-type driver.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::catalog::{CatalogProvider, MovieSummary};
use crate::debounce::RequestDebouncer;

/// Latest published search outcome. An empty query means "no search".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub movies: Vec<MovieSummary>,
}

/// Feeds query text through a [`RequestDebouncer`] into a catalog search and
/// publishes results on a watch channel.
///
/// Blank input cancels any pending search and publishes empty results right
/// away. A failed search publishes empty results for that query. Results of
/// superseded searches that were already in flight are not discarded; the
/// last one to complete wins.
pub struct LiveSearch {
    provider: Arc<dyn CatalogProvider>,
    debouncer: RequestDebouncer,
    results: Arc<watch::Sender<SearchResults>>,
}

impl LiveSearch {
    pub fn new(provider: Arc<dyn CatalogProvider>, window: Duration) -> Self {
        let (tx, _rx) = watch::channel(SearchResults::default());
        Self {
            provider,
            debouncer: RequestDebouncer::new(window),
            results: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.results.subscribe()
    }

    pub fn latest(&self) -> SearchResults {
        self.results.borrow().clone()
    }

    pub fn on_query_changed(&self, text: &str) {
        if text.trim().is_empty() {
            self.debouncer.cancel();
            self.results.send_replace(SearchResults::default());
            return;
        }

        let provider = Arc::clone(&self.provider);
        let results = Arc::clone(&self.results);
        let query = text.to_string();

        self.debouncer.schedule(async move {
            let movies = match provider.search(&query).await {
                Ok(movies) => {
                    debug!(query = %query, count = movies.len(), "Search finished");
                    movies
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "Search failed");
                    Vec::new()
                }
            };
            results.send_replace(SearchResults { query, movies });
        });
    }
}

impl std::fmt::Debug for LiveSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSearch")
            .field("debouncer", &self.debouncer)
            .finish()
    }
}
