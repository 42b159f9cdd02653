//! cinelist - browse movie and TV catalogs and keep a personal watch list.
//!
//! The library is the client core: gateways for the metadata and video
//! search APIs, a search debouncer and the persisted bookmark list. It makes
//! no assumption about the caller's execution context; results come back as
//! futures and the presentation layer redispatches them wherever it needs to.

pub mod bookmarks;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod http;
pub mod search;
pub mod trailer;

pub use bookmarks::{AddOutcome, Bookmark, BookmarkStore};
pub use catalog::{
    CatalogPage, CatalogProvider, CatalogSlice, HomeFeed, MovieSummary, SeriesSummary,
    TmdbGateway,
};
pub use config::Config;
pub use debounce::RequestDebouncer;
pub use error::{BookmarkError, Error, FetchError, Result, StorageError};
pub use http::HttpClient;
pub use search::{LiveSearch, SearchResults};
pub use trailer::{TrailerProvider, TrailerResult, YouTubeGateway};
