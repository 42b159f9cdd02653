use tracing::warn;

use super::{CatalogPage, CatalogProvider, MovieSummary, SeriesSummary};
use crate::error::FetchError;

/// A named, argument-free catalog slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSlice {
    TrendingMovies,
    TrendingSeries,
    Popular,
    Upcoming,
    TopRated,
    Discover,
}

impl CatalogSlice {
    /// Sections of the home screen, in display order.
    pub const HOME: [CatalogSlice; 5] = [
        CatalogSlice::TrendingMovies,
        CatalogSlice::TrendingSeries,
        CatalogSlice::Popular,
        CatalogSlice::Upcoming,
        CatalogSlice::TopRated,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            CatalogSlice::TrendingMovies => "Trending Movies",
            CatalogSlice::TrendingSeries => "Trending TV",
            CatalogSlice::Popular => "Popular",
            CatalogSlice::Upcoming => "Upcoming Movies",
            CatalogSlice::TopRated => "Top Rated",
            CatalogSlice::Discover => "Discover",
        }
    }

    pub async fn fetch(&self, provider: &dyn CatalogProvider) -> Result<SliceItems, FetchError> {
        match self {
            CatalogSlice::TrendingMovies => provider.trending_movies().await.map(SliceItems::Movies),
            CatalogSlice::TrendingSeries => provider.trending_series().await.map(SliceItems::Series),
            CatalogSlice::Popular => provider.popular().await.map(SliceItems::Movies),
            CatalogSlice::Upcoming => provider.upcoming().await.map(SliceItems::Movies),
            CatalogSlice::TopRated => provider.top_rated().await.map(SliceItems::Movies),
            CatalogSlice::Discover => provider.discover().await.map(SliceItems::Movies),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SliceItems {
    Movies(CatalogPage<MovieSummary>),
    Series(CatalogPage<SeriesSummary>),
}

impl SliceItems {
    pub fn len(&self) -> usize {
        match self {
            SliceItems::Movies(m) => m.len(),
            SliceItems::Series(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Display titles in upstream order (`title` for movies, `name` for series).
    pub fn titles(&self) -> Vec<&str> {
        match self {
            SliceItems::Movies(m) => m.iter().map(|m| m.title.as_str()).collect(),
            SliceItems::Series(s) => s.iter().map(|s| s.name.as_str()).collect(),
        }
    }
}

#[derive(Debug)]
pub struct FeedSection {
    pub slice: CatalogSlice,
    pub items: Result<SliceItems, FetchError>,
}

/// Every home section, each with its own outcome so a failed slice never
/// takes the others down with it.
#[derive(Debug)]
pub struct HomeFeed {
    pub sections: Vec<FeedSection>,
}

impl HomeFeed {
    /// Fetch all home sections concurrently.
    pub async fn load(provider: &dyn CatalogProvider) -> Self {
        let [s0, s1, s2, s3, s4] = CatalogSlice::HOME;
        let (r0, r1, r2, r3, r4) = tokio::join!(
            s0.fetch(provider),
            s1.fetch(provider),
            s2.fetch(provider),
            s3.fetch(provider),
            s4.fetch(provider),
        );

        let sections: Vec<FeedSection> = CatalogSlice::HOME
            .into_iter()
            .zip([r0, r1, r2, r3, r4])
            .map(|(slice, items)| {
                if let Err(err) = &items {
                    warn!(section = slice.title(), error = %err, "Failed to load home section");
                }
                FeedSection { slice, items }
            })
            .collect();

        Self { sections }
    }

    pub fn section(&self, slice: CatalogSlice) -> Option<&FeedSection> {
        self.sections.iter().find(|s| s.slice == slice)
    }
}
