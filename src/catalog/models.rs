use serde::{Deserialize, Serialize};

/// An ordered page of catalog records, in upstream response order.
pub type CatalogPage<T> = Vec<T>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub id: u64,
    pub name: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub first_air_date: String,
}

/// The `{results: [...]}` envelope shared by every catalog endpoint.
/// Pagination fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultsEnvelope<T> {
    pub results: Vec<T>,
}

/// Join an image base such as `https://image.tmdb.org/t/p/w500` with a
/// relative path such as `/abc.jpg`.
pub fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    let base = base.trim_end_matches('/');

    if path.starts_with('/') {
        Some(format!("{}{}", base, path))
    } else {
        Some(format!("{}/{}", base, path))
    }
}

impl MovieSummary {
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        image_url(image_base, self.poster_path.as_deref())
    }

    pub fn backdrop_url(&self, image_base: &str) -> Option<String> {
        image_url(image_base, self.backdrop_path.as_deref())
    }
}

impl SeriesSummary {
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        image_url(image_base, self.poster_path.as_deref())
    }

    pub fn backdrop_url(&self, image_base: &str) -> Option<String> {
        image_url(image_base, self.backdrop_path.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::http::decode_body;

    const MOVIES: &str = r#"{
        "page": 1,
        "total_pages": 10,
        "results": [
            {
                "id": 438631,
                "title": "Dune",
                "overview": "Paul Atreides...",
                "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
                "backdrop_path": null,
                "vote_average": 7.8,
                "release_date": "2021-09-15",
                "adult": false,
                "genre_ids": [878, 12]
            },
            {
                "id": 1,
                "title": "Arrival",
                "overview": "",
                "vote_average": 7,
                "release_date": "2016-11-10"
            }
        ]
    }"#;

    #[test]
    fn test_decode_movies_keeps_order() {
        let env: ResultsEnvelope<MovieSummary> = serde_json::from_str(MOVIES).unwrap();
        let titles: Vec<_> = env.results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Arrival"]);

        let dune = &env.results[0];
        assert_eq!(dune.id, 438631);
        assert_eq!(dune.backdrop_path, None);
        assert_eq!(env.results[1].poster_path, None);
        assert_eq!(env.results[1].vote_average, 7.0);
    }

    #[test]
    fn test_missing_vote_average_fails_whole_page() {
        let body = r#"{"results": [
            {"id": 1, "title": "Ok", "overview": "", "vote_average": 5.0, "release_date": "2020-01-01"},
            {"id": 2, "title": "Broken", "overview": "", "release_date": "2020-01-01"}
        ]}"#;
        assert!(serde_json::from_str::<ResultsEnvelope<MovieSummary>>(body).is_err());
    }

    #[test]
    fn test_wrong_field_type_fails_whole_page() {
        let body = br#"{"results": [
            {"id": 1, "title": "Ok", "overview": "", "vote_average": 5.0, "release_date": "2020-01-01"},
            {"id": "438631", "title": "Dune", "overview": "", "vote_average": 7.8, "release_date": "2021-09-15"}
        ]}"#;
        assert!(matches!(
            decode_body::<ResultsEnvelope<MovieSummary>>(body),
            Err(FetchError::Decoding(_))
        ));

        let body = br#"{"results": [
            {"id": 1, "title": "Ok", "overview": "", "vote_average": "7.5", "release_date": "2020-01-01"}
        ]}"#;
        assert!(matches!(
            decode_body::<ResultsEnvelope<MovieSummary>>(body),
            Err(FetchError::Decoding(_))
        ));
    }

    #[test]
    fn test_decode_series() {
        let body = r#"{"results": [{
            "id": 1399,
            "name": "Game of Thrones",
            "overview": "Seven noble families...",
            "poster_path": "/got.jpg",
            "backdrop_path": "/got-bg.jpg",
            "vote_average": 8.4,
            "first_air_date": "2011-04-17"
        }]}"#;
        let env: ResultsEnvelope<SeriesSummary> = serde_json::from_str(body).unwrap();
        assert_eq!(env.results[0].name, "Game of Thrones");
        assert_eq!(env.results[0].first_air_date, "2011-04-17");

        // A movie record is not a series record.
        assert!(serde_json::from_str::<ResultsEnvelope<SeriesSummary>>(MOVIES).is_err());
    }

    #[test]
    fn test_image_url() {
        let base = "https://image.tmdb.org/t/p/w500";
        assert_eq!(
            image_url(base, Some("/a.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/a.jpg")
        );
        assert_eq!(
            image_url("https://img/w500/", Some("a.jpg")).as_deref(),
            Some("https://img/w500/a.jpg")
        );
        assert_eq!(image_url(base, Some("")), None);
        assert_eq!(image_url(base, None), None);
    }
}
