//! Response shapes of the movie metadata API

use serde::{Deserialize, Serialize};

/// A movie as it appears in listings (popular, search, discover, similar)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Full detail record of a single movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub adult: bool,
}

impl MovieDetail {
    /// Project the detail record down to the listing shape
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            vote_average: self.vote_average,
            overview: self.overview.clone(),
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
            adult: self.adult,
            release_date: self.release_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

impl Page<MovieSummary> {
    /// Drop adult titles; listings never show them
    pub fn without_adult(mut self) -> Self {
        self.results.retain(|m| !m.adult);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub status_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_without_adult_filters_listing() {
        let page: Page<MovieSummary> = serde_json::from_value(json!({
            "page": 1,
            "results": [
                { "id": 1, "title": "Kept", "adult": false, "vote_average": 7.1 },
                { "id": 2, "title": "Dropped", "adult": true },
                { "id": 3, "title": "No flag" }
            ],
            "total_pages": 1,
            "total_results": 3
        }))
        .unwrap();

        let ids: Vec<u64> = page.without_adult().results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_detail_summary_keeps_genre_ids() {
        let detail: MovieDetail = serde_json::from_value(json!({
            "id": 42,
            "title": "X",
            "poster_path": "/p.jpg",
            "vote_average": 7.5,
            "genres": [{ "id": 18, "name": "드라마" }, { "id": 80, "name": "범죄" }]
        }))
        .unwrap();

        let summary = detail.summary();
        assert_eq!(summary.id, 42);
        assert_eq!(summary.genre_ids, vec![18, 80]);
        assert_eq!(summary.poster_path.as_deref(), Some("/p.jpg"));
    }
}
