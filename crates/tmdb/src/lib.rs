//! Movie metadata client for CineVisor
//!
//! A thin, typed wrapper over the public movie metadata REST API. Every call
//! is a single bearer-authenticated GET whose JSON body is decoded into the
//! types in [`types`].

mod types;

use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

pub use types::*;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_LANGUAGE: &str = "ko-KR";

/// Error type
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("API error: {message} (Status: {status})")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

pub type Result<T> = std::result::Result<T, TmdbError>;

/// Join an image base URL and a poster/profile path
pub fn image_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Movie metadata client
#[derive(Clone)]
pub struct TmdbClient {
    base_url: String,
    token: String,
    language: String,
    http_client: Client,
}

impl TmdbClient {
    pub fn new(base_url: &str, token: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.to_string(),
            token: token.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            http_client,
        }
    }

    /// Set the response language (`ko-KR` by default)
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| TmdbError::UrlError(url::ParseError::EmptyHost))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("language", &self.language);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url.path());

        let response = self
            .http_client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&error_text) {
                Ok(body) => body.status_message,
                Err(_) => error_text,
            };
            warn!("{} failed with {}: {}", url.path(), status, message);
            return Err(TmdbError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| TmdbError::DeserializationError(e.to_string()))
    }

    /// Currently popular movies
    pub async fn popular(&self, page: u32) -> Result<Page<MovieSummary>> {
        let mut url = self.endpoint(&["movie", "popular"])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        self.get(url).await
    }

    /// Title search; a blank query short-circuits to an empty page
    pub async fn search(&self, query: &str, page: u32) -> Result<Page<MovieSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Page::empty());
        }

        let mut url = self.endpoint(&["search", "movie"])?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("page", &page.to_string());
        self.get(url).await
    }

    /// Detail record of one movie
    pub async fn details(&self, id: u64) -> Result<MovieDetail> {
        let url = self.endpoint(&["movie", &id.to_string()])?;
        self.get(url).await
    }

    /// Movies of a single genre, most popular first
    pub async fn discover_by_genre(&self, genre_id: u64, page: u32) -> Result<Page<MovieSummary>> {
        let mut url = self.endpoint(&["discover", "movie"])?;
        url.query_pairs_mut()
            .append_pair("with_genres", &genre_id.to_string())
            .append_pair("sort_by", "popularity.desc")
            .append_pair("page", &page.to_string());
        self.get(url).await
    }

    /// The full list of movie genres
    pub async fn genres(&self) -> Result<Vec<Genre>> {
        let url = self.endpoint(&["genre", "movie", "list"])?;
        let list: GenreList = self.get(url).await?;
        Ok(list.genres)
    }

    pub async fn credits(&self, id: u64) -> Result<Credits> {
        let url = self.endpoint(&["movie", &id.to_string(), "credits"])?;
        self.get(url).await
    }

    pub async fn similar(&self, id: u64, page: u32) -> Result<Page<MovieSummary>> {
        let mut url = self.endpoint(&["movie", &id.to_string(), "similar"])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        self.get(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_joins_single_slash() {
        assert_eq!(
            image_url("https://image.tmdb.org/t/p/w500/", "/p.jpg"),
            "https://image.tmdb.org/t/p/w500/p.jpg"
        );
        assert_eq!(image_url("http://img", "p.jpg"), "http://img/p.jpg");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = TmdbClient::new(DEFAULT_BASE_URL, "token", Client::new());
        let url = client.endpoint(&["movie", "42"]).unwrap();
        assert_eq!(url.path(), "/3/movie/42");
        assert_eq!(url.query(), Some("language=ko-KR"));
    }
}
