//! Configuration options for the CineVisor client

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_SITE_URL: &str = "https://oz-react-mini-11-nine.vercel.app";

/// Configuration options for the CineVisor client
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The base URL of the Supabase project
    pub supabase_url: String,

    /// The anonymous API key of the Supabase project
    pub supabase_key: String,

    /// The base URL of the movie metadata API
    pub tmdb_base_url: String,

    /// Bearer token for the movie metadata API
    pub tmdb_token: String,

    /// Response language of the movie metadata API
    pub tmdb_language: String,

    /// Base URL poster paths are appended to
    pub image_base_url: String,

    /// Public URL of the site, used for canonical and OAuth redirect URLs
    pub site_url: String,

    /// Directory holding the client-persisted state
    pub storage_dir: PathBuf,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Whether to refresh an expired session automatically
    pub auto_refresh_token: bool,

    /// Whether to keep the auth session in local storage
    pub persist_session: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_key: String::new(),
            tmdb_base_url: cinevisor_tmdb::DEFAULT_BASE_URL.to_string(),
            tmdb_token: String::new(),
            tmdb_language: cinevisor_tmdb::DEFAULT_LANGUAGE.to_string(),
            image_base_url: cinevisor_tmdb::DEFAULT_IMAGE_BASE_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            storage_dir: PathBuf::from(".cinevisor"),
            request_timeout: Some(Duration::from_secs(30)),
            auto_refresh_token: true,
            persist_session: true,
        }
    }
}

impl AppConfig {
    /// Create a configuration, validating the project URL and key
    pub fn new(supabase_url: &str, supabase_key: &str) -> Result<Self> {
        Url::parse(supabase_url)?;
        if supabase_key.is_empty() {
            return Err(Error::config("supabase_key cannot be empty"));
        }

        Ok(Self {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_key: supabase_key.to_string(),
            ..Self::default()
        })
    }

    /// Build the configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| Error::config("SUPABASE_URL environment variable not found"))?;
        let key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| Error::config("SUPABASE_ANON_KEY environment variable not found"))?;
        let token = std::env::var("TMDB_TOKEN")
            .map_err(|_| Error::config("TMDB_TOKEN environment variable not found"))?;

        let mut config = Self::new(&url, &key)?.with_tmdb_token(&token);

        if let Ok(value) = std::env::var("TMDB_BASE_URL") {
            config = config.with_tmdb_base_url(&value);
        }
        if let Ok(value) = std::env::var("TMDB_LANGUAGE") {
            config = config.with_tmdb_language(&value);
        }
        if let Ok(value) = std::env::var("CINEVISOR_SITE_URL") {
            config = config.with_site_url(&value);
        }
        if let Ok(value) = std::env::var("CINEVISOR_STORAGE_DIR") {
            config = config.with_storage_dir(value);
        }

        Ok(config)
    }

    /// Set the movie API token
    pub fn with_tmdb_token(mut self, value: &str) -> Self {
        self.tmdb_token = value.to_string();
        self
    }

    /// Set the movie API base URL
    pub fn with_tmdb_base_url(mut self, value: &str) -> Self {
        self.tmdb_base_url = value.to_string();
        self
    }

    /// Set the movie API language
    pub fn with_tmdb_language(mut self, value: &str) -> Self {
        self.tmdb_language = value.to_string();
        self
    }

    /// Set the poster image base URL
    pub fn with_image_base_url(mut self, value: &str) -> Self {
        self.image_base_url = value.to_string();
        self
    }

    /// Set the public site URL
    pub fn with_site_url(mut self, value: &str) -> Self {
        self.site_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the local storage directory
    pub fn with_storage_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.storage_dir = value.into();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set whether to refresh the token automatically
    pub fn with_auto_refresh_token(mut self, value: bool) -> Self {
        self.auto_refresh_token = value;
        self
    }

    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_valid() {
        let config = AppConfig::new("http://localhost:54321/", "anon").unwrap();
        assert_eq!(config.supabase_url, "http://localhost:54321");
        assert_eq!(config.tmdb_language, "ko-KR");
        assert!(config.persist_session);
    }

    #[test]
    fn config_new_invalid_url() {
        match AppConfig::new("not a valid url", "anon") {
            Err(Error::Url(_)) => {}
            other => panic!("Expected Url error, got {:?}", other),
        }
    }

    #[test]
    fn config_new_empty_key() {
        match AppConfig::new("http://localhost:54321", "") {
            Err(Error::Config(msg)) => assert!(msg.contains("supabase_key cannot be empty")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }
}
