//! CineVisor
//!
//! Client library for the CineVisor movie catalog: movie listings and details
//! from the movie metadata API, with accounts, profiles and bookmarks kept in
//! a hosted Supabase project.

pub mod auth;
pub mod backend;
pub mod bookmarks;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod memory;
pub mod pages;
pub mod persist;
pub mod postgrest;
pub mod profile;
pub mod routes;
pub mod session;
pub mod storage;
pub mod user;

use std::sync::Arc;

use cinevisor_tmdb::TmdbClient;
use reqwest::Client;

use crate::auth::{AuthOptions, OAuthProvider, SignUpForm, SignUpOutcome, SupabaseAuth};
use crate::backend::SupabaseBackend;
use crate::bookmarks::BookmarkTarget;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::Result;
use crate::pages::PageLoader;
use crate::persist::{FileStore, LocalStore};
use crate::profile::ProfileEditor;
use crate::routes::Route;
use crate::user::UserInfo;

/// The main entry point: every client and the app context, wired together
pub struct CineVisor {
    config: AppConfig,
    http_client: Client,
    auth: Arc<SupabaseAuth>,
    backend: Arc<SupabaseBackend>,
    movies: TmdbClient,
    ctx: AppContext,
}

impl CineVisor {
    /// Create a client that persists its state under `config.storage_dir`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cinevisor::{config::AppConfig, CineVisor};
    ///
    /// let config = AppConfig::new("https://your-project.supabase.co", "your-anon-key")
    ///     .unwrap()
    ///     .with_tmdb_token("your-tmdb-token");
    /// let app = CineVisor::new(config).unwrap();
    /// ```
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = Arc::new(FileStore::new(config.storage_dir.clone()));
        Self::with_store(config, store)
    }

    /// Create a client over a caller-supplied local store
    pub fn with_store(config: AppConfig, store: Arc<dyn LocalStore>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let options = AuthOptions {
            auto_refresh_token: config.auto_refresh_token,
            persist_session: config.persist_session,
        };
        let auth = Arc::new(
            SupabaseAuth::new(&config.supabase_url, &config.supabase_key, http_client.clone(), options)
                .with_store(store.clone()),
        );
        let backend = Arc::new(SupabaseBackend::new(
            &config.supabase_url,
            &config.supabase_key,
            http_client.clone(),
            auth.clone(),
        ));
        let movies = TmdbClient::new(&config.tmdb_base_url, &config.tmdb_token, http_client.clone())
            .with_language(&config.tmdb_language);

        Ok(Self {
            config,
            http_client,
            auth,
            backend,
            movies,
            ctx: AppContext::new(store),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub fn auth(&self) -> &SupabaseAuth {
        &self.auth
    }

    pub fn backend(&self) -> &SupabaseBackend {
        &self.backend
    }

    pub fn movies(&self) -> &TmdbClient {
        &self.movies
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn pages(&self) -> PageLoader {
        PageLoader::new(
            self.movies.clone(),
            self.backend.clone(),
            self.ctx.clone(),
            &self.config.image_base_url,
            &self.config.site_url,
        )
    }

    pub fn profile_editor(&self) -> ProfileEditor {
        ProfileEditor::new(
            self.auth.clone(),
            self.backend.clone(),
            self.backend.clone(),
            self.ctx.clone(),
        )
    }

    /// Restore the login state; run once at startup
    pub async fn bootstrap(&self) -> Result<Option<UserInfo>> {
        session::bootstrap(self.auth.as_ref(), self.backend.as_ref(), &self.ctx).await
    }

    pub async fn log_in(&self, email: &str, password: &str) -> Result<UserInfo> {
        session::log_in(self.auth.as_ref(), self.backend.as_ref(), &self.ctx, email, password).await
    }

    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpOutcome> {
        session::sign_up(self.auth.as_ref(), &self.ctx, form).await
    }

    /// URL that starts the OAuth login, returning to `/oauth/<provider>`
    pub fn oauth_url(&self, provider: OAuthProvider) -> Result<String> {
        let redirect_to = format!("{}{}", self.config.site_url, Route::OAuthCallback(provider));
        self.auth.authorize_url(provider, &redirect_to)
    }

    pub async fn complete_oauth(&self, callback_url: &str) -> Result<Route> {
        session::complete_oauth(self.auth.as_ref(), self.backend.as_ref(), &self.ctx, callback_url).await
    }

    pub async fn log_out(&self) -> Result<()> {
        session::log_out(self.auth.as_ref(), &self.ctx).await
    }

    pub async fn toggle_bookmark(&self, movie: &BookmarkTarget) -> Result<bool> {
        bookmarks::toggle(self.backend.as_ref(), &self.ctx, movie).await
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{AuthProvider, OAuthProvider, Session, SignUpForm, SignUpOutcome, User};
    pub use crate::backend::{Bookmark, BookmarkStore, ImageStore, ProfileStore};
    pub use crate::bookmarks::BookmarkTarget;
    pub use crate::config::AppConfig;
    pub use crate::context::AppContext;
    pub use crate::error::{Error, Result};
    pub use crate::pages::{Notice, PageLoader};
    pub use crate::profile::{ProfileEditor, ProfileView};
    pub use crate::routes::Route;
    pub use crate::user::UserInfo;
    pub use crate::CineVisor;
}
