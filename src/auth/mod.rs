//! Authentication and session handling against the hosted auth service

mod session;
mod types;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::fetch::{Fetch, Service};
use crate::persist::{self, LocalStore};

pub use session::*;
pub use types::*;

/// Local storage key the auth session is kept under
pub const SESSION_KEY: &str = "cinevisor-auth-token";

/// The narrow view of the auth service the rest of the crate depends on
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current session, refreshed first if it has expired
    async fn get_session(&self) -> Result<Option<Session>>;

    /// The authenticated user, or `None` when nobody is signed in
    async fn get_user(&self) -> Result<Option<User>>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_up(&self, email: &str, password: &str, user_name: &str) -> Result<SignUpOutcome>;

    async fn sign_out(&self) -> Result<()>;
}

/// Auth behaviour switches
#[derive(Debug, Clone)]
pub struct AuthOptions {
    pub auto_refresh_token: bool,
    pub persist_session: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            auto_refresh_token: true,
            persist_session: true,
        }
    }
}

/// Client for the hosted auth service
pub struct SupabaseAuth {
    url: String,
    key: String,
    client: Client,
    session: Arc<RwLock<Option<Session>>>,
    options: AuthOptions,
    store: Option<Arc<dyn LocalStore>>,
}

impl SupabaseAuth {
    pub fn new(url: &str, key: &str, client: Client, options: AuthOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            client,
            session: Arc::new(RwLock::new(None)),
            options,
            store: None,
        }
    }

    /// Keep the session in `store`, seeding it with whatever was saved last time
    pub fn with_store(mut self, store: Arc<dyn LocalStore>) -> Self {
        let restored = if self.options.persist_session {
            match persist::get_item::<Session>(store.as_ref(), SESSION_KEY) {
                Ok(session) => session,
                Err(e) => {
                    warn!("discarding unreadable persisted session: {}", e);
                    None
                }
            }
        } else {
            None
        };

        self.session = Arc::new(RwLock::new(restored));
        self.store = Some(store);
        self
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    /// Replace the current session
    pub async fn set_session(&self, session: Session) -> Result<()> {
        if let (true, Some(store)) = (self.options.persist_session, &self.store) {
            persist::set_item(store.as_ref(), SESSION_KEY, &session)?;
        }
        *self.session.write().await = Some(session);
        Ok(())
    }

    async fn clear_session(&self) -> Result<()> {
        *self.session.write().await = None;
        if let Some(store) = &self.store {
            persist::remove_item(store.as_ref(), SESSION_KEY)?;
        }
        Ok(())
    }

    /// Exchange the refresh token for a new session
    pub async fn refresh_session(&self) -> Result<Session> {
        let refresh_token = {
            let current = self.session.read().await;
            match current.as_ref() {
                Some(session) => session.refresh_token.clone(),
                None => return Err(Error::MissingSession),
            }
        };

        let url = self.auth_url("/token");
        let session = Fetch::post(&self.client, &url)
            .service(Service::Auth)
            .query("grant_type", "refresh_token")
            .header("apikey", &self.key)
            .json(&json!({ "refresh_token": refresh_token }))?
            .execute::<Session>()
            .await?
            .with_expiry();

        debug!("session refreshed for {}", session.user.id);
        self.set_session(session.clone()).await?;
        Ok(session)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User> {
        let url = self.auth_url("/user");
        Fetch::get(&self.client, &url)
            .service(Service::Auth)
            .header("apikey", &self.key)
            .bearer_auth(access_token)
            .execute::<User>()
            .await
    }

    /// URL that starts the OAuth flow for `provider`
    pub fn authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> Result<String> {
        let mut url = Url::parse(&self.auth_url("/authorize"))?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to);
        Ok(url.to_string())
    }

    /// Build and store a session from the OAuth redirect URL
    pub async fn session_from_callback(&self, callback_url: &str) -> Result<Session> {
        let tokens = parse_callback(callback_url)?;
        let claims = decode_claims(&tokens.access_token)?;

        let user = self.fetch_user(&tokens.access_token).await?;
        if user.id != claims.sub {
            return Err(Error::auth("access token subject does not match the user"));
        }

        let session = Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            expires_at: claims.exp,
            user,
        }
        .with_expiry();

        info!("signed in {} through OAuth", session.user.id);
        self.set_session(session.clone()).await?;
        Ok(session)
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn get_session(&self) -> Result<Option<Session>> {
        let current = self.session.read().await.clone();

        match current {
            Some(session) if session.is_expired() => {
                if !self.options.auto_refresh_token {
                    return Ok(None);
                }
                match self.refresh_session().await {
                    Ok(session) => Ok(Some(session)),
                    Err(e) => {
                        warn!("session refresh failed, signing out locally: {}", e);
                        self.clear_session().await?;
                        Ok(None)
                    }
                }
            }
            other => Ok(other),
        }
    }

    async fn get_user(&self) -> Result<Option<User>> {
        match self.get_session().await? {
            Some(session) => self.fetch_user(&session.access_token).await.map(Some),
            None => Ok(None),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.auth_url("/token");
        let session = Fetch::post(&self.client, &url)
            .service(Service::Auth)
            .query("grant_type", "password")
            .header("apikey", &self.key)
            .json(&json!({ "email": email, "password": password }))?
            .execute::<Session>()
            .await?
            .with_expiry();

        info!("signed in {}", session.user.id);
        self.set_session(session.clone()).await?;
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str, user_name: &str) -> Result<SignUpOutcome> {
        let url = self.auth_url("/signup");
        let body = Fetch::post(&self.client, &url)
            .service(Service::Auth)
            .header("apikey", &self.key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "userName": user_name }
            }))?
            .execute::<serde_json::Value>()
            .await?;

        if body.get("access_token").is_some() {
            let session = serde_json::from_value::<Session>(body)?.with_expiry();
            info!("signed up and signed in {}", session.user.id);
            self.set_session(session.clone()).await?;
            Ok(SignUpOutcome::Session(session))
        } else {
            let user = match body.get("user") {
                Some(user) => serde_json::from_value::<User>(user.clone())?,
                None => serde_json::from_value::<User>(body)?,
            };
            info!("signed up {}, waiting for email confirmation", user.id);
            Ok(SignUpOutcome::ConfirmationRequired(user))
        }
    }

    async fn sign_out(&self) -> Result<()> {
        let token = self
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone());

        let remote = match token {
            Some(token) => {
                let url = self.auth_url("/logout");
                Fetch::post(&self.client, &url)
                    .service(Service::Auth)
                    .header("apikey", &self.key)
                    .bearer_auth(&token)
                    .execute_empty()
                    .await
            }
            None => Ok(()),
        };

        // The local session goes away even when the server call fails
        self.clear_session().await?;
        remote
    }
}
