//! In-memory stand-in for the hosted backend

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::auth::{AuthProvider, Session, SignUpOutcome, User};
use crate::backend::{Bookmark, BookmarkStore, ImageStore, ProfilePatch, ProfileRow, ProfileStore};
use crate::error::{Error, Result};

/// Calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    /// `get_user` errors
    UserLookup,
    /// `get_user` answers `None` even with a session
    UserMissing,
    Upload,
    ProfileRead,
    ProfileWrite,
    BookmarkRead,
    BookmarkWrite,
    SignOut,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, (String, User)>,
    session: Option<Session>,
    profiles: HashMap<String, ProfileRow>,
    bookmarks: BTreeMap<(String, u64), Bookmark>,
    images: HashMap<String, (Vec<u8>, String)>,
    failures: HashSet<Failure>,
    require_confirmation: bool,
    next_id: u64,
}

/// Auth, tables and bucket held in memory
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

fn session_for(user: &User) -> Session {
    Session {
        access_token: format!("memory-access-{}", user.id),
        refresh_token: format!("memory-refresh-{}", user.id),
        token_type: "bearer".to_string(),
        expires_in: 3600,
        expires_at: Some(Utc::now().timestamp() + 3600),
        user: user.clone(),
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| Error::general("memory backend lock poisoned"))
    }

    fn check(&self, failure: Failure, err: impl FnOnce() -> Error) -> Result<()> {
        if self.state()?.failures.contains(&failure) {
            return Err(err());
        }
        Ok(())
    }

    /// Register an account and return its user
    pub fn add_account(&self, email: &str, password: &str, user_name: &str) -> Result<User> {
        let mut state = self.state()?;
        if state.accounts.contains_key(email) {
            return Err(Error::auth("User already registered"));
        }
        state.next_id += 1;
        let user = User {
            id: format!("user-{}", state.next_id),
            email: Some(email.to_string()),
            phone: None,
            app_metadata: json!({ "provider": "email" }),
            user_metadata: json!({ "userName": user_name }),
            role: Some("authenticated".to_string()),
            created_at: Some(Utc::now().to_rfc3339()),
        };
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        Ok(user)
    }

    /// Start a session for `user` without going through a password
    pub fn sign_in_as(&self, user: &User) -> Result<Session> {
        let session = session_for(user);
        self.state()?.session = Some(session.clone());
        Ok(session)
    }

    /// Make sign-up wait for email confirmation instead of signing in
    pub fn require_confirmation(&self, value: bool) -> Result<()> {
        self.state()?.require_confirmation = value;
        Ok(())
    }

    pub fn fail(&self, failure: Failure) -> Result<()> {
        self.state()?.failures.insert(failure);
        Ok(())
    }

    pub fn recover(&self, failure: Failure) -> Result<()> {
        self.state()?.failures.remove(&failure);
        Ok(())
    }

    pub fn profile(&self, uuid: &str) -> Result<Option<ProfileRow>> {
        Ok(self.state()?.profiles.get(uuid).cloned())
    }

    /// Stored bytes and content type at `path`
    pub fn image(&self, path: &str) -> Result<Option<(Vec<u8>, String)>> {
        Ok(self.state()?.images.get(path).cloned())
    }

    pub fn bookmark_count(&self) -> Result<usize> {
        Ok(self.state()?.bookmarks.len())
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn get_session(&self) -> Result<Option<Session>> {
        Ok(self.state()?.session.clone())
    }

    async fn get_user(&self) -> Result<Option<User>> {
        self.check(Failure::UserLookup, || Error::auth("user lookup failed"))?;
        let state = self.state()?;
        if state.failures.contains(&Failure::UserMissing) {
            return Ok(None);
        }
        Ok(state.session.as_ref().map(|s| s.user.clone()))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let mut state = self.state()?;
        let user = match state.accounts.get(email) {
            Some((stored, user)) if stored == password => user.clone(),
            _ => return Err(Error::auth("Invalid login credentials")),
        };
        let session = session_for(&user);
        state.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str, user_name: &str) -> Result<SignUpOutcome> {
        let user = self.add_account(email, password, user_name)?;
        if self.state()?.require_confirmation {
            return Ok(SignUpOutcome::ConfirmationRequired(user));
        }
        Ok(SignUpOutcome::Session(self.sign_in_as(&user)?))
    }

    async fn sign_out(&self) -> Result<()> {
        let mut state = self.state()?;
        state.session = None;
        if state.failures.contains(&Failure::SignOut) {
            return Err(Error::auth("sign out failed"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryBackend {
    async fn fetch_profile(&self, uuid: &str) -> Result<Option<ProfileRow>> {
        self.check(Failure::ProfileRead, || Error::database("profile read failed"))?;
        self.profile(uuid)
    }

    async fn upsert_profile(&self, patch: ProfilePatch) -> Result<()> {
        self.check(Failure::ProfileWrite, || Error::database("profile write failed"))?;
        let mut state = self.state()?;
        let row = state
            .profiles
            .entry(patch.uuid.clone())
            .or_insert_with(|| ProfileRow {
                uuid: patch.uuid.clone(),
                nickname: None,
                profilepic: None,
            });
        patch.merge_into(row);
        Ok(())
    }
}

#[async_trait]
impl ImageStore for MemoryBackend {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.check(Failure::Upload, || Error::upload("The object exceeded the maximum allowed size"))?;
        let mut state = self.state()?;
        if state.images.contains_key(path) {
            return Err(Error::upload("The resource already exists"));
        }
        state
            .images
            .insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://profile/{}", path)
    }
}

#[async_trait]
impl BookmarkStore for MemoryBackend {
    async fn exists(&self, user_id: &str, movie_id: u64) -> Result<bool> {
        self.check(Failure::BookmarkRead, || Error::database("bookmark read failed"))?;
        Ok(self
            .state()?
            .bookmarks
            .contains_key(&(user_id.to_string(), movie_id)))
    }

    async fn insert(&self, bookmark: Bookmark) -> Result<()> {
        self.check(Failure::BookmarkWrite, || Error::database("bookmark write failed"))?;
        let key = (bookmark.user_id.clone(), bookmark.movie_id);
        self.state()?.bookmarks.insert(key, bookmark);
        Ok(())
    }

    async fn delete(&self, user_id: &str, movie_id: u64) -> Result<()> {
        self.check(Failure::BookmarkWrite, || Error::database("bookmark write failed"))?;
        self.state()?
            .bookmarks
            .remove(&(user_id.to_string(), movie_id));
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Bookmark>> {
        self.check(Failure::BookmarkRead, || Error::database("bookmark read failed"))?;
        Ok(self
            .state()?
            .bookmarks
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }
}
