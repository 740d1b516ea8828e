//! Storage seams the application logic is written against
//!
//! [`SupabaseBackend`] talks to the hosted tables and bucket;
//! [`crate::memory::MemoryBackend`] keeps the same data in memory.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::AuthProvider;
use crate::error::Result;
use crate::postgrest::{ReturnOption, TableClient};
use crate::storage::{FileOptions, StorageClient};

pub const PROFILE_TABLE: &str = "user-profile";
pub const BOOKMARK_TABLE: &str = "bookmarks";
pub const PROFILE_BUCKET: &str = "profile";

/// One row of the `user-profile` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub uuid: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub profilepic: Option<String>,
}

/// Partial upsert body for `user-profile`.
///
/// `None` leaves the column out of the request; `Some(None)` sends `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProfilePatch {
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profilepic: Option<Option<String>>,
}

impl ProfilePatch {
    pub fn new(uuid: &str) -> Self {
        Self {
            uuid: uuid.to_string(),
            ..Self::default()
        }
    }

    pub fn nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    pub fn profilepic(mut self, url: Option<&str>) -> Self {
        self.profilepic = Some(url.map(str::to_string));
        self
    }

    /// Apply the set fields to a stored row
    pub fn merge_into(&self, row: &mut ProfileRow) {
        if let Some(nickname) = &self.nickname {
            row.nickname = Some(nickname.clone());
        }
        if let Some(profilepic) = &self.profilepic {
            row.profilepic = profilepic.clone();
        }
    }
}

/// One row of the `bookmarks` table; unique per (user_id, movie_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub user_id: String,
    pub movie_id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_profile(&self, uuid: &str) -> Result<Option<ProfileRow>>;
    async fn upsert_profile(&self, patch: ProfilePatch) -> Result<()>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` at `path`; a rejection is `Error::Upload`
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;
    fn public_url(&self, path: &str) -> String;
}

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn exists(&self, user_id: &str, movie_id: u64) -> Result<bool>;
    async fn insert(&self, bookmark: Bookmark) -> Result<()>;
    async fn delete(&self, user_id: &str, movie_id: u64) -> Result<()>;
    async fn list(&self, user_id: &str) -> Result<Vec<Bookmark>>;
}

/// The hosted tables and bucket, authorised as the signed-in user
#[derive(Clone)]
pub struct SupabaseBackend {
    url: String,
    key: String,
    client: Client,
    auth: Arc<dyn AuthProvider>,
}

impl SupabaseBackend {
    pub fn new(url: &str, key: &str, client: Client, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            client,
            auth,
        }
    }

    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.auth.get_session().await?.map(|s| s.access_token))
    }

    /// Client for `table`, carrying the current access token when there is one
    pub async fn from(&self, table: &str) -> Result<TableClient> {
        let token = self.access_token().await?;
        Ok(TableClient::new(&self.url, &self.key, table, self.client.clone())
            .with_auth(token.as_deref()))
    }

    pub async fn storage(&self) -> Result<StorageClient> {
        let token = self.access_token().await?;
        Ok(StorageClient::new(&self.url, &self.key, self.client.clone())
            .with_auth(token.as_deref()))
    }
}

#[async_trait]
impl ProfileStore for SupabaseBackend {
    async fn fetch_profile(&self, uuid: &str) -> Result<Option<ProfileRow>> {
        self.from(PROFILE_TABLE)
            .await?
            .select("uuid,nickname,profilepic")
            .eq("uuid", uuid)
            .execute_one::<ProfileRow>()
            .await
    }

    async fn upsert_profile(&self, patch: ProfilePatch) -> Result<()> {
        debug!("upserting profile {}", patch.uuid);
        self.from(PROFILE_TABLE)
            .await?
            .upsert(vec![patch], "uuid")
            .returning(ReturnOption::Minimal)
            .execute::<serde_json::Value>()
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ImageStore for SupabaseBackend {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let options = FileOptions {
            content_type: Some(content_type.to_string()),
            ..FileOptions::default()
        };
        let object = self
            .storage()
            .await?
            .from(PROFILE_BUCKET)
            .upload(path, bytes, options)
            .await?;
        info!("uploaded {}", object.key);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        StorageClient::new(&self.url, &self.key, self.client.clone())
            .from(PROFILE_BUCKET)
            .get_public_url(path)
    }
}

#[async_trait]
impl BookmarkStore for SupabaseBackend {
    async fn exists(&self, user_id: &str, movie_id: u64) -> Result<bool> {
        let rows = self
            .from(BOOKMARK_TABLE)
            .await?
            .select("movie_id")
            .eq("user_id", user_id)
            .eq("movie_id", movie_id)
            .limit(1)
            .execute::<serde_json::Value>()
            .await?;
        Ok(!rows.is_empty())
    }

    async fn insert(&self, bookmark: Bookmark) -> Result<()> {
        debug!("bookmarking {} for {}", bookmark.movie_id, bookmark.user_id);
        self.from(BOOKMARK_TABLE)
            .await?
            .upsert(vec![bookmark], "user_id,movie_id")
            .returning(ReturnOption::Minimal)
            .execute::<serde_json::Value>()
            .await?;
        Ok(())
    }

    async fn delete(&self, user_id: &str, movie_id: u64) -> Result<()> {
        debug!("removing bookmark {} for {}", movie_id, user_id);
        self.from(BOOKMARK_TABLE)
            .await?
            .delete()
            .eq("user_id", user_id)
            .eq("movie_id", movie_id)
            .execute()
            .await
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Bookmark>> {
        self.from(BOOKMARK_TABLE)
            .await?
            .select("user_id,movie_id,title,poster_path,vote_average")
            .eq("user_id", user_id)
            .order("movie_id", true)
            .execute::<Bookmark>()
            .await
    }
}
