//! Object storage for uploaded files

use std::path::Path;

use reqwest::{multipart, Client};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::fetch::{error_message, Fetch, Service};

/// Options for uploading a file
#[derive(Debug, Clone)]
pub struct FileOptions {
    /// Cache control header, in seconds
    pub cache_control: Option<String>,

    /// Content type of the uploaded bytes
    pub content_type: Option<String>,

    /// Overwrite an existing object at the same path
    pub upsert: bool,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            cache_control: None,
            content_type: None,
            upsert: false,
        }
    }
}

/// Response to a successful upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedObject {
    /// `<bucket>/<path>` of the stored object
    #[serde(rename = "Key", alias = "key")]
    pub key: String,
}

/// Client for object storage
#[derive(Clone)]
pub struct StorageClient {
    /// The base URL for the project
    url: String,

    /// The anonymous API key for the project
    key: String,

    /// Access token sent instead of the anon key
    token: Option<String>,

    client: Client,
}

/// Client for a specific storage bucket
pub struct BucketClient<'a> {
    storage: &'a StorageClient,
    bucket_id: String,
}

impl StorageClient {
    pub fn new(url: &str, key: &str, client: Client) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            token: None,
            client,
        }
    }

    /// Authorise requests with a user's access token
    pub fn with_auth(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    fn get_url(&self, path: &str) -> String {
        format!("{}/storage/v1{}", self.url, path)
    }

    fn bearer(&self) -> &str {
        self.token.as_deref().unwrap_or(&self.key)
    }

    /// Get a client for a specific bucket
    pub fn from(&self, bucket_id: &str) -> BucketClient<'_> {
        BucketClient {
            storage: self,
            bucket_id: bucket_id.to_string(),
        }
    }
}

impl<'a> BucketClient<'a> {
    /// Upload a file to the bucket; a rejected upload is `Error::Upload`
    pub async fn upload(
        &self,
        path: &str,
        file_data: Vec<u8>,
        options: FileOptions,
    ) -> Result<UploadedObject> {
        let url = self
            .storage
            .get_url(&format!("/object/{}/{}", self.bucket_id, path));

        let file_name = Path::new(path)
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        let mut part = multipart::Part::bytes(file_data).file_name(file_name);
        if let Some(content_type) = &options.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = multipart::Form::new().part("file", part);

        debug!("uploading {}/{}", self.bucket_id, path);
        let response = self
            .storage
            .client
            .post(&url)
            .header("apikey", &self.storage.key)
            .bearer_auth(self.storage.bearer())
            .header(
                "cache-control",
                format!("max-age={}", options.cache_control.as_deref().unwrap_or("3600")),
            )
            .header("x-upsert", options.upsert.to_string())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text);
            warn!("upload of {} failed with {}: {}", path, status, message);
            return Err(Error::upload(message));
        }

        let text = response.text().await?;
        match serde_json::from_str::<UploadedObject>(&text) {
            Ok(object) => Ok(object),
            Err(_) => Ok(UploadedObject {
                key: format!("{}/{}", self.bucket_id, path),
            }),
        }
    }

    /// Delete objects from the bucket
    pub async fn remove(&self, paths: &[&str]) -> Result<()> {
        let url = self.storage.get_url(&format!("/object/{}", self.bucket_id));

        Fetch::delete(&self.storage.client, &url)
            .service(Service::Storage)
            .header("apikey", &self.storage.key)
            .bearer_auth(self.storage.bearer())
            .json(&json!({ "prefixes": paths }))?
            .execute_empty()
            .await
    }

    /// Get the public URL for a file
    pub fn get_public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.storage.url, self.bucket_id, path
        )
    }
}
