//! Table operations through the PostgREST API

mod query;
mod types;

use reqwest::Client;
use serde::Serialize;

pub use query::*;
pub use types::*;

/// Client for one table of the hosted database
#[derive(Clone)]
pub struct TableClient {
    /// The base URL for the project
    url: String,

    /// The anonymous API key for the project
    key: String,

    /// The table name
    table: String,

    /// Access token sent instead of the anon key
    token: Option<String>,

    client: Client,
}

impl TableClient {
    /// Create a new TableClient
    pub fn new(url: &str, key: &str, table: &str, client: Client) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            table: table.to_string(),
            token: None,
            client,
        }
    }

    /// Authorise requests with a user's access token
    pub fn with_auth(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    fn get_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }

    fn target(&self) -> Target {
        Target {
            url: self.get_url(),
            key: self.key.clone(),
            token: self.token.clone().unwrap_or_else(|| self.key.clone()),
            client: self.client.clone(),
        }
    }

    /// Select specific columns from the table
    pub fn select(&self, columns: &str) -> SelectBuilder {
        SelectBuilder::new(self.target(), columns)
    }

    /// Insert rows, merging into existing ones that collide on `on_conflict`
    pub fn upsert<T: Serialize>(&self, values: T, on_conflict: &str) -> UpsertBuilder<T> {
        UpsertBuilder::new(self.target(), values, on_conflict)
    }

    /// Delete rows matching the filters added to the builder
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.target())
    }
}
