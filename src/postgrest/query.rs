//! Request builders for TableClient

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::fetch::{Fetch, FetchBuilder, Service};
use crate::postgrest::{PostgrestError, ReturnOption};

/// Where a builder sends its request and with which credentials
#[derive(Clone)]
pub(crate) struct Target {
    pub(crate) url: String,
    pub(crate) key: String,
    pub(crate) token: String,
    pub(crate) client: Client,
}

impl Target {
    fn prepare<'a>(&self, fetch: FetchBuilder<'a>) -> FetchBuilder<'a> {
        fetch
            .service(Service::Database)
            .header("apikey", &self.key)
            .bearer_auth(&self.token)
    }
}

/// Send the request and turn a PostgREST error body into `Error::Database`
async fn send(fetch: FetchBuilder<'_>) -> Result<Response> {
    let response = fetch.execute_raw().await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let detail = PostgrestError::parse(&text).describe();
        warn!("table request failed with {}: {}", status, detail);
        return Err(Error::database(format!("{}: {}", status, detail)));
    }

    Ok(response)
}

async fn parse_rows<R: DeserializeOwned>(response: Response) -> Result<Vec<R>> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&text)?)
}

/// Builder for SELECT queries
pub struct SelectBuilder {
    target: Target,
    params: Vec<(String, String)>,
}

impl SelectBuilder {
    pub(crate) fn new(target: Target, columns: &str) -> Self {
        Self {
            target,
            params: vec![("select".to_string(), columns.to_string())],
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<T: ToString>(mut self, column: &str, value: T) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Order the results by a column
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params
            .push(("order".to_string(), format!("{}.{}", column, direction)));
        self
    }

    /// Limit the number of rows returned
    pub fn limit(mut self, count: usize) -> Self {
        self.params.retain(|(k, _)| k != "limit");
        self.params.push(("limit".to_string(), count.to_string()));
        self
    }

    /// Execute the query and return the rows
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        debug!("select {:?}", self.params);
        let fetch = self
            .target
            .prepare(Fetch::get(&self.target.client, &self.target.url))
            .queries(self.params.iter().cloned());

        parse_rows(send(fetch).await?).await
    }

    /// Execute the query and return the first row
    pub async fn execute_one<T: DeserializeOwned>(self) -> Result<Option<T>> {
        let rows = self.limit(1).execute::<T>().await?;
        Ok(rows.into_iter().next())
    }
}

/// Builder for UPSERT queries
pub struct UpsertBuilder<T: Serialize> {
    target: Target,
    values: T,
    on_conflict: String,
    returning: ReturnOption,
}

impl<T: Serialize> UpsertBuilder<T> {
    pub(crate) fn new(target: Target, values: T, on_conflict: &str) -> Self {
        Self {
            target,
            values,
            on_conflict: on_conflict.to_string(),
            returning: ReturnOption::Representation,
        }
    }

    pub fn returning(mut self, option: ReturnOption) -> Self {
        self.returning = option;
        self
    }

    /// Execute the upsert and return the written rows
    pub async fn execute<R: DeserializeOwned>(&self) -> Result<Vec<R>> {
        let prefer = format!("resolution=merge-duplicates,{}", self.returning.as_str());
        let fetch = self
            .target
            .prepare(Fetch::post(&self.target.client, &self.target.url))
            .header("Prefer", &prefer)
            .query("on_conflict", &self.on_conflict)
            .json(&self.values)?;

        parse_rows(send(fetch).await?).await
    }
}

/// Builder for DELETE queries
pub struct DeleteBuilder {
    target: Target,
    params: Vec<(String, String)>,
}

impl DeleteBuilder {
    pub(crate) fn new(target: Target) -> Self {
        Self {
            target,
            params: Vec::new(),
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString>(mut self, column: &str, value: V) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Execute the delete without returning the removed rows
    pub async fn execute(&self) -> Result<()> {
        // An unfiltered delete would wipe the table
        if self.params.is_empty() {
            return Err(Error::database("refusing to delete without a filter"));
        }

        let fetch = self
            .target
            .prepare(Fetch::delete(&self.target.client, &self.target.url))
            .header("Prefer", ReturnOption::Minimal.as_str())
            .queries(self.params.iter().cloned());

        send(fetch).await?;
        Ok(())
    }
}
