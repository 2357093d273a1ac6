use super::queries::{self, Query};
use crate::config::StashConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use stashnfo_common::{Error, RecordKind, Result};
use std::time::Duration;

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// Client for the Stash GraphQL API.
pub struct StashClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    search_limit: u32,
}

impl StashClient {
    pub fn new(config: &StashConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            endpoint: config.graphql_url(),
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            search_limit: config.search_limit,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check the server is reachable and return its version string.
    pub async fn test_connection(&self) -> Result<String> {
        let data = self.execute(queries::VERSION, json!({})).await?;
        data.pointer("/version/version")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::query("version missing from response"))
    }

    /// Fetch one record by its Stash id.
    pub async fn fetch_by_id(&self, kind: RecordKind, id: &str) -> Result<Value> {
        let query = queries::find_by_id(kind);
        let data = self.execute(query.document, json!({ "id": id })).await?;

        match take_field(data, &query) {
            Some(record @ Value::Object(_)) => Ok(record),
            _ => Err(Error::not_found(format!("{kind} {id}"))),
        }
    }

    /// Search records of `kind` by free text, returning at most the
    /// configured search limit of matches.
    pub async fn search(&self, kind: RecordKind, text: &str) -> Result<Vec<Value>> {
        let query = queries::search(kind);
        let variables = json!({
            "filter": { "q": text, "per_page": self.search_limit }
        });
        let data = self.execute(query.document, variables).await?;

        let matches = match take_field(data, &query) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        if matches.is_empty() {
            return Err(Error::not_found(format!("no {kind} matches '{text}'")));
        }

        tracing::debug!("Search for '{}' returned {} {} records", text, matches.len(), kind);
        Ok(matches)
    }

    /// Find the scene whose file is stored at exactly `path`.
    pub async fn find_scene_by_path(&self, path: &str) -> Result<Value> {
        let query = queries::scene_by_path();
        let variables = json!({
            "filter": { "per_page": -1 },
            "scene_filter": { "path": { "value": path, "modifier": "EQUALS" } }
        });
        let data = self.execute(query.document, variables).await?;

        match take_field(data, &query) {
            Some(Value::Array(mut scenes)) if !scenes.is_empty() => Ok(scenes.swap_remove(0)),
            _ => Err(Error::not_found(format!("no scene with file {path}"))),
        }
    }

    /// POST a GraphQL document and return its `data` object.
    async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
        let mut request = self.client.post(&self.endpoint).json(&GraphQlRequest {
            query: document,
            variables,
        });
        if let Some(ref key) = self.api_key {
            request = request.header("ApiKey", key);
        }

        tracing::debug!("POST {}", self.endpoint);
        let response = request
            .send()
            .await
            .map_err(|e| Error::ConnectionFailed(format!("{}: {}", self.endpoint, e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::AuthenticationFailed(format!(
                "{} returned {}",
                self.endpoint, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ConnectionFailed(format!("{}: {}", self.endpoint, e)))?;

        let parsed: Option<GraphQlResponse> = serde_json::from_str(&body).ok();
        if let Some(parsed) = &parsed {
            if !parsed.errors.is_empty() {
                let messages: Vec<&str> = parsed.errors.iter().map(|e| e.message.as_str()).collect();
                return Err(Error::query(messages.join("; ")));
            }
        }

        if !status.is_success() {
            return Err(Error::query(format!("HTTP {}: {}", status, body.trim())));
        }

        match parsed {
            Some(GraphQlResponse {
                data: Some(data), ..
            }) => Ok(data),
            Some(_) => Err(Error::query("response carried no data")),
            None => Err(Error::query("response is not valid GraphQL JSON")),
        }
    }
}

fn take_field(mut data: Value, query: &Query) -> Option<Value> {
    let mut value = data.get_mut(query.field)?.take();
    if let Some(list) = query.list {
        value = value.get_mut(list)?.take();
    }
    Some(value)
}
