//! PostgREST implementation of [`RecordStore`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use super::error::{extract_store_message, map_http_error, map_transport_error};
use super::{RecordStore, StoreError, StoreQuery};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const REST_PATH: &str = "rest/v1/";

/// Connection settings for [`PostgrestStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgrestStoreConfig {
    /// Project base URL (e.g. `https://abc.supabase.co`).
    pub base_url: String,
    /// Public API key sent as both `apikey` and bearer token.
    pub api_key: String,
    /// HTTP timeout applied to every request.
    pub timeout: Duration,
}

impl PostgrestStoreConfig {
    /// Constructs configuration with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Record store backed by a PostgREST endpoint under `/rest/v1/`.
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: Client,
    rest_root: Url,
    api_key: String,
    timeout: Duration,
}

impl PostgrestStore {
    /// Builds a store client.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] when the base URL does not parse
    /// or the HTTP client cannot be built.
    pub fn new(config: &PostgrestStoreConfig) -> Result<Self, StoreError> {
        let mut base = Url::parse(&config.base_url).map_err(|error| StoreError::Configuration {
            message: format!("store URL '{}' is invalid: {error}", config.base_url),
        })?;
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        let rest_root = base
            .join(REST_PATH)
            .map_err(|error| StoreError::Configuration {
                message: format!("store URL cannot hold a REST path: {error}"),
            })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| StoreError::Configuration {
                message: format!("failed to configure store HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            rest_root,
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        self.rest_root
            .join(table)
            .map_err(|error| StoreError::Configuration {
                message: format!("table name '{table}' does not form a URL: {error}"),
            })
    }
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn query(&self, query: &StoreQuery) -> Result<Vec<Value>, StoreError> {
        let endpoint = self.table_url(&query.table)?;
        let response = self
            .client
            .get(endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .query(&query.to_postgrest_params())
            .send()
            .await
            .map_err(|error| map_transport_error(&query.table, &error, self.timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(
                &query.table,
                status,
                extract_store_message(&body),
            ));
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|error| StoreError::Decode {
                message: format!("rows from {} were not a JSON array: {error}", query.table),
            })
    }
}
