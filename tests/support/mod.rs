//! Shared test utilities.

use std::sync::Arc;
use std::time::Duration;

use beam_site::{PostgrestStore, PostgrestStoreConfig, RecordStore};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API key the fake record store expects.
pub const STORE_KEY: &str = "anon-test-key";

/// How long a test waits for an asynchronous outcome.
pub const WAIT: Duration = Duration::from_secs(5);

/// A research project row as the store returns it.
pub fn project_row(id: &str, title: &str, city: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "A study",
        "researcher_name": "Dr. Rivera",
        "city": city,
        "category": "Biology",
        "funding_goal": 1000,
        "current_funding": 250,
        "status": "active",
        "created_at": "2025-01-15T10:00:00Z"
    })
}

/// Answers every read of `table` with `rows`.
pub async fn serve_rows(server: &MockServer, table: &str, rows: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{table}")))
        .and(header("apikey", STORE_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

/// Record store client pointed at `server`.
///
/// # Panics
///
/// Panics if the client cannot be built.
pub fn store_for(server: &MockServer) -> Arc<dyn RecordStore> {
    let config = PostgrestStoreConfig::new(server.uri(), STORE_KEY);
    let store = PostgrestStore::new(&config)
        .unwrap_or_else(|error| panic!("store client should build: {error}"));
    Arc::new(store)
}
