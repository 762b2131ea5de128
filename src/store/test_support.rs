//! In-memory record stores for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use super::{RecordStore, StoreError, StoreQuery};

/// Store that answers every query with the same rows and records what it
/// was asked.
#[derive(Debug)]
pub struct StaticRecordStore {
    rows: Mutex<Result<Vec<Value>, StoreError>>,
    queries: Mutex<Vec<StoreQuery>>,
    calls: AtomicUsize,
}

impl StaticRecordStore {
    /// Creates a store returning `rows`.
    #[must_use]
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows: Mutex::new(Ok(rows)),
            queries: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a store failing every query with `error`.
    #[must_use]
    pub fn failing(error: StoreError) -> Self {
        Self {
            rows: Mutex::new(Err(error)),
            queries: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replaces the rows returned by subsequent queries.
    pub fn set_rows(&self, rows: Vec<Value>) {
        if let Ok(mut guard) = self.rows.lock() {
            *guard = Ok(rows);
        }
    }

    /// Number of queries answered so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries received so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<StoreQuery> {
        self.queries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Default for StaticRecordStore {
    fn default() -> Self {
        Self::with_rows(Vec::new())
    }
}

#[async_trait]
impl RecordStore for StaticRecordStore {
    async fn query(&self, query: &StoreQuery) -> Result<Vec<Value>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.queries.lock() {
            guard.push(query.clone());
        }
        self.rows
            .lock()
            .map_err(|_poisoned| StoreError::Network {
                message: "test store lock poisoned".to_owned(),
            })?
            .clone()
    }
}

/// Store whose answers are released by the test, keyed by the value of one
/// filter field. Queries without that filter use the key `"*"`.
///
/// Lets a test hold several fetches in flight and complete them in any
/// order.
#[derive(Debug)]
pub struct GatedRecordStore {
    key_field: String,
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<Vec<Value>, StoreError>>>>,
}

/// Sender side of one gate in a [`GatedRecordStore`].
pub type Gate = oneshot::Sender<Result<Vec<Value>, StoreError>>;

impl GatedRecordStore {
    /// Creates a store keyed on `key_field`.
    #[must_use]
    pub fn keyed_on(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a gate for `key` and returns the sender that releases it.
    #[must_use]
    pub fn gate(&self, key: &str) -> Gate {
        let (sender, receiver) = oneshot::channel();
        if let Ok(mut gates) = self.gates.lock() {
            gates.insert(key.to_owned(), receiver);
        }
        sender
    }

    fn key_for(&self, query: &StoreQuery) -> String {
        query
            .filters
            .iter()
            .find(|filter| filter.field == self.key_field)
            .map_or_else(|| "*".to_owned(), |filter| filter.value.clone())
    }
}

#[async_trait]
impl RecordStore for GatedRecordStore {
    async fn query(&self, query: &StoreQuery) -> Result<Vec<Value>, StoreError> {
        let key = self.key_for(query);
        let receiver = self
            .gates
            .lock()
            .ok()
            .and_then(|mut gates| gates.remove(&key))
            .ok_or_else(|| StoreError::Api {
                status: 404,
                message: format!("no gate registered for {key}"),
            })?;
        receiver.await.map_err(|_closed| StoreError::Network {
            message: format!("gate {key} dropped"),
        })?
    }
}
