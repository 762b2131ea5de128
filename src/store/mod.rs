//! Read-only access to the hosted record store.
//!
//! The site never writes records. It asks the store for a table's rows with
//! an AND of equality predicates and an ordering, and nothing more. The
//! [`RecordStore`] trait is the seam the listing controller and the polling
//! change feed depend on; [`PostgrestStore`] speaks the PostgREST dialect of
//! the hosted backend. Rows travel as raw JSON so one object-safe trait can
//! serve every entity kind; decoding happens at the listing boundary.

mod error;
mod postgrest;
mod query;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::StoreError;
pub use postgrest::{PostgrestStore, PostgrestStoreConfig};
pub use query::{EqualityFilter, OrderBy, SortDirection, StoreQuery};

use async_trait::async_trait;
use serde_json::Value;

/// Store that can answer filtered, ordered table queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every row of `query.table` matching all predicates, in the
    /// requested order.
    async fn query(&self, query: &StoreQuery) -> Result<Vec<Value>, StoreError>;
}
