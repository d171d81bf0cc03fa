use async_trait::async_trait;
use schema::Table;
use serde_json::Value;

use crate::error::Error;

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::PostgrestStore;

/// The remote data store behind the recorders.
///
/// Implementations own durability and consistency. Every call is a single
/// request: no retries, no batching, no transactions spanning calls.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Inserts one row, returning the rows the store reports as created.
    async fn insert(&self, table: Table, row: Value) -> Result<Vec<Value>, Error>;

    /// Reads rows matching `query`.
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>, Error>;
}

/// Equality filters, an optional descending order and a row limit
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<(String, String)>,
    pub order_desc: Option<String>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order_desc = Some(column.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
