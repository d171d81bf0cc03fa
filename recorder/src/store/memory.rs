use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schema::Table;
use serde_json::Value;

use super::{Query, RemoteStore};
use crate::error::Error;

/// In-process store for development and tests.
///
/// Assigns `id` and `created_at` the way the database defaults would, and can
/// be told to fail every call to simulate an unavailable or hostile store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<Table, Vec<Value>>,
    next_id: u64,
    failure: Option<Error>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following call returns `error` until [`MemoryStore::recover`]
    pub fn fail_with(&self, error: Error) {
        self.lock().failure = Some(error);
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    /// Rows of `table` in insertion order
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.lock().tables.get(&table).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn insert(&self, table: Table, row: Value) -> Result<Vec<Value>, Error> {
        let mut inner = self.lock();
        if let Some(error) = &inner.failure {
            return Err(error.clone());
        }

        let Value::Object(mut row) = row else {
            return Err(Error::Rejected {
                status: 400,
                message: "row must be a JSON object".to_string(),
            });
        };

        inner.next_id += 1;
        let id = inner.next_id;
        row.entry("id").or_insert_with(|| Value::from(id));
        match row.get("created_at") {
            Some(Value::String(_)) => {}
            _ => {
                row.insert(
                    "created_at".to_string(),
                    Value::String(Utc::now().to_rfc3339()),
                );
            }
        }

        let row = Value::Object(row);
        inner.tables.entry(table).or_default().push(row.clone());
        Ok(vec![row])
    }

    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>, Error> {
        let inner = self.lock();
        if let Some(error) = &inner.failure {
            return Err(error.clone());
        }

        // Newest insert first, so ties in the order column keep that order
        let mut rows: Vec<Value> = inner
            .tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .rev()
                    .filter(|row| {
                        query
                            .filters
                            .iter()
                            .all(|(column, value)| column_matches(row, column, value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(column) = &query.order_desc {
            rows.sort_by(|a, b| compare_column(b, a, column));
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }
}

fn column_matches(row: &Value, column: &str, expected: &str) -> bool {
    match row.get(column) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Bool(b)) => b.to_string() == expected,
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::Null) | None => expected == "null",
        Some(_) => false,
    }
}

fn compare_column(a: &Value, b: &Value, column: &str) -> Ordering {
    let a = a.get(column);
    let b = b.get(column);
    match (a.and_then(as_timestamp), b.and_then(as_timestamp)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => match (a, b) {
            (Some(Value::Number(a)), Some(Value::Number(b))) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(Ordering::Equal),
            (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
            _ => Ordering::Equal,
        },
    }
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_id_and_created_at() {
        let store = MemoryStore::new();
        let rows = store
            .insert(Table::UserActivities, json!({"user_id": "t1"}))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 1);
        assert!(as_timestamp(&rows[0]["created_at"]).is_some());
        assert_eq!(store.rows(Table::UserActivities), rows);
        assert!(store.rows(Table::CoinHistory).is_empty());
    }

    #[tokio::test]
    async fn client_timestamp_is_kept() {
        let store = MemoryStore::new();
        let rows = store
            .insert(
                Table::CoinHistory,
                json!({"user_id": "u9", "created_at": "2025-01-02T03:04:05Z"}),
            )
            .await
            .unwrap();

        assert_eq!(rows[0]["created_at"], "2025-01-02T03:04:05Z");
    }

    #[tokio::test]
    async fn non_object_rows_are_rejected() {
        let store = MemoryStore::new();
        let err = store
            .insert(Table::CoinHistory, json!([1, 2]))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Rejected { status: 400, .. }));
        assert!(store.rows(Table::CoinHistory).is_empty());
    }

    #[tokio::test]
    async fn injected_failure_applies_until_recovered() {
        let store = MemoryStore::new();
        store.fail_with(Error::Network("connection reset".to_string()));

        let err = store
            .insert(Table::CoinHistory, json!({"user_id": "u9"}))
            .await
            .unwrap_err();
        assert_eq!(err, Error::Network("connection reset".to_string()));
        assert!(
            store
                .select(Table::CoinHistory, &Query::new())
                .await
                .is_err()
        );

        store.recover();
        store
            .insert(Table::CoinHistory, json!({"user_id": "u9"}))
            .await
            .unwrap();
        assert_eq!(store.rows(Table::CoinHistory).len(), 1);
    }

    #[tokio::test]
    async fn select_filters_orders_and_limits() {
        let store = MemoryStore::new();
        for (user, class, public, at) in [
            ("a", "c1", true, "2025-01-01T00:00:00Z"),
            ("b", "c1", false, "2025-01-02T00:00:00Z"),
            ("c", "c2", true, "2025-01-03T00:00:00Z"),
            ("d", "c1", true, "2025-01-04T00:00:00+02:00"),
            ("e", "c1", true, "2025-01-03T12:00:00Z"),
        ] {
            store
                .insert(
                    Table::UserActivities,
                    json!({"user_id": user, "class_id": class, "is_public": public, "created_at": at}),
                )
                .await
                .unwrap();
        }

        let query = Query::new()
            .eq("class_id", "c1")
            .eq("is_public", "true")
            .order_desc("created_at")
            .limit(2);
        let rows = store.select(Table::UserActivities, &query).await.unwrap();
        let users: Vec<&str> = rows.iter().map(|r| r["user_id"].as_str().unwrap()).collect();

        assert_eq!(users, vec!["d", "e"]);
    }

    #[test]
    fn null_columns_match_null_filter() {
        let row = json!({"class_id": null});
        assert!(column_matches(&row, "class_id", "null"));
        assert!(!column_matches(&row, "class_id", "c1"));
        assert!(column_matches(&json!({}), "class_id", "null"));
    }
}
