use async_trait::async_trait;
use postgrest::Postgrest;
use schema::Table;
use serde_json::Value;

use super::{Query, RemoteStore};
use crate::error::Error;

/// Supabase REST backend
pub struct PostgrestStore {
    client: Postgrest,
}

impl PostgrestStore {
    pub fn new(supabase_url: &str, supabase_key: &str) -> Self {
        let client = Postgrest::new(format!(
            "{}/rest/v1",
            supabase_url.trim_end_matches('/')
        ))
        .insert_header("apikey", supabase_key)
        .insert_header("Authorization", format!("Bearer {supabase_key}"))
        .insert_header("Prefer", "return=representation");

        Self { client }
    }
}

#[async_trait]
impl RemoteStore for PostgrestStore {
    #[tracing::instrument(skip_all, fields(table = %table))]
    async fn insert(&self, table: Table, row: Value) -> Result<Vec<Value>, Error> {
        let body = serde_json::to_string(&row)?;
        let res = self
            .client
            .from(table.name())
            .insert(body)
            .execute()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = res.status().as_u16();
        let text = res.text().await.map_err(|e| Error::Network(e.to_string()))?;
        rows_from_response(status, &text)
    }

    #[tracing::instrument(skip_all, fields(table = %table, ?query))]
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>, Error> {
        let mut builder = self.client.from(table.name()).select("*");
        for (column, value) in &query.filters {
            builder = builder.eq(column, value);
        }
        if let Some(column) = &query.order_desc {
            builder = builder.order(format!("{column}.desc"));
        }
        if let Some(limit) = query.limit {
            builder = builder.limit(limit);
        }

        let res = builder
            .execute()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = res.status().as_u16();
        let text = res.text().await.map_err(|e| Error::Network(e.to_string()))?;
        rows_from_response(status, &text)
    }
}

/// Turns a PostgREST response into rows, or the error its status stands for
fn rows_from_response(status: u16, text: &str) -> Result<Vec<Value>, Error> {
    if !(200..300).contains(&status) {
        return Err(Error::from_status(status, text));
    }
    if text.trim().is_empty() {
        // `return=minimal`, or a 204 from a proxy in front of the store
        return Ok(vec![]);
    }

    match serde_json::from_str::<Value>(text)? {
        Value::Array(rows) => Ok(rows),
        row @ Value::Object(_) => Ok(vec![row]),
        other => {
            tracing::warn!(body = %other, "unexpected response body from store");
            Ok(vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn representation_array_is_returned() {
        let rows = rows_from_response(201, r#"[{"id":1,"change_amount":-10}]"#).unwrap();
        assert_eq!(rows, vec![json!({"id": 1, "change_amount": -10})]);
    }

    #[test]
    fn empty_body_is_no_rows() {
        assert_eq!(rows_from_response(201, "").unwrap(), Vec::<Value>::new());
        assert_eq!(rows_from_response(204, "  ").unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn auth_failures_are_permission_errors() {
        let body = r#"{"message":"new row violates row-level security policy"}"#;
        assert!(matches!(
            rows_from_response(401, body),
            Err(Error::Permission { status: 401, .. })
        ));
        assert!(matches!(
            rows_from_response(403, body),
            Err(Error::Permission { status: 403, .. })
        ));
    }

    #[test]
    fn other_failures_are_rejections() {
        let err = rows_from_response(400, r#"{"code":"22P02"}"#).unwrap_err();
        assert_eq!(
            err,
            Error::Rejected {
                status: 400,
                message: r#"{"code":"22P02"}"#.to_string()
            }
        );
        assert!(matches!(
            rows_from_response(503, "upstream unavailable"),
            Err(Error::Rejected { status: 503, .. })
        ));
    }

    #[test]
    fn garbage_success_body_is_a_serialization_error() {
        assert!(matches!(
            rows_from_response(200, "<html>"),
            Err(Error::Serialization(_))
        ));
    }
}
