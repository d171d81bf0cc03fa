use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known values of `related_entity_type`. Any other string is accepted.
pub mod related_entity {
    pub const HOMEWORK: &str = "homework";
    pub const PURCHASE: &str = "purchase";
    pub const MANUAL_ADJUSTMENT: &str = "manual-adjustment";
}

/// A row of `coin_history`. Rows are append-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinHistoryRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub user_id: String,
    /// Positive for a credit, negative for a debit
    pub change_amount: i64,
    pub reason: String,
    pub related_entity_type: String,
    pub created_at: DateTime<Utc>,
}

impl CoinHistoryRow {
    pub fn new(
        user_id: impl Into<String>,
        change_amount: i64,
        reason: impl Into<String>,
        related_entity_type: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            change_amount,
            reason: reason.into(),
            related_entity_type: related_entity_type.into(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn debit_keeps_its_sign_on_the_wire() {
        let created_at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let row = CoinHistoryRow::new("u9", -10, "purchase", related_entity::PURCHASE, created_at);

        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({
                "user_id": "u9",
                "change_amount": -10,
                "reason": "purchase",
                "related_entity_type": "purchase",
                "created_at": "2025-01-02T03:04:05Z"
            })
        );
    }

    #[test]
    fn representation_from_store_deserializes() {
        let row: CoinHistoryRow = serde_json::from_value(json!({
            "id": "5b0c6a0e-3f7e-4c43-9a43-0f3c2f0c8d11",
            "user_id": "u9",
            "change_amount": 25,
            "reason": "Homework: Fractions",
            "related_entity_type": "homework",
            "created_at": "2025-01-02T03:04:05.5+00:00"
        }))
        .unwrap();

        assert_eq!(row.change_amount, 25);
        assert_eq!(row.id, Some(json!("5b0c6a0e-3f7e-4c43-9a43-0f3c2f0c8d11")));
    }
}
