use std::sync::Arc;

use chrono::Utc;
use schema::{CoinHistoryRow, Table};

use crate::{error::Error, store::RemoteStore};

/// Writes `coin_history` rows.
///
/// Unlike activities, a failed ledger write is returned to the caller: a coin
/// change without its ledger row did not happen.
#[derive(Clone)]
pub struct TransactionRecorder {
    store: Arc<dyn RemoteStore>,
}

impl TransactionRecorder {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Makes exactly one write attempt and returns the created row as reported
    /// by the store, if it reported one.
    ///
    /// Identical calls create identical, separate rows.
    #[tracing::instrument(skip(self), err(Display))]
    pub async fn record(
        &self,
        subject_id: &str,
        change_amount: i64,
        reason: &str,
        related_entity_type: &str,
    ) -> Result<Option<CoinHistoryRow>, Error> {
        if subject_id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "subject id must not be empty".to_string(),
            ));
        }

        let row = CoinHistoryRow::new(
            subject_id,
            change_amount,
            reason,
            related_entity_type,
            Utc::now(),
        );
        let rows = self
            .store
            .insert(Table::CoinHistory, serde_json::to_value(&row)?)
            .await?;

        let created = rows
            .into_iter()
            .next()
            .map(serde_json::from_value::<CoinHistoryRow>)
            .transpose()?;
        tracing::debug!(id = ?created.as_ref().and_then(|r| r.id.as_ref()), "coin history recorded");
        Ok(created)
    }
}
