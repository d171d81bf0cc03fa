use std::sync::Arc;

use schema::{CoinHistoryRow, related_entity};
use serde::{Deserialize, Serialize};

use crate::{
    activity::{ActivityRecorder, ClassContext, NewActivity, Subject},
    error::Error,
    store::RemoteStore,
    transaction::TransactionRecorder,
};

/// A teacher moving coins into or out of a student's balance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinAdjustment {
    pub actor_id: String,
    pub student_id: String,
    #[serde(default)]
    pub student_name: Option<String>,
    /// Number of coins, always positive. The direction comes from the call.
    pub amount: i64,
    pub reason: String,
    #[serde(default = "default_related_entity_type")]
    pub related_entity_type: String,
    #[serde(flatten)]
    pub class: ClassContext,
}

fn default_related_entity_type() -> String {
    related_entity::MANUAL_ADJUSTMENT.to_string()
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Award,
    Remove,
}

/// Award and remove coins.
///
/// The ledger row decides the outcome. The activity row is written afterwards
/// with no coordination: if it fails the adjustment still stands, and if the
/// ledger row fails no activity is written.
#[derive(Clone)]
pub struct CoinLedger {
    transactions: TransactionRecorder,
    activities: ActivityRecorder,
}

impl CoinLedger {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            transactions: TransactionRecorder::new(store.clone()),
            activities: ActivityRecorder::new(store),
        }
    }

    pub fn from_recorders(transactions: TransactionRecorder, activities: ActivityRecorder) -> Self {
        Self {
            transactions,
            activities,
        }
    }

    pub async fn award(&self, adjustment: CoinAdjustment) -> Result<Option<CoinHistoryRow>, Error> {
        self.apply(adjustment, Direction::Award).await
    }

    pub async fn remove(
        &self,
        adjustment: CoinAdjustment,
    ) -> Result<Option<CoinHistoryRow>, Error> {
        self.apply(adjustment, Direction::Remove).await
    }

    #[tracing::instrument(
        skip_all,
        fields(?direction, student_id = %adjustment.student_id, amount = adjustment.amount)
    )]
    async fn apply(
        &self,
        adjustment: CoinAdjustment,
        direction: Direction,
    ) -> Result<Option<CoinHistoryRow>, Error> {
        if adjustment.amount <= 0 {
            tracing::warn!("refusing coin adjustment without a positive amount");
            return Err(Error::InvalidInput(format!(
                "amount must be a positive number of coins, got {}",
                adjustment.amount
            )));
        }

        let change_amount = match direction {
            Direction::Award => adjustment.amount,
            Direction::Remove => -adjustment.amount,
        };
        let created = self
            .transactions
            .record(
                &adjustment.student_id,
                change_amount,
                &adjustment.reason,
                &adjustment.related_entity_type,
            )
            .await?;

        let student = Subject::new(adjustment.student_id, adjustment.student_name);
        let activity = match direction {
            Direction::Award => NewActivity::coins_awarded(
                adjustment.actor_id,
                &student,
                adjustment.amount,
                &adjustment.class,
            ),
            Direction::Remove => NewActivity::coins_removed(
                adjustment.actor_id,
                &student,
                adjustment.amount,
                &adjustment.class,
            ),
        };
        self.activities.record(activity).await;

        Ok(created)
    }
}
