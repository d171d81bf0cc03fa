use std::sync::Arc;

use schema::{ActivityDetails, ActivityType, Table, UserActivityRow};
use serde::{Deserialize, Serialize};

use crate::{error::Error, store::RemoteStore};

/// The student (or other user) an action was about
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subject {
    pub id: String,
    pub name: Option<String>,
}

impl Subject {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
        }
    }
}

/// Class and school an action happened in
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassContext {
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub school_id: Option<String>,
}

/// An activity about to be recorded. Public unless made private.
#[derive(Clone, Debug, PartialEq)]
pub struct NewActivity {
    pub actor_id: String,
    pub activity_type: ActivityType,
    pub details: ActivityDetails,
    pub is_public: bool,
}

impl NewActivity {
    pub fn new(
        actor_id: impl Into<String>,
        activity_type: ActivityType,
        details: ActivityDetails,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            activity_type,
            details,
            is_public: true,
        }
    }

    pub fn with_visibility(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// `amount` is the number of coins moved, always positive
    pub fn coins_awarded(
        actor_id: impl Into<String>,
        student: &Subject,
        amount: i64,
        class: &ClassContext,
    ) -> Self {
        let details = ActivityDetails {
            amount: Some(amount),
            ..student_details(student, class)
        };
        Self::new(actor_id, ActivityType::CoinsAwarded, details)
    }

    pub fn coins_removed(
        actor_id: impl Into<String>,
        student: &Subject,
        amount: i64,
        class: &ClassContext,
    ) -> Self {
        let details = ActivityDetails {
            amount: Some(amount),
            ..student_details(student, class)
        };
        Self::new(actor_id, ActivityType::CoinsRemoved, details)
    }

    pub fn creature_assigned(
        actor_id: impl Into<String>,
        student: &Subject,
        creature_name: impl Into<String>,
        class: &ClassContext,
    ) -> Self {
        let details = ActivityDetails {
            item_name: Some(creature_name.into()),
            ..student_details(student, class)
        };
        Self::new(actor_id, ActivityType::CreatureAssigned, details)
    }

    pub fn creature_removed(
        actor_id: impl Into<String>,
        student: &Subject,
        creature_name: impl Into<String>,
        class: &ClassContext,
    ) -> Self {
        let details = ActivityDetails {
            item_name: Some(creature_name.into()),
            ..student_details(student, class)
        };
        Self::new(actor_id, ActivityType::CreatureRemoved, details)
    }

    pub fn student_added_to_class(
        actor_id: impl Into<String>,
        student: &Subject,
        class: &ClassContext,
    ) -> Self {
        Self::new(
            actor_id,
            ActivityType::StudentAddedToClass,
            student_details(student, class),
        )
    }

    pub fn student_removed_from_class(
        actor_id: impl Into<String>,
        student: &Subject,
        class: &ClassContext,
    ) -> Self {
        Self::new(
            actor_id,
            ActivityType::StudentRemovedFromClass,
            student_details(student, class),
        )
    }

    pub fn homework_created(
        actor_id: impl Into<String>,
        title: impl Into<String>,
        class: &ClassContext,
    ) -> Self {
        let details = ActivityDetails {
            title: Some(title.into()),
            ..class_details(class)
        };
        Self::new(actor_id, ActivityType::HomeworkCreated, details)
    }
}

fn class_details(class: &ClassContext) -> ActivityDetails {
    ActivityDetails {
        class_id: class.class_id.clone(),
        class_name: class.class_name.clone(),
        school_id: class.school_id.clone(),
        ..Default::default()
    }
}

fn student_details(student: &Subject, class: &ClassContext) -> ActivityDetails {
    ActivityDetails {
        student_id: Some(student.id.clone()),
        student_name: student.name.clone(),
        ..class_details(class)
    }
}

/// Writes `user_activities` rows.
///
/// Recording is best-effort: a failed write is logged and swallowed, so the
/// action that triggered it is never held back by its audit trail.
#[derive(Clone)]
pub struct ActivityRecorder {
    store: Arc<dyn RemoteStore>,
}

impl ActivityRecorder {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Makes exactly one write attempt. Never fails.
    #[tracing::instrument(
        skip_all,
        fields(actor_id = %activity.actor_id, activity_type = %activity.activity_type)
    )]
    pub async fn record(&self, activity: NewActivity) {
        if let Err(error) = self.write(activity).await {
            tracing::error!(%error, "unable to record activity");
        }
    }

    async fn write(&self, activity: NewActivity) -> Result<(), Error> {
        if activity.actor_id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "actor id must not be empty".to_string(),
            ));
        }

        let row = UserActivityRow::new(
            activity.actor_id,
            activity.activity_type,
            activity.details,
            activity.is_public,
        );
        let row = serde_json::to_value(&row)?;
        self.store.insert(Table::UserActivities, row).await?;
        tracing::debug!("activity recorded");
        Ok(())
    }
}
