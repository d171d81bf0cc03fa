use std::sync::Arc;

use schema::{Table, UserActivityRow};

use crate::{error::Error, presentation::Translator, store::Query, store::RemoteStore};

pub const DEFAULT_FEED_LIMIT: usize = 20;
pub const MAX_FEED_LIMIT: usize = 100;

/// Public activities of a class or school, newest first
#[derive(Clone)]
pub struct ActivityFeed {
    store: Arc<dyn RemoteStore>,
}

impl ActivityFeed {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    pub async fn public_for_class(
        &self,
        class_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<UserActivityRow>, Error> {
        self.public_where("class_id", class_id, limit).await
    }

    pub async fn public_for_school(
        &self,
        school_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<UserActivityRow>, Error> {
        self.public_where("school_id", school_id, limit).await
    }

    #[tracing::instrument(skip(self), err(Display))]
    async fn public_where(
        &self,
        column: &str,
        value: &str,
        limit: Option<usize>,
    ) -> Result<Vec<UserActivityRow>, Error> {
        let limit = limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT);
        let query = Query::new()
            .eq(column, value)
            .eq("is_public", "true")
            .order_desc("created_at")
            .limit(limit);

        let rows = self.store.select(Table::UserActivities, &query).await?;
        let rows = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<UserActivityRow>, _>>()?;
        Ok(rows)
    }
}

/// One line for a feed entry, e.g. `coins_awarded: Ash (5)`
pub fn describe(row: &UserActivityRow, translator: &Translator) -> String {
    let details = &row.details;
    let mut line = translator.translate(row.activity_type.as_str()).to_string();

    let subject = details
        .student_name
        .as_deref()
        .or(details.student_id.as_deref())
        .or(details.title.as_deref());
    if let Some(subject) = subject {
        line.push_str(": ");
        line.push_str(subject);
    }
    if let Some(item) = &details.item_name {
        line.push_str(" - ");
        line.push_str(item);
    }
    if let Some(amount) = details.amount {
        line.push_str(&format!(" ({amount})"));
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{ActivityDetails, ActivityType};
    use std::collections::HashMap;

    fn row(activity_type: ActivityType, details: ActivityDetails) -> UserActivityRow {
        UserActivityRow::new("t1", activity_type, details, true)
    }

    #[test]
    fn describes_coin_awards() {
        let row = row(
            ActivityType::CoinsAwarded,
            ActivityDetails {
                student_id: Some("u9".to_string()),
                student_name: Some("Ash".to_string()),
                amount: Some(5),
                ..Default::default()
            },
        );

        assert_eq!(describe(&row, &Translator::Identity), "coins_awarded: Ash (5)");
    }

    #[test]
    fn describes_creatures_with_translation() {
        let translator = Translator::Catalog(HashMap::from([(
            "creature_assigned".to_string(),
            "Creature assigned".to_string(),
        )]));
        let row = row(
            ActivityType::CreatureAssigned,
            ActivityDetails {
                student_id: Some("u9".to_string()),
                item_name: Some("Pikachu".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(describe(&row, &translator), "Creature assigned: u9 - Pikachu");
    }

    #[test]
    fn describes_homework_by_title() {
        let row = row(
            ActivityType::HomeworkCreated,
            ActivityDetails {
                title: Some("Fractions".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(describe(&row, &Translator::Identity), "homework_created: Fractions");
    }
}
