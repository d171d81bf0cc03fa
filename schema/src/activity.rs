use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    CoinsAwarded,
    CoinsRemoved,
    CreatureAssigned,
    CreatureRemoved,
    StudentAddedToClass,
    StudentRemovedFromClass,
    HomeworkCreated,
}

impl ActivityType {
    pub const ALL: [ActivityType; 7] = [
        ActivityType::CoinsAwarded,
        ActivityType::CoinsRemoved,
        ActivityType::CreatureAssigned,
        ActivityType::CreatureRemoved,
        ActivityType::StudentAddedToClass,
        ActivityType::StudentRemovedFromClass,
        ActivityType::HomeworkCreated,
    ];

    /// Value stored in the `activity_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::CoinsAwarded => "coins_awarded",
            ActivityType::CoinsRemoved => "coins_removed",
            ActivityType::CreatureAssigned => "creature_assigned",
            ActivityType::CreatureRemoved => "creature_removed",
            ActivityType::StudentAddedToClass => "student_added_to_class",
            ActivityType::StudentRemovedFromClass => "student_removed_from_class",
            ActivityType::HomeworkCreated => "homework_created",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute bag stored in the `details` column.
///
/// Which keys are set depends on the activity type. Keys not modelled here are
/// kept in `extra` and written back untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// Creature or shop item the action was about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A row of `user_activities`.
///
/// `class_id` and `school_id` duplicate `details.classId` and `details.schoolId`
/// so the feed can filter on plain columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserActivityRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub user_id: String,
    pub activity_type: ActivityType,
    #[serde(default)]
    pub details: ActivityDetails,
    pub is_public: bool,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub school_id: Option<String>,
    /// Assigned by the store when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserActivityRow {
    pub fn new(
        user_id: impl Into<String>,
        activity_type: ActivityType,
        details: ActivityDetails,
        is_public: bool,
    ) -> Self {
        let class_id = details.class_id.clone();
        let school_id = details.school_id.clone();
        Self {
            id: None,
            user_id: user_id.into(),
            activity_type,
            details,
            is_public,
            class_id,
            school_id,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn activity_types_use_column_names() {
        for activity_type in ActivityType::ALL {
            let value = serde_json::to_value(activity_type).unwrap();
            assert_eq!(value, json!(activity_type.as_str()));
        }
    }

    #[test]
    fn unknown_activity_type_is_rejected() {
        let res = serde_json::from_value::<ActivityType>(json!("coins_stolen"));
        assert!(res.is_err());
    }

    #[test]
    fn row_duplicates_class_and_school() {
        let details: ActivityDetails = serde_json::from_value(json!({
            "classId": "c1",
            "schoolId": "s1",
            "studentId": "u9"
        }))
        .unwrap();

        let row = UserActivityRow::new("t1", ActivityType::CoinsAwarded, details, true);
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["class_id"], "c1");
        assert_eq!(value["school_id"], "s1");
        assert_eq!(
            value["details"],
            json!({"classId": "c1", "schoolId": "s1", "studentId": "u9"})
        );
        // Left for the store to assign
        assert!(value.get("id").is_none());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn row_without_class_writes_null_columns() {
        let row = UserActivityRow::new(
            "t1",
            ActivityType::HomeworkCreated,
            ActivityDetails {
                title: Some("Fractions".to_string()),
                ..Default::default()
            },
            false,
        );
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["class_id"], Value::Null);
        assert_eq!(value["school_id"], Value::Null);
        assert_eq!(value["is_public"], false);
    }

    #[test]
    fn unknown_detail_keys_survive() {
        let input = json!({"studentId": "u9", "pokemonRarity": "legendary", "amount": 5});
        let details: ActivityDetails = serde_json::from_value(input.clone()).unwrap();

        assert_eq!(details.amount, Some(5));
        assert_eq!(details.extra.get("pokemonRarity"), Some(&json!("legendary")));
        assert_eq!(serde_json::to_value(&details).unwrap(), input);
    }

    #[test]
    fn stored_row_deserializes() {
        let row: UserActivityRow = serde_json::from_value(json!({
            "id": 42,
            "user_id": "t1",
            "activity_type": "creature_assigned",
            "details": {"studentId": "u9", "itemName": "Pikachu"},
            "is_public": true,
            "class_id": null,
            "school_id": "s1",
            "created_at": "2025-03-01T10:15:00.123456+00:00"
        }))
        .unwrap();

        assert_eq!(row.id, Some(json!(42)));
        assert_eq!(row.activity_type, ActivityType::CreatureAssigned);
        assert_eq!(row.details.item_name.as_deref(), Some("Pikachu"));
        assert_eq!(row.class_id, None);
        assert!(row.created_at.is_some());
    }
}
