//! Row types for the Supabase relations written by the recorders
//!
//! ## Relations
//!
//! - `user_activities`: audit trail of classroom actions
//! - `coin_history`: ledger of coin balance changes
//!
pub mod activity;
pub mod coin_history;

pub use activity::{ActivityDetails, ActivityType, UserActivityRow};
pub use coin_history::{CoinHistoryRow, related_entity};

/// Remote relations touched by the recording path
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    UserActivities,
    CoinHistory,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::UserActivities => "user_activities",
            Table::CoinHistory => "coin_history",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
