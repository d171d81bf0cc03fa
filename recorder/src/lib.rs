//! Recording path for classroom actions
//!
//! ## Current API
//!
//! - Record activities (best-effort, never fails the caller)
//! - Record coin history (failures are returned to the caller)
//! - Award and remove coins
//! - Read the public activity feed
//!
pub mod activity;
pub mod error;
pub mod feed;
pub mod ledger;
pub mod presentation;
pub mod store;
pub mod transaction;

pub use activity::{ActivityRecorder, ClassContext, NewActivity, Subject};
pub use error::Error;
pub use feed::ActivityFeed;
pub use ledger::{CoinAdjustment, CoinLedger};
pub use presentation::{ActivationStatus, Presentation, Translator};
pub use store::{MemoryStore, PostgrestStore, Query, RemoteStore};
pub use transaction::TransactionRecorder;
