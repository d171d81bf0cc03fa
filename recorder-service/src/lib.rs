//! HTTP surface over the recorders
//!
//! UI action handlers post activities, coin history and coin adjustments here,
//! and read the public activity feed back.
use axum::{
    Router,
    routing::{get, post},
};

pub mod config;
pub mod error;
pub mod routes;

/// Routes with state, without the transport layers added in `main`
pub fn router(state: config::AppState) -> Router {
    Router::new()
        .route("/status/ping", get(routes::get_status_ping))
        .route("/status/activation/{user_id}", get(routes::get_activation))
        .route("/activities", post(routes::post_activity))
        .route("/coin-history", post(routes::post_coin_history))
        .route("/coins/award", post(routes::post_coins_award))
        .route("/coins/remove", post(routes::post_coins_remove))
        .route("/classes/{class_id}/feed", get(routes::get_class_feed))
        .route("/schools/{school_id}/feed", get(routes::get_school_feed))
        .with_state(state)
}
