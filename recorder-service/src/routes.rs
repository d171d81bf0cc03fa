use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use recorder::{CoinAdjustment, NewActivity, feed::describe};
use schema::{ActivityDetails, ActivityType, CoinHistoryRow, UserActivityRow};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{config::AppState, error::Error};

pub async fn get_status_ping() -> impl IntoResponse {
    info!("Status");
    StatusCode::OK
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationResponse {
    pub user_id: String,
    pub active: bool,
}

pub async fn get_activation(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<ActivationResponse> {
    let active = state.presentation.activation.is_active(&user_id);
    Json(ActivationResponse { user_id, active })
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    pub actor_id: String,
    pub activity_type: ActivityType,
    #[serde(default)]
    pub details: ActivityDetails,
    #[serde(default = "public_by_default")]
    pub is_public: bool,
}

fn public_by_default() -> bool {
    true
}

/// Always accepted: a failed activity write is logged, never reported
pub async fn post_activity(
    State(state): State<AppState>,
    Json(activity_request): Json<ActivityRequest>,
) -> StatusCode {
    let activity = NewActivity::new(
        activity_request.actor_id,
        activity_request.activity_type,
        activity_request.details,
    )
    .with_visibility(activity_request.is_public);

    state.activities.record(activity).await;
    StatusCode::ACCEPTED
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinHistoryRequest {
    pub subject_id: String,
    pub change_amount: i64,
    pub reason: String,
    pub related_entity_type: String,
}

pub async fn post_coin_history(
    State(state): State<AppState>,
    Json(coin_history_request): Json<CoinHistoryRequest>,
) -> Result<(StatusCode, Json<Option<CoinHistoryRow>>), Error> {
    let created = state
        .transactions
        .record(
            &coin_history_request.subject_id,
            coin_history_request.change_amount,
            &coin_history_request.reason,
            &coin_history_request.related_entity_type,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn post_coins_award(
    State(state): State<AppState>,
    Json(adjustment): Json<CoinAdjustment>,
) -> Result<(StatusCode, Json<Option<CoinHistoryRow>>), Error> {
    let created = state.ledger.award(adjustment).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn post_coins_remove(
    State(state): State<AppState>,
    Json(adjustment): Json<CoinAdjustment>,
) -> Result<(StatusCode, Json<Option<CoinHistoryRow>>), Error> {
    let created = state.ledger.remove(adjustment).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Deserialize)]
pub struct FeedParams {
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub activity: UserActivityRow,
    pub description: String,
}

pub async fn get_class_feed(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<FeedEntry>>, Error> {
    let limit = checked_limit(params.limit)?;
    let rows = state.feed.public_for_class(&class_id, limit).await?;
    Ok(Json(feed_entries(&state, rows)))
}

pub async fn get_school_feed(
    State(state): State<AppState>,
    Path(school_id): Path<String>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<FeedEntry>>, Error> {
    let limit = checked_limit(params.limit)?;
    let rows = state.feed.public_for_school(&school_id, limit).await?;
    Ok(Json(feed_entries(&state, rows)))
}

fn checked_limit(limit: Option<usize>) -> Result<Option<usize>, Error> {
    match limit {
        Some(0) => Err(Error::Server(
            StatusCode::BAD_REQUEST,
            "limit must be at least 1".to_string(),
        )),
        limit => Ok(limit),
    }
}

fn feed_entries(state: &AppState, rows: Vec<UserActivityRow>) -> Vec<FeedEntry> {
    rows.into_iter()
        .map(|activity| FeedEntry {
            description: describe(&activity, &state.presentation.translator),
            activity,
        })
        .collect()
}
