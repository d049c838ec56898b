// ABOUTME: Dashboard endpoints: aggregate stats and the hearing calendar
// ABOUTME: Both read the caller's full case set and reduce it in memory

use axum::{extract::State, response::Json};
use chrono::Utc;

use crate::AppState;
use crate::auth_helpers::CurrentUser;
use crate::error::Result;
use crate::types::{HearingsResponse, StatsResponse};

pub async fn stats(State(state): State<AppState>, user: CurrentUser) -> Result<Json<StatsResponse>> {
    let today = Utc::now().date_naive();
    Ok(Json(state.storage.dashboard_stats(user.id, today).await?))
}

pub async fn hearings(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<HearingsResponse>> {
    Ok(Json(state.storage.hearings(user.id, Utc::now()).await?))
}
