use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{dto::stats_dto::StatsResponse, error::Result, AppState};

#[axum::debug_handler]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.stats_service.dashboard_stats().await?;
    Ok(Json(StatsResponse { stats }))
}
