use axum::{Json, extract::State};

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::orders::DailySummary;
use crate::utils::{AppResponse, AppResult, ok};

/// GET /api/summary - today's served orders rolled up for the printout
pub async fn daily_summary(
    _staff: CurrentStaff,
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<DailySummary>>> {
    Ok(ok(state.orders.daily_summary().await?))
}
