use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::db::models::serde_helpers::datetime_utc;
use crate::utils::{AppResponse, ok};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// GET /api/health
pub async fn health() -> Json<AppResponse<HealthInfo>> {
    ok(HealthInfo {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: datetime_utc::to_wire(&Utc::now()),
    })
}
