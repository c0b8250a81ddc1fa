use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::orders::{AddBatch, AdvanceOutcome, LiveOrders, PlaceOrder};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message, time};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveQuery {
    pub table_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusBody {
    pub status: String,
    pub batch_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// POST /api/orders
pub async fn place_order(
    State(state): State<ServerState>,
    Json(body): Json<PlaceOrder>,
) -> AppResult<(StatusCode, Json<AppResponse<Order>>)> {
    let order = state.orders.place_order(body).await?;
    Ok((
        StatusCode::CREATED,
        ok_with_message(order, "Order created successfully"),
    ))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.orders.get_order(&id).await?))
}

/// GET /api/orders/table/{table_id}
pub async fn orders_for_table(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    Ok(ok(state.orders.orders_for_table(&table_id).await?))
}

/// GET /api/orders/active?tableId=
///
/// `data` is the order or null; "no active order" is a success, not a 404.
pub async fn active_order(
    State(state): State<ServerState>,
    Query(query): Query<ActiveQuery>,
) -> AppResult<Json<AppResponse<Option<Order>>>> {
    let table_id = query
        .table_id
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::validation("tableId query parameter is required"))?;
    Ok(ok(state.orders.active_order_for_table(&table_id).await?))
}

/// PATCH /api/orders/{id}/add-batch
pub async fn add_batch(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<AddBatch>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.add_batch(&id, body).await?;
    Ok(ok_with_message(order, "Batch added to order successfully"))
}

/// PATCH|PUT /api/orders/{id}/status
pub async fn set_status(
    _staff: CurrentStaff,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<SetStatusBody>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .orders
        .set_status(&id, &body.status, body.batch_id.as_deref())
        .await?;
    Ok(ok(order))
}

/// POST /api/orders/{id}/advance-status
pub async fn advance_status(
    _staff: CurrentStaff,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<AdvanceOutcome>>> {
    Ok(ok(state.orders.advance(&id).await?))
}

/// PATCH /api/orders/{id}/serve
pub async fn serve_order(
    _staff: CurrentStaff,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.orders.serve(&id).await?))
}

/// POST /api/orders/complete/{id}
pub async fn complete_order(
    _staff: CurrentStaff,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.complete(&id).await?;
    Ok(ok_with_message(order, "Order completed successfully"))
}

/// GET /api/orders (live dashboard)
pub async fn live_orders(
    _staff: CurrentStaff,
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<LiveOrders>>> {
    Ok(ok(state.orders.live_orders().await?))
}

/// GET /api/orders/completed
pub async fn completed_orders(
    _staff: CurrentStaff,
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    Ok(ok(state.orders.completed_orders(None).await?))
}

/// GET /api/orders/completed/by-date?date=YYYY-MM-DD
pub async fn completed_orders_by_date(
    _staff: CurrentStaff,
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let date = query
        .date
        .ok_or_else(|| AppError::validation("Date parameter is required (format: YYYY-MM-DD)"))?;
    let date = time::parse_date(&date)?;
    Ok(ok(state.orders.completed_orders(Some(date)).await?))
}
