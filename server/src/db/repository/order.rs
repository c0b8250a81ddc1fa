//! Order Repository
//!
//! Whole-aggregate storage for orders. Every mutation path is
//! read-modify-write: callers fetch the full aggregate, mutate it in memory
//! and write it back with [`OrderRepository::save`]; `save` is always the
//! last step before any realtime fan-out.

use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Order;
use crate::db::models::serde_helpers::datetime_utc;

const TABLE: &str = "order";

/// Ceiling for per-table customer queries
const TABLE_QUERY_LIMIT: i64 = 100;
/// Ceiling for admin list queries
const LIST_QUERY_LIMIT: i64 = 1000;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a fully-formed order (including its first batch)
    pub async fn create(&self, order: &Order) -> RepoResult<Order> {
        order.validate().map_err(RepoError::Validation)?;

        let created: Option<Order> = self
            .base
            .db()
            .create(TABLE)
            .content(content_without_id(order)?)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Fetch an order by id; accepts "order:abc" or the bare key
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = parse_order_id(id)?;
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// Write back the full in-memory state of a previously-fetched order
    pub async fn save(&self, order: &Order) -> RepoResult<Order> {
        order.validate().map_err(RepoError::Validation)?;
        let rid = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Cannot save an order without an id".to_string()))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $id CONTENT $data RETURN AFTER")
            .bind(("id", rid))
            .bind(("data", content_without_id(order)?))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order.id_string())))
    }

    /// Latest non-completed order for a table, if any
    pub async fn find_active_by_table(&self, table_id: &str) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE tableId = $table AND isCompleted = false \
                 ORDER BY createdAt DESC LIMIT 1",
            )
            .bind(("table", table_id.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Non-completed orders for a table, newest first, capped
    pub async fn find_by_table(&self, table_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE tableId = $table AND isCompleted = false \
                 ORDER BY createdAt DESC LIMIT $limit",
            )
            .bind(("table", table_id.to_string()))
            .bind(("limit", TABLE_QUERY_LIMIT))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All non-completed orders (admin live view), newest first, capped
    pub async fn find_live(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE isCompleted = false \
                 ORDER BY createdAt DESC LIMIT $limit",
            )
            .bind(("limit", LIST_QUERY_LIMIT))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Completed orders, most recently completed first, capped
    ///
    /// `window` filters on completion time, half-open `[start, end)`.
    pub async fn find_completed(
        &self,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> RepoResult<Vec<Order>> {
        let mut query = String::from("SELECT * FROM order WHERE isCompleted = true");
        if window.is_some() {
            query.push_str(" AND completedAt >= $start AND completedAt < $end");
        }
        query.push_str(" ORDER BY completedAt DESC LIMIT $limit");

        let mut request = self.base.db().query(query).bind(("limit", LIST_QUERY_LIMIT));
        if let Some((start, end)) = window {
            request = request
                .bind(("start", datetime_utc::to_wire(&start)))
                .bind(("end", datetime_utc::to_wire(&end)));
        }

        let orders: Vec<Order> = request.await?.take(0)?;
        Ok(orders)
    }

    /// Orders created in `[start, end)` that sit at the served step,
    /// oldest first (daily summary source)
    pub async fn find_served_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE createdAt >= $start AND createdAt < $end \
                 AND status = 'SERVED' ORDER BY createdAt ASC",
            )
            .bind(("start", datetime_utc::to_wire(&start)))
            .bind(("end", datetime_utc::to_wire(&end)))
            .await?
            .take(0)?;
        Ok(orders)
    }
}

/// Parse an order id, accepting both "order:abc" and the bare key
fn parse_order_id(id: &str) -> RepoResult<RecordId> {
    if id.contains(':') {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid order id: {}", id)))
    } else {
        Ok(RecordId::from_table_key(TABLE, id))
    }
}

/// Serialize an order for CREATE/UPDATE CONTENT, dropping the id field
/// (the record id is addressed separately, never stored as a document field)
fn content_without_id(order: &Order) -> RepoResult<serde_json::Value> {
    let mut value = serde_json::to_value(order)
        .map_err(|e| RepoError::Database(format!("Failed to serialize order: {e}")))?;
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
    }
    Ok(value)
}
