//! Order Service
//!
//! The only orchestrator of repository, transition engine and notifier.
//! Every mutation is read-modify-write against the store; the save is the
//! last step before fan-out, so a client can never observe an event for
//! state that was not persisted.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::serde_helpers::datetime_utc;
use crate::db::models::{Batch, Order, OrderLine, OrderStatus};
use crate::db::repository::{OrderRepository, RepoError};
use crate::orders::status::{self, TransitionError};
use crate::realtime::Notifier;
use crate::utils::{AppError, AppResult, time};

/// Body of `POST /api/orders`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub table_id: String,
    pub items: Vec<OrderLine>,
    /// Client-computed total for the first batch; must be >= 0
    pub total: Option<f64>,
    pub bill_number: Option<String>,
}

/// Body of `PATCH /api/orders/{id}/add-batch`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBatch {
    pub items: Vec<OrderLine>,
    /// Optional client-computed batch total; falls back to the line sum
    pub batch_total: Option<f64>,
}

/// Result of the one-click advance action
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceOutcome {
    pub order: Order,
    pub previous_status: OrderStatus,
    pub new_status: OrderStatus,
}

/// Live dashboard payload: the orders plus the header numbers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveOrders {
    pub orders: Vec<Order>,
    pub summary: LiveSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSummary {
    pub total: usize,
    /// Orders still in the kitchen (before the READY step)
    pub active: usize,
    /// Revenue of orders already at the served step
    pub total_revenue: f64,
}

/// End-of-day report over today's served orders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub total_orders: usize,
    pub total_revenue: f64,
    pub orders_by_table: BTreeMap<String, TableBucket>,
    /// Flat oldest-first list used for printing
    pub orders: Vec<SummaryLine>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBucket {
    pub count: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub bill_number: String,
    pub table_number: String,
    pub total_amount: f64,
    pub final_status: OrderStatus,
    pub created_at: String,
}

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    notifier: Notifier,
}

impl OrderService {
    pub fn new(repo: OrderRepository, notifier: Notifier) -> Self {
        Self { repo, notifier }
    }

    /// Open a new tab for a table; first batch carries all submitted items
    ///
    /// One active order per table: a second place attempt is a conflict and
    /// the caller is pointed at add-batch instead.
    pub async fn place_order(&self, input: PlaceOrder) -> AppResult<Order> {
        if input.table_id.trim().is_empty() {
            return Err(AppError::validation("Table id is required"));
        }
        validate_items(&input.items)?;
        let total = match input.total {
            Some(t) if t >= 0.0 => t,
            Some(_) => return Err(AppError::validation("Total cannot be negative")),
            None => line_sum(&input.items),
        };

        if self
            .repo
            .find_active_by_table(&input.table_id)
            .await
            .map_err(map_repo)?
            .is_some()
        {
            return Err(AppError::conflict(
                "An active order already exists for this table. \
                 Please add items to the existing order instead.",
            ));
        }

        let now = Utc::now();
        let order = Order {
            id: None,
            table_id: input.table_id,
            batches: vec![Batch {
                batch_id: new_batch_id(),
                items: input.items,
                status: OrderStatus::Placed,
                total,
            }],
            status: OrderStatus::Placed,
            total,
            bill_number: input.bill_number.filter(|b| !b.trim().is_empty()),
            is_completed: false,
            served_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(&order).await.map_err(map_repo)?;
        self.notifier.order_new(&created);
        Ok(created)
    }

    /// Append a kitchen ticket to an existing tab
    ///
    /// Batches are independent tickets; repeated menu items are never merged
    /// across batches. The order-level status is left alone, the new PLACED
    /// batch shows up on the kitchen view on its own.
    pub async fn add_batch(&self, order_id: &str, input: AddBatch) -> AppResult<Order> {
        validate_items(&input.items)?;

        let mut order = self.require_order(order_id).await?;
        if order.is_completed {
            return Err(AppError::conflict(
                "Cannot add items to a completed order. Please create a new order.",
            ));
        }

        let batch_id = new_batch_id();
        let total = match input.batch_total {
            Some(t) if t >= 0.0 => t,
            Some(_) => return Err(AppError::validation("Batch total cannot be negative")),
            None => line_sum(&input.items),
        };
        order.batches.push(Batch {
            batch_id: batch_id.clone(),
            items: input.items,
            status: OrderStatus::Placed,
            total,
        });
        order.recompute_total();
        order.updated_at = Utc::now();

        let saved = self.repo.save(&order).await.map_err(map_repo)?;
        self.notifier.order_update(&saved, Some(&batch_id));
        Ok(saved)
    }

    /// Move the order (or one batch) to an explicit status
    ///
    /// Batch-scoped edits re-derive the order-level status through the
    /// precedence chain; reaching SERVED that way stamps `servedAt`.
    /// COMPLETED is never a valid batch target — batches only reach it
    /// through the order-level complete action, so the derivation chain
    /// never sees a lone COMPLETED batch.
    pub async fn set_status(
        &self,
        order_id: &str,
        target: &str,
        batch_id: Option<&str>,
    ) -> AppResult<Order> {
        let target = OrderStatus::parse(target)
            .ok_or_else(|| AppError::validation(format!("Invalid status value: {target}")))?;

        let mut order = self.require_order(order_id).await?;
        let now = Utc::now();

        match batch_id {
            Some(batch_id) => {
                if target == OrderStatus::Completed {
                    return Err(AppError::validation(
                        "COMPLETED is not a valid batch status target; complete the order instead",
                    ));
                }
                let batch = order
                    .batches
                    .iter_mut()
                    .find(|b| b.batch_id == batch_id)
                    .ok_or_else(|| AppError::not_found(format!("Batch {batch_id}")))?;
                let current = batch.status;
                if !status::is_valid_transition(current, target) {
                    return Err(invalid_transition(current, target));
                }
                batch.status = target;
                order.status = status::derive_order_status(&order.batches);
                if order.status == OrderStatus::Served {
                    status::stamp_served_at(&mut order, now);
                }
            }
            None => {
                let current = order.status;
                if !status::is_valid_transition(current, target) {
                    return Err(invalid_transition(current, target));
                }
                order.status = target;
                if target == OrderStatus::Served {
                    status::stamp_served_at(&mut order, now);
                }
            }
        }

        order.updated_at = now;
        let saved = self.repo.save(&order).await.map_err(map_repo)?;
        // batch-scoped edits name the edited ticket in the event payload
        self.notifier.order_update(&saved, batch_id);
        Ok(saved)
    }

    /// One-click advance to the next step
    pub async fn advance(&self, order_id: &str) -> AppResult<AdvanceOutcome> {
        let mut order = self.require_order(order_id).await?;

        let now = Utc::now();
        let (previous, next) = status::apply_advance(&mut order, now).map_err(map_transition)?;
        order.updated_at = now;

        let saved = self.repo.save(&order).await.map_err(map_repo)?;
        if next == OrderStatus::Served {
            // reaching the served step is the dashboard's "done" moment
            self.notifier.order_completed(&saved);
        } else {
            self.notifier.order_update(&saved, None);
        }
        Ok(AdvanceOutcome {
            order: saved,
            previous_status: previous,
            new_status: next,
        })
    }

    /// Force the order straight to SERVED (payment taken at the table)
    pub async fn serve(&self, order_id: &str) -> AppResult<Order> {
        let mut order = self.require_order(order_id).await?;

        let now = Utc::now();
        status::apply_serve(&mut order, now).map_err(map_transition)?;
        order.updated_at = now;

        let saved = self.repo.save(&order).await.map_err(map_repo)?;
        self.notifier.order_update(&saved, None);
        Ok(saved)
    }

    /// Archive the order, removing it from every live view
    pub async fn complete(&self, order_id: &str) -> AppResult<Order> {
        let mut order = self.require_order(order_id).await?;

        let now = Utc::now();
        status::apply_complete(&mut order, now).map_err(map_transition)?;
        order.updated_at = now;

        let saved = self.repo.save(&order).await.map_err(map_repo)?;
        self.notifier.order_completed(&saved);
        Ok(saved)
    }

    // ===== Read paths (no mutation, no notification) =====

    pub async fn get_order(&self, order_id: &str) -> AppResult<Order> {
        self.require_order(order_id).await
    }

    pub async fn orders_for_table(&self, table_id: &str) -> AppResult<Vec<Order>> {
        self.repo.find_by_table(table_id).await.map_err(map_repo)
    }

    /// Latest non-completed order for a table; None is a normal answer
    pub async fn active_order_for_table(&self, table_id: &str) -> AppResult<Option<Order>> {
        self.repo
            .find_active_by_table(table_id)
            .await
            .map_err(map_repo)
    }

    /// Live dashboard: all non-completed orders plus the header numbers
    pub async fn live_orders(&self) -> AppResult<LiveOrders> {
        let orders = self.repo.find_live().await.map_err(map_repo)?;

        let total_revenue = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Served)
            .map(|o| o.total)
            .sum();
        let active = orders
            .iter()
            .filter(|o| o.status < OrderStatus::Ready)
            .count();

        Ok(LiveOrders {
            summary: LiveSummary {
                total: orders.len(),
                active,
                total_revenue,
            },
            orders,
        })
    }

    /// Completed orders, optionally narrowed to one local calendar day
    pub async fn completed_orders(
        &self,
        date: Option<chrono::NaiveDate>,
    ) -> AppResult<Vec<Order>> {
        let window = date.map(time::local_day_window);
        self.repo.find_completed(window).await.map_err(map_repo)
    }

    /// Today's served orders rolled up for the end-of-day report
    pub async fn daily_summary(&self) -> AppResult<DailySummary> {
        let today = time::local_today();
        let (start, end) = time::local_day_window(today);
        let orders = self
            .repo
            .find_served_in_window(start, end)
            .await
            .map_err(map_repo)?;

        let total_revenue = orders.iter().map(|o| o.total).sum();
        let mut orders_by_table: BTreeMap<String, TableBucket> = BTreeMap::new();
        for order in &orders {
            let bucket = orders_by_table.entry(order.table_id.clone()).or_default();
            bucket.count += 1;
            bucket.revenue += order.total;
        }

        let lines = orders
            .iter()
            .map(|o| SummaryLine {
                bill_number: o.bill_number.clone().unwrap_or_default(),
                table_number: o.table_id.clone(),
                total_amount: o.total,
                final_status: o.status,
                created_at: datetime_utc::to_wire(&o.created_at),
            })
            .collect();

        Ok(DailySummary {
            date: today.format("%Y-%m-%d").to_string(),
            total_orders: orders.len(),
            total_revenue,
            orders_by_table,
            orders: lines,
        })
    }

    async fn require_order(&self, order_id: &str) -> AppResult<Order> {
        self.repo
            .find_by_id(order_id)
            .await
            .map_err(map_repo)?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))
    }
}

/// `batch-<millis>-<random>`, unique within an order and sortable by time
fn new_batch_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    format!("batch-{millis}-{}", &random[..8])
}

fn line_sum(items: &[OrderLine]) -> f64 {
    items.iter().map(OrderLine::subtotal).sum()
}

/// Per-line input checks; stricter than storage validation (price must be
/// strictly positive on the way in)
fn validate_items(items: &[OrderLine]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    for item in items {
        if item.name.trim().is_empty() || item.menu_item_id.trim().is_empty() {
            return Err(AppError::validation(
                "Each item must have name, price, quantity, and menuItemId",
            ));
        }
        if item.price <= 0.0 {
            return Err(AppError::validation(format!(
                "Item '{}' must have a positive price",
                item.name
            )));
        }
        if item.quantity < 1 {
            return Err(AppError::validation(format!(
                "Item '{}' must have quantity >= 1",
                item.name
            )));
        }
    }
    Ok(())
}

/// Invalid-transition message naming current, attempted and (forward case)
/// the single valid next step
fn invalid_transition(current: OrderStatus, attempted: OrderStatus) -> AppError {
    let message = match status::next_forward(current) {
        Some(next) => format!(
            "Cannot change status from {current} to {attempted}. The next valid step is {next}."
        ),
        None => format!("Cannot change status from {current} to {attempted}."),
    };
    AppError::validation(message)
}

fn map_transition(err: TransitionError) -> AppError {
    match err {
        TransitionError::Invalid { current, attempted } => invalid_transition(current, attempted),
        TransitionError::AlreadyTerminal { current } => AppError::conflict(format!(
            "Order is already at {current}; complete it to archive"
        )),
        TransitionError::AlreadyCompleted => {
            AppError::conflict("Order is already completed")
        }
    }
}

fn map_repo(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::NotFound(msg),
        RepoError::Validation(msg) => AppError::Validation(msg),
        RepoError::Database(msg) => AppError::Database(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_ids_are_unique_and_well_formed() {
        let a = new_batch_id();
        let b = new_batch_id();
        assert_ne!(a, b);
        assert!(a.starts_with("batch-"));
        assert_eq!(a.split('-').count(), 3);
    }

    #[test]
    fn item_validation_catches_bad_lines() {
        let good = OrderLine {
            menu_item_id: "tea-1".to_string(),
            name: "Tea".to_string(),
            price: 30.0,
            quantity: 2,
        };

        assert!(validate_items(&[]).is_err());
        assert!(validate_items(std::slice::from_ref(&good)).is_ok());

        let mut free = good.clone();
        free.price = 0.0;
        assert!(validate_items(&[free]).is_err());

        let mut nameless = good.clone();
        nameless.name = "  ".to_string();
        assert!(validate_items(&[nameless]).is_err());

        let mut none = good;
        none.quantity = 0;
        assert!(validate_items(&[none]).is_err());
    }

    #[test]
    fn transition_message_names_next_step() {
        let err = invalid_transition(OrderStatus::Placed, OrderStatus::Served);
        let AppError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("PLACED"));
        assert!(msg.contains("SERVED"));
        assert!(msg.contains("IN_PREPARATION"));
    }
}
