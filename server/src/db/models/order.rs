//! Order Model
//!
//! The order aggregate for one table's running tab. An order is composed of
//! append-only batches (one kitchen ticket per "add more items" action);
//! prices are snapshotted per line at submission time and never track later
//! catalog edits.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order / batch status, in strict forward order
///
/// The customer-facing labels are the serde representation; no second label
/// set exists internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    InPreparation,
    Ready,
    Served,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::InPreparation => "IN_PREPARATION",
            OrderStatus::Ready => "READY",
            OrderStatus::Served => "SERVED",
            OrderStatus::Completed => "COMPLETED",
        }
    }

    /// Parse a wire label; None for anything unrecognized
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "PLACED" => Some(OrderStatus::Placed),
            "IN_PREPARATION" => Some(OrderStatus::InPreparation),
            "READY" => Some(OrderStatus::Ready),
            "SERVED" => Some(OrderStatus::Served),
            "COMPLETED" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line item with a price locked at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Reference into the external menu catalog
    pub menu_item_id: String,
    /// Name snapshot taken at cart submission
    pub name: String,
    /// Price snapshot taken at cart submission
    pub price: f64,
    pub quantity: u32,
}

impl OrderLine {
    /// Line subtotal (price * quantity)
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// One kitchen ticket within an order, independently statused
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub batch_id: String,
    pub items: Vec<OrderLine>,
    pub status: OrderStatus,
    /// Fixed at batch-append time, never recomputed from the catalog
    pub total: f64,
}

/// Order aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub table_id: String,
    /// Append-only; insertion order is creation order; never empty
    pub batches: Vec<Batch>,
    pub status: OrderStatus,
    /// Always equals the sum of all batch totals
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_number: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, with = "serde_helpers::option_datetime_utc")]
    pub served_at: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_helpers::option_datetime_utc")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(with = "serde_helpers::datetime_utc")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_helpers::datetime_utc")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Recompute the aggregate total from batch totals
    ///
    /// Called after every batch append; read paths never recompute.
    pub fn recompute_total(&mut self) {
        self.total = self.batches.iter().map(|b| b.total).sum();
    }

    /// Stable string form of the record id ("order:xyz")
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Field-level constraints checked before any persistence
    pub fn validate(&self) -> Result<(), String> {
        if self.table_id.trim().is_empty() {
            return Err("Table id is required".to_string());
        }
        if self.batches.is_empty() {
            return Err("Order must contain at least one batch".to_string());
        }
        if self.total < 0.0 {
            return Err("Order total cannot be negative".to_string());
        }
        for batch in &self.batches {
            batch.validate()?;
        }
        Ok(())
    }
}

impl Batch {
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_id.trim().is_empty() {
            return Err("Batch id is required".to_string());
        }
        if self.items.is_empty() {
            return Err("Batch must contain at least one item".to_string());
        }
        if self.total < 0.0 {
            return Err("Batch total cannot be negative".to_string());
        }
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }
}

impl OrderLine {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Item name is required".to_string());
        }
        if self.menu_item_id.trim().is_empty() {
            return Err("Item menuItemId is required".to_string());
        }
        if self.price < 0.0 {
            return Err(format!("Item '{}' has a negative price", self.name));
        }
        if self.quantity < 1 {
            return Err(format!("Item '{}' must have quantity >= 1", self.name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        let now = Utc::now();
        Order {
            id: Some("order:abc123".parse().unwrap()),
            table_id: "4".to_string(),
            batches: vec![
                Batch {
                    batch_id: "batch-1700000000000-a1b2c3d4".to_string(),
                    items: vec![OrderLine {
                        menu_item_id: "tea-1".to_string(),
                        name: "Tea".to_string(),
                        price: 30.0,
                        quantity: 2,
                    }],
                    status: OrderStatus::Ready,
                    total: 60.0,
                },
                Batch {
                    batch_id: "batch-1700000012345-e5f6a7b8".to_string(),
                    items: vec![OrderLine {
                        menu_item_id: "sam-1".to_string(),
                        name: "Samosa".to_string(),
                        price: 20.0,
                        quantity: 3,
                    }],
                    status: OrderStatus::Placed,
                    total: 60.0,
                },
            ],
            status: OrderStatus::Ready,
            total: 120.0,
            bill_number: Some("B-0042".to_string()),
            is_completed: false,
            served_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_wire_labels() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InPreparation).unwrap(),
            "\"IN_PREPARATION\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"SERVED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Served);
        assert!(serde_json::from_str::<OrderStatus>("\"paid\"").is_err());
    }

    #[test]
    fn order_round_trips_through_json() {
        let order = sample_order();
        let json = serde_json::to_string(&order).unwrap();
        let parsed: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id_string(), order.id_string());
        assert_eq!(parsed.status, order.status);
        assert_eq!(parsed.total, order.total);
        assert_eq!(parsed.batches.len(), order.batches.len());
        for (a, b) in parsed.batches.iter().zip(order.batches.iter()) {
            assert_eq!(a.batch_id, b.batch_id);
            assert_eq!(a.status, b.status);
            assert_eq!(a.total, b.total);
            assert_eq!(a.items.len(), b.items.len());
        }
    }

    #[test]
    fn wire_fields_are_camel_case() {
        let json = serde_json::to_value(sample_order()).unwrap();
        assert!(json.get("tableId").is_some());
        assert!(json.get("isCompleted").is_some());
        assert!(json.get("billNumber").is_some());
        assert!(json["batches"][0].get("batchId").is_some());
        assert!(json["batches"][0]["items"][0].get("menuItemId").is_some());
    }

    #[test]
    fn validate_rejects_bad_aggregates() {
        let mut order = sample_order();
        order.batches.clear();
        assert!(order.validate().is_err());

        let mut order = sample_order();
        order.batches[0].items[0].price = -1.0;
        assert!(order.validate().is_err());

        let mut order = sample_order();
        order.batches[0].items[0].quantity = 0;
        assert!(order.validate().is_err());

        assert!(sample_order().validate().is_ok());
    }

    #[test]
    fn recompute_total_sums_batches() {
        let mut order = sample_order();
        order.total = 0.0;
        order.recompute_total();
        assert_eq!(order.total, 120.0);
    }
}
