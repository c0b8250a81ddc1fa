//! Status Transition Engine
//!
//! Pure rules for the order/batch status lifecycle, no I/O. Rule violations
//! are reported as values ([`TransitionError`]); the order service decides
//! how they surface to callers.
//!
//! The progression is strict:
//! `PLACED -> IN_PREPARATION -> READY -> SERVED -> COMPLETED`.
//! Forward movement is one step at a time (staff walk through the real
//! kitchen workflow); backward movement of any distance is always allowed so
//! mistakes can be corrected instantly.

use chrono::{DateTime, Utc};

use crate::db::models::{Batch, Order, OrderStatus};

/// The five statuses in strict forward order
pub const STATUS_FLOW: [OrderStatus; 5] = [
    OrderStatus::Placed,
    OrderStatus::InPreparation,
    OrderStatus::Ready,
    OrderStatus::Served,
    OrderStatus::Completed,
];

/// Business-rule violations, returned as values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Transition rejected by the forward/backward rules
    Invalid {
        current: OrderStatus,
        attempted: OrderStatus,
    },
    /// Advance called at or past the terminal non-completion step
    AlreadyTerminal { current: OrderStatus },
    /// Lifecycle action on an order that is already completed
    AlreadyCompleted,
}

/// Next status in the forward order, None at COMPLETED
pub fn next_forward(current: OrderStatus) -> Option<OrderStatus> {
    match current {
        OrderStatus::Placed => Some(OrderStatus::InPreparation),
        OrderStatus::InPreparation => Some(OrderStatus::Ready),
        OrderStatus::Ready => Some(OrderStatus::Served),
        OrderStatus::Served => Some(OrderStatus::Completed),
        OrderStatus::Completed => None,
    }
}

/// Target of the one-click advance action
///
/// Stops at SERVED: completion is a separate archival action, never reached
/// by advancing.
pub fn advance_target(current: OrderStatus) -> Option<OrderStatus> {
    match current {
        OrderStatus::Served | OrderStatus::Completed => None,
        other => next_forward(other),
    }
}

/// Validate a status transition
///
/// - backward movement: always allowed, any distance
/// - forward movement: exactly one step
/// - same status: rejected
pub fn is_valid_transition(current: OrderStatus, target: OrderStatus) -> bool {
    if target < current {
        return true;
    }
    next_forward(current) == Some(target)
}

/// Derive the order-level status from its batch statuses
///
/// Precedence chain, first match wins. Only invoked from the batch-scoped
/// status edit path.
pub fn derive_order_status(batches: &[Batch]) -> OrderStatus {
    if !batches.is_empty() && batches.iter().all(|b| b.status == OrderStatus::Served) {
        OrderStatus::Served
    } else if batches.iter().any(|b| b.status >= OrderStatus::Ready) {
        OrderStatus::Ready
    } else if batches.iter().any(|b| b.status == OrderStatus::InPreparation) {
        OrderStatus::InPreparation
    } else {
        OrderStatus::Placed
    }
}

/// One-click advance: move the order forward one step and pull lagging
/// batches along
///
/// Batches already at or ahead of the new status are untouched, so a batch a
/// staff member fast-forwarded individually is never regressed. Reaching
/// SERVED forces every batch to SERVED and stamps `servedAt` once.
///
/// Returns `(previous, new)` statuses on success.
pub fn apply_advance(
    order: &mut Order,
    now: DateTime<Utc>,
) -> Result<(OrderStatus, OrderStatus), TransitionError> {
    let previous = order.status;
    let next = advance_target(previous).ok_or(TransitionError::AlreadyTerminal {
        current: previous,
    })?;

    order.status = next;
    for batch in &mut order.batches {
        if next_forward(batch.status) == Some(next) {
            batch.status = next;
        }
    }

    if next == OrderStatus::Served {
        for batch in &mut order.batches {
            batch.status = OrderStatus::Served;
        }
        stamp_served_at(order, now);
    }

    Ok((previous, next))
}

/// Serve: force the order and every batch to SERVED, stamp `servedAt` once
///
/// Does NOT complete the order; a served order stays in the live view until
/// staff archive it.
pub fn apply_serve(order: &mut Order, now: DateTime<Utc>) -> Result<(), TransitionError> {
    if order.is_completed {
        return Err(TransitionError::AlreadyCompleted);
    }

    order.status = OrderStatus::Served;
    for batch in &mut order.batches {
        batch.status = OrderStatus::Served;
    }
    stamp_served_at(order, now);
    Ok(())
}

/// Complete: archive the order from any status
///
/// Sets `isCompleted`, stamps `completedAt` once and forces every batch to
/// COMPLETED. The order-level status field is left as-is. A second
/// completion attempt is rejected so `completedAt` can never change.
pub fn apply_complete(order: &mut Order, now: DateTime<Utc>) -> Result<(), TransitionError> {
    if order.is_completed {
        return Err(TransitionError::AlreadyCompleted);
    }

    order.is_completed = true;
    if order.completed_at.is_none() {
        order.completed_at = Some(now);
    }
    for batch in &mut order.batches {
        batch.status = OrderStatus::Completed;
    }
    Ok(())
}

/// `servedAt` marks the first entry into SERVED and is never overwritten
pub fn stamp_served_at(order: &mut Order, now: DateTime<Utc>) {
    if order.served_at.is_none() {
        order.served_at = Some(now);
    }
}
