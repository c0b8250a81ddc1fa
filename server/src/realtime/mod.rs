//! Real-Time Fan-Out
//!
//! Socket.IO layer for live order updates. Three room families:
//! - `admin` - staff dashboard, sees every order
//! - `order:<id>` - one customer session watching its own order
//! - `table:<tableId>` - everyone seated at a table
//!
//! Emission is fire-and-forget: the order service persists first, then
//! spawns the emit. A lost event is recovered by the client's next fetch;
//! requests never wait on socket delivery.

use serde::Serialize;
use socketioxide::SocketIo;
use socketioxide::extract::{Data, SocketRef};
use tracing::{debug, warn};

use crate::db::models::Order;

/// Payload for every order event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

/// Handle for emitting order events to interested rooms
///
/// Holds an optional [`SocketIo`] so the order service can run without a
/// socket layer in tests ([`Notifier::disabled`]).
#[derive(Clone)]
pub struct Notifier {
    io: Option<SocketIo>,
}

impl Notifier {
    pub fn new(io: SocketIo) -> Self {
        Self { io: Some(io) }
    }

    /// A notifier that drops every event
    pub fn disabled() -> Self {
        Self { io: None }
    }

    /// New order placed: `order:new` to the admin room, `order:update` to
    /// the order's own room
    pub fn order_new(&self, order: &Order) {
        let event = OrderEvent {
            order: order.clone(),
            batch_id: None,
        };
        self.emit_to("admin", "order:new", event.clone());
        self.emit_to(&order_room(order), "order:update", event);
    }

    /// Order changed (batch append or status move): `order:update` to the
    /// admin, order and table rooms. `batch_id` is set when the change is a
    /// batch append so clients can highlight the new ticket.
    pub fn order_update(&self, order: &Order, batch_id: Option<&str>) {
        let event = OrderEvent {
            order: order.clone(),
            batch_id: batch_id.map(str::to_string),
        };
        self.emit_to("admin", "order:update", event.clone());
        self.emit_to(&order_room(order), "order:update", event.clone());
        self.emit_to(&table_room(order), "order:update", event);
    }

    /// Order archived: `order:completed` to the admin room so it leaves the
    /// live dashboard, final `order:update` to the order and table rooms
    pub fn order_completed(&self, order: &Order) {
        let event = OrderEvent {
            order: order.clone(),
            batch_id: None,
        };
        self.emit_to("admin", "order:completed", event.clone());
        self.emit_to(&order_room(order), "order:update", event.clone());
        self.emit_to(&table_room(order), "order:update", event);
    }

    fn emit_to(&self, room: &str, event: &'static str, payload: OrderEvent) {
        let Some(io) = self.io.clone() else {
            return;
        };
        let room = room.to_string();
        tokio::spawn(async move {
            if let Err(e) = io.to(room.clone()).emit(event, &payload).await {
                warn!(target: "realtime", room = %room, event, error = %e, "Emit failed");
            }
        });
    }
}

fn order_room(order: &Order) -> String {
    format!("order:{}", order.id_string())
}

fn table_room(order: &Order) -> String {
    format!("table:{}", order.table_id)
}

/// Register the join/leave handlers on the root namespace
///
/// Room membership is entirely client-driven: a socket may watch any room
/// it names.
pub async fn register_namespace(io: &SocketIo) {
    io.ns("/", |socket: SocketRef| async move {
        debug!(target: "realtime", socket_id = %socket.id, "Client connected");

        socket.on("join:order", |socket: SocketRef, Data::<String>(order_id)| async move {
            socket.join(format!("order:{order_id}"));
        });
        socket.on("leave:order", |socket: SocketRef, Data::<String>(order_id)| async move {
            socket.leave(format!("order:{order_id}"));
        });

        socket.on("join:table", |socket: SocketRef, Data::<String>(table_id)| async move {
            socket.join(format!("table:{table_id}"));
        });
        socket.on("leave:table", |socket: SocketRef, Data::<String>(table_id)| async move {
            socket.leave(format!("table:{table_id}"));
        });

        socket.on("join:admin", |socket: SocketRef| async move {
            socket.join("admin");
        });
        socket.on("leave:admin", |socket: SocketRef| async move {
            socket.leave("admin");
        });

        socket.on_disconnect(|socket: SocketRef| async move {
            debug!(target: "realtime", socket_id = %socket.id, "Client disconnected");
        });
    });
}
