//! End-to-end order lifecycle tests against an in-memory database.

use comanda_server::db::repository::OrderRepository;
use comanda_server::orders::{AddBatch, OrderService, PlaceOrder};
use comanda_server::realtime::Notifier;
use comanda_server::utils::AppError;
use comanda_server::{OrderLine, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn service() -> OrderService {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("comanda").use_db("test").await.unwrap();
    OrderService::new(OrderRepository::new(db), Notifier::disabled())
}

fn line(menu_item_id: &str, name: &str, price: f64, quantity: u32) -> OrderLine {
    OrderLine {
        menu_item_id: menu_item_id.to_string(),
        name: name.to_string(),
        price,
        quantity,
    }
}

fn tea_order(table_id: &str) -> PlaceOrder {
    PlaceOrder {
        table_id: table_id.to_string(),
        items: vec![line("tea-1", "Tea", 30.0, 2)],
        total: Some(60.0),
        bill_number: None,
    }
}

#[tokio::test]
async fn placing_an_order_creates_one_placed_batch() {
    let service = service().await;

    let order = service.place_order(tea_order("4")).await.unwrap();

    assert!(order.id.is_some());
    assert_eq!(order.table_id, "4");
    assert_eq!(order.batches.len(), 1);
    assert_eq!(order.batches[0].status, OrderStatus::Placed);
    assert_eq!(order.status, OrderStatus::Placed);
    assert_eq!(order.total, 60.0);
    assert!(!order.is_completed);
    assert!(order.served_at.is_none());
    assert!(order.batches[0].batch_id.starts_with("batch-"));
}

#[tokio::test]
async fn second_order_for_same_table_conflicts() {
    let service = service().await;
    service.place_order(tea_order("4")).await.unwrap();

    let err = service.place_order(tea_order("4")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // another table is unaffected
    assert!(service.place_order(tea_order("5")).await.is_ok());
}

#[tokio::test]
async fn adding_a_batch_recomputes_the_total() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();

    let updated = service
        .add_batch(
            &order.id_string(),
            AddBatch {
                items: vec![line("sam-1", "Samosa", 20.0, 3)],
                batch_total: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.batches.len(), 2);
    assert_eq!(updated.total, 120.0);
    assert_eq!(updated.batches[1].status, OrderStatus::Placed);
    assert_ne!(updated.batches[0].batch_id, updated.batches[1].batch_id);
    // the order stays where it was, the new ticket starts at PLACED
    assert_eq!(updated.status, OrderStatus::Placed);
}

#[tokio::test]
async fn forward_skip_is_rejected_with_the_next_step_named() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();
    let id = order.id_string();

    let err = service.set_status(&id, "READY", None).await.unwrap_err();
    let AppError::Validation(msg) = err else {
        panic!("expected validation error");
    };
    assert!(msg.contains("PLACED"));
    assert!(msg.contains("READY"));
    assert!(msg.contains("IN_PREPARATION"));

    // one step forward is fine
    let updated = service.set_status(&id, "IN_PREPARATION", None).await.unwrap();
    assert_eq!(updated.status, OrderStatus::InPreparation);

    // backward jumps of any distance are fine
    let updated = service.set_status(&id, "PLACED", None).await.unwrap();
    assert_eq!(updated.status, OrderStatus::Placed);
}

#[tokio::test]
async fn unknown_status_label_is_rejected() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();

    let err = service
        .set_status(&order.id_string(), "paid", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn batch_status_edit_rederives_the_order_status() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();
    let id = order.id_string();
    let order = service
        .add_batch(
            &id,
            AddBatch {
                items: vec![line("sam-1", "Samosa", 20.0, 3)],
                batch_total: Some(60.0),
            },
        )
        .await
        .unwrap();

    let first = order.batches[0].batch_id.clone();
    let second = order.batches[1].batch_id.clone();

    // first batch moves ahead alone: any batch at or past READY -> READY
    service
        .set_status(&id, "IN_PREPARATION", Some(&first))
        .await
        .unwrap();
    let order = service.set_status(&id, "READY", Some(&first)).await.unwrap();
    assert_eq!(order.batches[0].status, OrderStatus::Ready);
    assert_eq!(order.batches[1].status, OrderStatus::Placed);
    assert_eq!(order.status, OrderStatus::Ready);

    // walk both batches to SERVED: order becomes SERVED, servedAt stamps
    service.set_status(&id, "SERVED", Some(&first)).await.unwrap();
    service
        .set_status(&id, "IN_PREPARATION", Some(&second))
        .await
        .unwrap();
    service.set_status(&id, "READY", Some(&second)).await.unwrap();
    let order = service.set_status(&id, "SERVED", Some(&second)).await.unwrap();
    assert_eq!(order.status, OrderStatus::Served);
    assert!(order.served_at.is_some());
    assert!(!order.is_completed);
}

#[tokio::test]
async fn batch_cannot_be_moved_to_completed_directly() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();
    let id = order.id_string();
    let batch = order.batches[0].batch_id.clone();

    // walk the single batch to SERVED; the order derives SERVED
    for target in ["IN_PREPARATION", "READY", "SERVED"] {
        service.set_status(&id, target, Some(&batch)).await.unwrap();
    }
    let order = service.get_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Served);

    // a served order must never fall back to READY through a batch edit
    let err = service
        .set_status(&id, "COMPLETED", Some(&batch))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let order = service.get_order(&id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Served);
    assert_eq!(order.batches[0].status, OrderStatus::Served);
    assert!(!order.is_completed);
}

#[tokio::test]
async fn unknown_batch_id_is_not_found() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();

    let err = service
        .set_status(&order.id_string(), "IN_PREPARATION", Some("batch-0-missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn advance_walks_the_full_flow_and_stops_at_served() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();
    let id = order.id_string();

    let step = service.advance(&id).await.unwrap();
    assert_eq!(step.previous_status, OrderStatus::Placed);
    assert_eq!(step.new_status, OrderStatus::InPreparation);
    assert_eq!(step.order.batches[0].status, OrderStatus::InPreparation);

    let step = service.advance(&id).await.unwrap();
    assert_eq!(step.new_status, OrderStatus::Ready);

    let step = service.advance(&id).await.unwrap();
    assert_eq!(step.new_status, OrderStatus::Served);
    assert!(step.order.served_at.is_some());
    assert!(
        step.order
            .batches
            .iter()
            .all(|b| b.status == OrderStatus::Served)
    );

    // already at the terminal non-completed step
    let err = service.advance(&id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn served_at_survives_a_serve_after_advance() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();
    let id = order.id_string();

    service.advance(&id).await.unwrap();
    service.advance(&id).await.unwrap();
    let stamped = service.advance(&id).await.unwrap().order.served_at.unwrap();

    let served = service.serve(&id).await.unwrap();
    assert_eq!(served.served_at, Some(stamped));
}

#[tokio::test]
async fn serve_then_complete_archives_the_order() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();
    let id = order.id_string();

    let served = service.serve(&id).await.unwrap();
    assert_eq!(served.status, OrderStatus::Served);
    assert!(served.served_at.is_some());
    assert!(!served.is_completed);

    let completed = service.complete(&id).await.unwrap();
    assert!(completed.is_completed);
    assert!(completed.completed_at.is_some());
    assert!(
        completed
            .batches
            .iter()
            .all(|b| b.status == OrderStatus::Completed)
    );

    // gone from every live view
    let live = service.live_orders().await.unwrap();
    assert!(live.orders.is_empty());
    assert!(
        service
            .active_order_for_table("4")
            .await
            .unwrap()
            .is_none()
    );

    // the table is free again
    assert!(service.place_order(tea_order("4")).await.is_ok());
}

#[tokio::test]
async fn completing_twice_is_rejected() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();
    let id = order.id_string();

    service.complete(&id).await.unwrap();
    let err = service.complete(&id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn adding_to_a_completed_order_is_rejected() {
    let service = service().await;
    let order = service.place_order(tea_order("4")).await.unwrap();
    let id = order.id_string();
    service.complete(&id).await.unwrap();

    let err = service
        .add_batch(
            &id,
            AddBatch {
                items: vec![line("sam-1", "Samosa", 20.0, 1)],
                batch_total: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn validation_failures_never_persist_anything() {
    let service = service().await;

    let empty = PlaceOrder {
        table_id: "4".to_string(),
        items: vec![],
        total: Some(0.0),
        bill_number: None,
    };
    assert!(matches!(
        service.place_order(empty).await.unwrap_err(),
        AppError::Validation(_)
    ));

    let negative = PlaceOrder {
        table_id: "4".to_string(),
        items: vec![line("tea-1", "Tea", -1.0, 1)],
        total: Some(60.0),
        bill_number: None,
    };
    assert!(matches!(
        service.place_order(negative).await.unwrap_err(),
        AppError::Validation(_)
    ));

    assert!(
        service
            .active_order_for_table("4")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let service = service().await;
    let err = service.get_order("order:nope").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn live_view_summarizes_revenue_and_active_counts() {
    let service = service().await;

    // table 1: still in the kitchen
    service.place_order(tea_order("1")).await.unwrap();
    // table 2: served (counts toward revenue, not active)
    let served = service.place_order(tea_order("2")).await.unwrap();
    service.serve(&served.id_string()).await.unwrap();
    // table 3: completed (out of the live view entirely)
    let done = service.place_order(tea_order("3")).await.unwrap();
    service.complete(&done.id_string()).await.unwrap();

    let live = service.live_orders().await.unwrap();
    assert_eq!(live.summary.total, 2);
    assert_eq!(live.summary.active, 1);
    assert_eq!(live.summary.total_revenue, 60.0);
    assert!(live.orders.iter().all(|o| !o.is_completed));
}

#[tokio::test]
async fn completed_listing_filters_by_day() {
    let service = service().await;

    let order = service.place_order(tea_order("4")).await.unwrap();
    service.complete(&order.id_string()).await.unwrap();

    let all = service.completed_orders(None).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].is_completed);

    let today = chrono::Local::now().date_naive();
    let todays = service.completed_orders(Some(today)).await.unwrap();
    assert_eq!(todays.len(), 1);

    let long_ago = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let none = service.completed_orders(Some(long_ago)).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn daily_summary_covers_served_orders_by_table() {
    let service = service().await;

    let a = service.place_order(tea_order("1")).await.unwrap();
    service.serve(&a.id_string()).await.unwrap();
    let b = service.place_order(tea_order("2")).await.unwrap();
    service.serve(&b.id_string()).await.unwrap();
    // a third order still in the kitchen stays out of the report
    service.place_order(tea_order("3")).await.unwrap();

    let summary = service.daily_summary().await.unwrap();
    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.total_revenue, 120.0);
    assert_eq!(summary.orders_by_table.len(), 2);
    assert_eq!(summary.orders_by_table["1"].count, 1);
    assert_eq!(summary.orders_by_table["1"].revenue, 60.0);
    assert_eq!(summary.orders.len(), 2);
    assert!(
        summary
            .orders
            .iter()
            .all(|o| o.final_status == OrderStatus::Served)
    );
}
