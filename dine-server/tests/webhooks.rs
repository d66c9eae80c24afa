mod common;

use common::TestApp;
use dine_client::{BookUpdate, KitchenView};
use dine_server::Config;
use http::{Method, StatusCode};
use serde_json::json;
use shared::message::{RelayEventKind, RelayPayload};
use shared::order::{OrderStatus, Role};
use tokio::sync::broadcast::error::TryRecvError;

#[tokio::test]
async fn order_created_reaches_only_its_tenant() {
    let app = TestApp::new();
    let mut t1 = app.state.hub().subscribe("T1");
    let mut t2 = app.state.hub().subscribe("T2");

    let (status, body) = app
        .webhook(
            "order-created",
            json!({
                "orderId": "O1",
                "tenantId": "T1",
                "tableNumber": 5,
                "totalAmount": 100000,
                "itemCount": 2
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let event = t1.try_recv().unwrap();
    assert_eq!(event.event, RelayEventKind::OrderCreated);
    let wire = event.wire_payload();
    assert_eq!(wire["orderId"], "O1");
    assert_eq!(wire["status"], "Unsubmit");
    assert_eq!(wire["tenantId"], "T1");
    assert!(shared::util::parse_iso_millis(wire["timestamp"].as_str().unwrap()).is_some());
    assert!(matches!(t2.try_recv(), Err(TryRecvError::Empty)));

    // A kitchen display on T1 shows the order even though only the
    // notification exists
    let mut kitchen = KitchenView::new(app.gateway("T1", Role::Kitchen, None), "T1", 15);
    let update = kitchen.handle_event(&event).await.unwrap();
    assert_eq!(update, BookUpdate::Refetch("O1".into()));
    let tickets = kitchen.tickets(shared::util::now_millis());
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].table_number, 5);
    assert_eq!(tickets[0].status, OrderStatus::Unsubmit);

    // The same event on a T2 display changes nothing
    let mut other = KitchenView::new(app.gateway("T2", Role::Kitchen, None), "T2", 15);
    assert_eq!(other.handle_event(&event).await.unwrap(), BookUpdate::Ignored);
    assert!(other.tickets(0).is_empty());
}

#[tokio::test]
async fn created_status_is_forced_to_unsubmit() {
    let app = TestApp::new();
    let mut rx = app.state.hub().subscribe("T1");

    app.webhook(
        "order-created",
        json!({"orderId": "O1", "tenantId": "T1", "status": "Paid"}),
    )
    .await;
    let event = rx.try_recv().unwrap();
    let RelayPayload::Order(order) = event.payload else {
        panic!("expected order payload");
    };
    assert_eq!(order.status, Some(OrderStatus::Unsubmit));
}

#[tokio::test]
async fn missing_ids_are_rejected_without_emission() {
    let app = TestApp::new();
    let mut rx = app.state.hub().subscribe("T1");

    for path in ["order-created", "order-updated"] {
        let (status, body) = app
            .webhook(path, json!({"orderId": "O1", "tableNumber": 5}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["details"]["field"], "tenantId");

        let (status, body) = app
            .webhook(path, json!({"tenantId": "T1", "tableNumber": 5}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["details"]["field"], "orderId");

        let (status, _) = app
            .webhook(path, json!({"orderId": "O1", "tenantId": ""}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn updated_accepts_aliases_and_numeric_strings() {
    let app = TestApp::new();
    let mut rx = app.state.hub().subscribe("T1");

    let (status, _) = app
        .webhook(
            "order-updated",
            json!({
                "orderId": "O1",
                "tenantId": "T1",
                "tableId": "t5",
                "tableNumber": "5",
                "displayOrder": 12,
                "newTotalAmount": "120000",
                "newItemCount": 3,
                "status": "served"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.event, RelayEventKind::OrderUpdated);
    let RelayPayload::Order(order) = event.payload else {
        panic!("expected order payload");
    };
    assert_eq!(order.table_number, Some(5));
    assert_eq!(order.display_order, Some(12));
    assert_eq!(order.total_amount, Some(120000.0));
    assert_eq!(order.item_count, Some(3));
    assert_eq!(order.status, Some(OrderStatus::Served));
}

#[tokio::test]
async fn bad_bodies_are_rejected() {
    let app = TestApp::new();
    let mut rx = app.state.hub().subscribe("T1");

    let (status, body) = app
        .webhook(
            "order-updated",
            json!({"orderId": "O1", "tenantId": "T1", "status": "Eaten"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .webhook("order-updated", json!({"orderId": "O1", "tenantId": "T1", "tableNumber": "five"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.call(Method::POST, "/webhooks/order-created", &[], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn user_events_are_relayed() {
    let app = TestApp::new();
    let mut rx = app.state.hub().subscribe("T1");

    for (path, kind) in [
        ("user-created", RelayEventKind::UserCreated),
        ("user-updated", RelayEventKind::UserUpdated),
        ("user-deleted", RelayEventKind::UserDeleted),
    ] {
        let (status, _) = app
            .webhook(path, json!({"userId": 7, "tenantId": "T1", "name": "Lan", "role": "waiter"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        let event = rx.try_recv().unwrap();
        assert_eq!(event.event, kind);
        assert_eq!(event.wire_payload()["userId"], "7");
    }

    let (status, _) = app.webhook("user-deleted", json!({"tenantId": "T1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn generic_emit_validates_event_name() {
    let app = TestApp::new();
    let mut rx = app.state.hub().subscribe("T1");

    let (status, _) = app
        .webhook(
            "emit",
            json!({
                "tenantId": "T1",
                "event": "customer:call_staff",
                "payload": {"tableNumber": 3, "tableId": "t3", "requestType": "bill"}
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rx.try_recv().unwrap().event, RelayEventKind::CallStaff);

    for event in ["", "order:deleted"] {
        let (status, body) = app
            .webhook(
                "emit",
                json!({"tenantId": "T1", "event": event, "payload": {"orderId": "O1"}}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{event}");
        assert_eq!(body["success"], false);
    }
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn webhook_secret_is_enforced_when_configured() {
    let app = TestApp::with_config(Config {
        webhook_secret: Some("s3cret".into()),
        ..Config::default()
    });
    let body = json!({"orderId": "O1", "tenantId": "T1"});

    let (status, response) = app.webhook("order-created", body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["success"], false);

    let (status, _) = app
        .call(
            Method::POST,
            "/webhooks/order-created",
            &[("x-webhook-secret", "wrong")],
            Some(body.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(
            Method::POST,
            "/webhooks/order-created",
            &[("x-webhook-secret", "s3cret")],
            Some(body),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
