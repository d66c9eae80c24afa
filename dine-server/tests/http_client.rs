//! `GatewayClient` against a listening server

use dine_client::{ClientConfig, ClientError, Gateway, GatewayClient};
use dine_server::{Config, ServerState, build_app};
use shared::message::CallStaffNotification;
use shared::order::{CreateOrderItem, CreateOrderRequest, OrderFilter, OrderStatus, Role};
use tokio::net::TcpListener;

/// Serve a fresh app on an ephemeral port and return its base URL
async fn spawn_server() -> (String, ServerState) {
    let state = ServerState::new(Config::default());
    let app = build_app(&state).with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn client(base_url: &str, role: Role, actor_id: Option<&str>) -> GatewayClient {
    let mut config = ClientConfig::new(base_url, "T1")
        .with_role(role)
        .with_timeout(5);
    if let Some(actor_id) = actor_id {
        config = config.with_actor_id(actor_id);
    }
    GatewayClient::new(config).unwrap()
}

fn cart() -> CreateOrderRequest {
    CreateOrderRequest {
        table_id: "t5".into(),
        table_number: 5,
        display_order: None,
        items: vec![CreateOrderItem {
            dish_id: "pho".into(),
            name: "Pho bo".into(),
            quantity: 2,
            unit_price: 30000.0,
            note: None,
            modifiers: vec![],
            station: None,
        }],
    }
}

#[tokio::test]
async fn client_round_trips_over_http() {
    let (base_url, state) = spawn_server().await;
    let customer = client(&base_url, Role::Customer, None);
    let waiter = client(&base_url, Role::Waiter, Some("w1"));
    let rival = client(&base_url, Role::Waiter, Some("w2"));

    let created = customer.create_order(&cart()).await.unwrap();
    assert_eq!(created.status, OrderStatus::Unsubmit);
    assert_eq!(created.total_amount, 60000.0);
    assert_eq!(state.orders.order_count("T1"), 1);

    let fetched = customer.get_order(&created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);

    let approved = customer
        .update_order_status(&created.id, OrderStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, OrderStatus::Approved);

    let listed = waiter
        .list_orders(&OrderFilter {
            status: Some(OrderStatus::Approved),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let claimed = waiter.claim_order(&created.id, "w1").await.unwrap();
    assert_eq!(claimed.waiter_id.as_deref(), Some("w1"));

    let err = rival.claim_order(&created.id, "w2").await.unwrap_err();
    match err {
        ClientError::AlreadyClaimed { waiter_id, .. } => assert_eq!(waiter_id.as_deref(), Some("w1")),
        other => panic!("expected AlreadyClaimed, got {other:?}"),
    }

    customer
        .call_staff(&CallStaffNotification {
            table_number: 5,
            table_id: "t5".into(),
            order_id: Some(created.id.clone()),
            request_type: "bill".into(),
            message: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn server_errors_map_to_client_errors() {
    let (base_url, _state) = spawn_server().await;
    let customer = client(&base_url, Role::Customer, None);

    let err = customer.get_order("nope").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)), "{err:?}");

    // Reserved characters stay inside the id segment
    let err = customer.get_order("a/b?c").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)), "{err:?}");

    let created = customer.create_order(&cart()).await.unwrap();
    let err = customer
        .update_order_status(&created.id, OrderStatus::Paid)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidTransition(_)), "{err:?}");

    let mut empty = cart();
    empty.items.clear();
    let err = customer.create_order(&empty).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let customer = client(&format!("http://{addr}"), Role::Customer, None);
    let err = customer.get_order("O1").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
    assert!(err.is_connectivity());
}
