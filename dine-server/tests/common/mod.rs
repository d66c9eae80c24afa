#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use dine_client::{ClientError, ClientResult, Gateway};
use dine_server::{Config, OneshotRouter, ServerState, build_app};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use shared::ApiResponse;
use shared::message::CallStaffNotification;
use shared::order::{
    CreateOrderRequest, ItemStatus, Order, OrderFilter, OrderStatus, Role,
};

pub struct TestApp {
    pub router: Router<ServerState>,
    pub state: ServerState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let state = ServerState::new(config);
        Self {
            router: build_app(&state),
            state,
        }
    }

    /// Send a request and decode the JSON body
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let mut router = self.router.clone();
        let response = router.oneshot(&self.state, request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn webhook(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, &format!("/webhooks/{path}"), &[], Some(body))
            .await
    }

    /// `POST /orders` as a customer, returning the created order
    pub async fn create_order(&self, tenant: &str, table_number: u32) -> Order {
        let (status, body) = self
            .call(
                Method::POST,
                "/orders",
                &[("x-tenant-id", tenant), ("x-actor-role", "customer")],
                Some(json!({
                    "tableId": format!("table-{table_number}"),
                    "tableNumber": table_number,
                    "items": [
                        {"dishId": "pho", "name": "Pho bo", "quantity": 2, "unitPrice": 30000, "station": "grill"},
                        {"dishId": "tea", "name": "Tra da", "quantity": 1, "unitPrice": 40000, "station": "bar"}
                    ]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        data(body)
    }

    pub fn gateway(&self, tenant: &str, role: Role, actor_id: Option<&str>) -> RouterGateway {
        RouterGateway {
            app: TestApp {
                router: self.router.clone(),
                state: self.state.clone(),
            },
            tenant: tenant.to_string(),
            role,
            actor_id: actor_id.map(str::to_string),
        }
    }
}

/// `data` of a success envelope
pub fn data<T: DeserializeOwned>(body: Value) -> T {
    let envelope: ApiResponse<T> = serde_json::from_value(body).unwrap();
    assert!(envelope.success);
    envelope.data.unwrap()
}

/// [`Gateway`] driven through the in-process router
pub struct RouterGateway {
    app: TestApp,
    tenant: String,
    role: Role,
    actor_id: Option<String>,
}

impl RouterGateway {
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        let mut headers = vec![
            ("x-tenant-id", self.tenant.as_str()),
            ("x-actor-role", self.role.as_str()),
        ];
        if let Some(actor_id) = &self.actor_id {
            headers.push(("x-actor-id", actor_id.as_str()));
        }
        let (_, value) = self.app.call(method, uri, &headers, body).await;
        let envelope: ApiResponse<T> = serde_json::from_value(value)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        envelope
            .into_result()?
            .ok_or_else(|| ClientError::InvalidResponse("Missing response data".into()))
    }
}

#[async_trait]
impl Gateway for RouterGateway {
    async fn list_orders(&self, filter: &OrderFilter) -> ClientResult<Vec<Order>> {
        let mut uri = "/orders".to_string();
        if let Some(waiter_id) = &filter.waiter_id {
            uri.push_str(&format!("?waiterId={waiter_id}"));
        }
        self.send(Method::GET, &uri, None).await
    }

    async fn get_order(&self, order_id: &str) -> ClientResult<Order> {
        self.send(Method::GET, &format!("/orders/{order_id}"), None).await
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        self.send(Method::POST, "/orders", Some(json!(request))).await
    }

    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<Order> {
        self.send(
            Method::PUT,
            &format!("/orders/{order_id}"),
            Some(json!({ "status": status })),
        )
        .await
    }

    async fn update_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> ClientResult<Order> {
        self.send(
            Method::PATCH,
            &format!("/orders/{order_id}/items/{item_id}"),
            Some(json!({ "status": status })),
        )
        .await
    }

    async fn claim_order(&self, order_id: &str, waiter_id: &str) -> ClientResult<Order> {
        self.send(
            Method::PUT,
            &format!("/orders/{order_id}/claim"),
            Some(json!({ "waiterId": waiter_id })),
        )
        .await
    }

    async fn call_staff(&self, request: &CallStaffNotification) -> ClientResult<()> {
        let _: Value = self.send(Method::POST, "/call-staff", Some(json!(request))).await?;
        Ok(())
    }
}
