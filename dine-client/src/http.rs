//! Gateway access
//!
//! [`Gateway`] is the seam every view talks through; [`GatewayClient`] is the
//! network implementation.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::ApiResponse;
use shared::message::{CallStaffNotification, RelayEvent};
use shared::order::{
    ClaimOrderRequest, CreateOrderRequest, ItemStatus, Order, OrderFilter, OrderStatus,
    UpdateItemStatusRequest, UpdateOrderStatusRequest,
};

use crate::{ClientConfig, ClientError, ClientResult};

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const ROLE_HEADER: &str = "x-actor-role";
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Order gateway operations, scoped to one tenant and acting role
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list_orders(&self, filter: &OrderFilter) -> ClientResult<Vec<Order>>;

    async fn get_order(&self, order_id: &str) -> ClientResult<Order>;

    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<Order>;

    async fn update_order_status(&self, order_id: &str, status: OrderStatus)
    -> ClientResult<Order>;

    async fn update_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> ClientResult<Order>;

    async fn claim_order(&self, order_id: &str, waiter_id: &str) -> ClientResult<Order>;

    async fn call_staff(&self, request: &CallStaffNotification) -> ClientResult<()>;
}

/// HTTP implementation of [`Gateway`]
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: Url,
    config: ClientConfig,
}

impl GatewayClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {e}")))?;
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::Validation(format!("Invalid base URL: {}", config.base_url)))?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL plus `segments`, each percent-encoded as one path segment
    ///
    /// Empty and dot segments are rejected; they would address another route.
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ClientError::Validation(format!("Invalid path segment: {bad:?}")));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Validation(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let mut request = self
            .client
            .request(method, self.url(segments)?)
            .header(TENANT_HEADER, &self.config.tenant_id)
            .header(ROLE_HEADER, self.config.role.as_str());
        if let Some(actor_id) = &self.config.actor_id {
            request = request.header(ACTOR_HEADER, actor_id);
        }
        Ok(request)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let envelope: ApiResponse<T> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(ClientError::InvalidResponse(e.to_string()));
            }
            Err(_) => {
                return Err(ClientError::InvalidResponse(format!(
                    "HTTP {status}: {}",
                    String::from_utf8_lossy(&bytes)
                )));
            }
        };

        match envelope.into_result() {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(ClientError::InvalidResponse("Missing response data".into())),
            Err(e) => {
                tracing::debug!(code = %e.code, message = %e.message, "Gateway rejected request");
                Err(e.into())
            }
        }
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(method, segments)?.json(body)).await
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    async fn list_orders(&self, filter: &OrderFilter) -> ClientResult<Vec<Order>> {
        self.send(self.request(Method::GET, &["orders"])?.query(filter))
            .await
    }

    async fn get_order(&self, order_id: &str) -> ClientResult<Order> {
        self.send(self.request(Method::GET, &["orders", order_id])?)
            .await
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        self.send_json(Method::POST, &["orders"], request).await
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> ClientResult<Order> {
        self.send_json(
            Method::PUT,
            &["orders", order_id],
            &UpdateOrderStatusRequest { status },
        )
        .await
    }

    async fn update_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> ClientResult<Order> {
        self.send_json(
            Method::PATCH,
            &["orders", order_id, "items", item_id],
            &UpdateItemStatusRequest { status },
        )
        .await
    }

    async fn claim_order(&self, order_id: &str, waiter_id: &str) -> ClientResult<Order> {
        self.send_json(
            Method::PUT,
            &["orders", order_id, "claim"],
            &ClaimOrderRequest {
                waiter_id: waiter_id.to_string(),
            },
        )
        .await
    }

    async fn call_staff(&self, request: &CallStaffNotification) -> ClientResult<()> {
        let _: RelayEvent = self.send_json(Method::POST, &["call-staff"], request).await?;
        Ok(())
    }
}
