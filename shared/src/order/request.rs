//! Gateway request bodies and query parameters

use serde::{Deserialize, Serialize};

use super::types::{ItemStatus, Modifier, Order, OrderStatus, Station};

/// `POST /orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub table_id: String,
    pub table_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
    #[serde(default)]
    pub items: Vec<CreateOrderItem>,
}

/// One cart line in [`CreateOrderRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub dish_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<Station>,
}

/// `PUT /orders/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// `PATCH /orders/{id}/items/{itemId}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItemStatusRequest {
    pub status: ItemStatus,
}

/// `PUT /orders/{id}/claim`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOrderRequest {
    pub waiter_id: String,
}

/// `GET /orders` query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiter_id: Option<String>,
    /// Only orders with no waiter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unclaimed: Option<bool>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status
            && order.status != status
        {
            return false;
        }
        if let Some(waiter_id) = &self.waiter_id
            && order.waiter_id.as_ref() != Some(waiter_id)
        {
            return false;
        }
        match self.unclaimed {
            Some(true) => !order.is_claimed(),
            Some(false) => order.is_claimed(),
            None => true,
        }
    }
}
