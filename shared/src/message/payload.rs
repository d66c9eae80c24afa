use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RelayEventKind;
use crate::error::{AppError, AppResult};
use crate::order::OrderStatus;

// ==================== Order ====================

/// Lightweight order change hint (`order:created` / `order:updated`)
///
/// Views patch what is present and re-fetch the order for anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotification {
    pub order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiter_id: Option<String>,
}

// ==================== User ====================

/// Staff account change (`user:created` / `user:updated` / `user:deleted`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotification {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

// ==================== Call staff ====================

/// Customer asking for a waiter. Not a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStaffNotification {
    pub table_number: u32,
    pub table_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Free-form reason such as `"call"` or `"bill"`
    pub request_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ==================== Payload ====================

/// Typed payload, one record shape per event family
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelayPayload {
    Order(OrderNotification),
    User(UserNotification),
    CallStaff(CallStaffNotification),
}

impl RelayPayload {
    /// Whether this record shape belongs to `event`
    pub fn matches(&self, event: RelayEventKind) -> bool {
        match self {
            Self::Order(_) => event.is_order_event(),
            Self::User(_) => matches!(
                event,
                RelayEventKind::UserCreated
                    | RelayEventKind::UserUpdated
                    | RelayEventKind::UserDeleted
            ),
            Self::CallStaff(_) => event == RelayEventKind::CallStaff,
        }
    }

    /// Parse a loosely shaped JSON object into the record for `event`
    pub fn from_value(event: RelayEventKind, value: Value) -> AppResult<Self> {
        let parsed = match event {
            RelayEventKind::OrderCreated | RelayEventKind::OrderUpdated => {
                serde_json::from_value(value).map(Self::Order)
            }
            RelayEventKind::UserCreated
            | RelayEventKind::UserUpdated
            | RelayEventKind::UserDeleted => serde_json::from_value(value).map(Self::User),
            RelayEventKind::CallStaff => serde_json::from_value(value).map(Self::CallStaff),
        };
        parsed.map_err(|e| {
            AppError::validation(format!("invalid {event} payload: {e}")).with_detail("event", event.as_str())
        })
    }
}
