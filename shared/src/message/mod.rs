//! Relay event types
//!
//! Shared by the gateway (which publishes) and the role views (which
//! subscribe). On the socket an event travels as `(event name, payload)`,
//! where the payload is the notification record plus `tenantId` and an
//! ISO-8601 `timestamp`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};
use crate::util;

pub mod payload;
pub use payload::*;

/// Event names a tenant room can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelayEventKind {
    #[serde(rename = "order:created")]
    OrderCreated,
    #[serde(rename = "order:updated")]
    OrderUpdated,
    #[serde(rename = "user:created")]
    UserCreated,
    #[serde(rename = "user:updated")]
    UserUpdated,
    #[serde(rename = "user:deleted")]
    UserDeleted,
    #[serde(rename = "customer:call_staff")]
    CallStaff,
}

impl RelayEventKind {
    pub const ALL: [RelayEventKind; 6] = [
        Self::OrderCreated,
        Self::OrderUpdated,
        Self::UserCreated,
        Self::UserUpdated,
        Self::UserDeleted,
        Self::CallStaff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "order:created",
            Self::OrderUpdated => "order:updated",
            Self::UserCreated => "user:created",
            Self::UserUpdated => "user:updated",
            Self::UserDeleted => "user:deleted",
            Self::CallStaff => "customer:call_staff",
        }
    }

    pub fn is_order_event(&self) -> bool {
        matches!(self, Self::OrderCreated | Self::OrderUpdated)
    }
}

impl fmt::Display for RelayEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelayEventKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(AppError::required("event"));
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                AppError::validation(format!("unknown event: {s}")).with_detail("event", s)
            })
    }
}

/// One notification addressed to every session of a tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRelayEvent")]
pub struct RelayEvent {
    pub tenant_id: String,
    pub event: RelayEventKind,
    pub payload: RelayPayload,
    /// ISO-8601, UTC, millisecond precision
    pub timestamp: String,
}

impl RelayEvent {
    /// Build an event stamped with the current time
    pub fn new(
        tenant_id: impl Into<String>,
        event: RelayEventKind,
        payload: RelayPayload,
    ) -> AppResult<Self> {
        let tenant_id = tenant_id.into();
        if tenant_id.trim().is_empty() {
            return Err(AppError::required("tenantId"));
        }
        if !payload.matches(event) {
            return Err(AppError::validation(format!(
                "payload does not fit event {event}"
            )));
        }
        Ok(Self {
            tenant_id,
            event,
            payload,
            timestamp: util::iso_timestamp(util::now_millis()),
        })
    }

    /// The socket payload: the record with `tenantId` and `timestamp` merged in
    pub fn wire_payload(&self) -> Value {
        let mut value = serde_json::to_value(&self.payload).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.insert("tenantId".into(), Value::String(self.tenant_id.clone()));
            map.insert("timestamp".into(), Value::String(self.timestamp.clone()));
        }
        value
    }

    /// Rebuild an event from a socket `(event name, payload)` pair
    pub fn from_wire(event_name: &str, payload: Value) -> AppResult<Self> {
        let event: RelayEventKind = event_name.parse()?;
        let tenant_id = payload
            .get("tenantId")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::required("tenantId"))?
            .to_string();
        let timestamp = payload
            .get("timestamp")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| util::iso_timestamp(util::now_millis()));
        let payload = RelayPayload::from_value(event, payload)?;
        Ok(Self {
            tenant_id,
            event,
            payload,
            timestamp,
        })
    }

    /// Order id carried by order events
    pub fn order_id(&self) -> Option<&str> {
        match &self.payload {
            RelayPayload::Order(order) => Some(&order.order_id),
            RelayPayload::CallStaff(call) => call.order_id.as_deref(),
            RelayPayload::User(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRelayEvent {
    tenant_id: String,
    event: RelayEventKind,
    payload: Value,
    timestamp: String,
}

impl TryFrom<RawRelayEvent> for RelayEvent {
    type Error = AppError;

    fn try_from(raw: RawRelayEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            payload: RelayPayload::from_value(raw.event, raw.payload)?,
            tenant_id: raw.tenant_id,
            event: raw.event,
            timestamp: raw.timestamp,
        })
    }
}
