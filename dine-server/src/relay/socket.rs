//! Socket.IO endpoint
//!
//! Protocol (namespace `/`):
//! - client → server `join` `{tenantId}`: start receiving that tenant's events
//!   (a second join switches tenant)
//! - server → client `joined` `{tenantId}` acknowledgement, `error` `{message}`
//!   on a bad join
//! - server → client `<event name>` with the event's wire payload, e.g.
//!   `order:created` `{orderId, tableNumber, status, tenantId, timestamp, ..}`

use dashmap::DashMap;
use serde::Deserialize;
use serde_json::json;
use shared::message::RelayEvent;
use socketioxide::SocketIo;
use socketioxide::extract::{SocketRef, TryData};
use socketioxide::layer::SocketIoLayer;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::TenantHub;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default)]
    pub tenant_id: String,
}

/// Forwarder cancellation handles keyed by socket id
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<DashMap<String, CancellationToken>>,
}

impl Sessions {
    /// Register a new forwarder for `sid`, cancelling the previous one
    fn replace(&self, sid: &str) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.inner.insert(sid.to_string(), token.clone()) {
            previous.cancel();
        }
        token
    }

    fn end(&self, sid: &str) {
        if let Some((_, token)) = self.inner.remove(sid) {
            token.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Where a forwarder delivers events
pub trait EventSink: Send + 'static {
    /// Deliver one event; `false` once the peer is gone
    fn deliver(&self, event: &RelayEvent) -> bool;
}

impl EventSink for SocketRef {
    fn deliver(&self, event: &RelayEvent) -> bool {
        match self.emit(event.event.as_str(), &event.wire_payload()) {
            Ok(()) => true,
            Err(e) => {
                // A full buffer drops this one event; a closed socket ends the session
                tracing::warn!(sid = %self.id, event = %event.event, error = %e, "Failed to emit relay event");
                self.connected()
            }
        }
    }
}

/// Build the Socket.IO layer bound to `hub`
pub fn layer(hub: TenantHub) -> SocketIoLayer {
    let (layer, io) = SocketIo::new_layer();
    let sessions = Sessions::default();
    io.ns("/", move |socket: SocketRef| {
        on_connect(socket, hub.clone(), sessions.clone())
    });
    layer
}

async fn on_connect(socket: SocketRef, hub: TenantHub, sessions: Sessions) {
    tracing::info!(sid = %socket.id, "Socket connected");

    let join_sessions = sessions.clone();
    socket.on(
        "join",
        move |socket: SocketRef, TryData(request): TryData<JoinRequest>| {
            let hub = hub.clone();
            let sessions = join_sessions.clone();
            async move {
                let tenant_id = match request {
                    Ok(req) if !req.tenant_id.trim().is_empty() => req.tenant_id,
                    Ok(_) => {
                        reject_join(&socket, "tenantId is required");
                        return;
                    }
                    Err(e) => {
                        reject_join(&socket, &format!("invalid join payload: {e}"));
                        return;
                    }
                };

                let sid = socket.id.to_string();
                let cancel = sessions.replace(&sid);
                let rx = hub.subscribe(&tenant_id);
                tracing::info!(sid = %sid, tenant_id = %tenant_id, "Socket joined tenant");

                if let Err(e) = socket.emit("joined", &json!({ "tenantId": tenant_id })) {
                    tracing::debug!(sid = %sid, error = %e, "Failed to acknowledge join");
                }
                tokio::spawn(forward(socket, tenant_id, rx, cancel));
            }
        },
    );

    socket.on_disconnect(move |socket: SocketRef| {
        let sessions = sessions.clone();
        async move {
            sessions.end(&socket.id.to_string());
            tracing::info!(sid = %socket.id, "Socket disconnected");
        }
    });
}

fn reject_join(socket: &SocketRef, message: &str) {
    tracing::warn!(sid = %socket.id, reason = %message, "Rejected socket join");
    if let Err(e) = socket.emit("error", &json!({ "message": message })) {
        tracing::debug!(sid = %socket.id, error = %e, "Failed to send join error");
    }
}

/// Pump one tenant's events into `sink` until cancelled or the peer is gone
pub async fn forward<S: EventSink>(
    sink: S,
    tenant_id: String,
    mut rx: broadcast::Receiver<RelayEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            received = rx.recv() => match received {
                Ok(event) => {
                    if !sink.deliver(&event) {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Missed events are gone; views recover by re-fetching
                    tracing::warn!(tenant_id = %tenant_id, lagged = n, "Socket subscriber lagged, events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    tracing::debug!(tenant_id = %tenant_id, "Relay forwarder stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::{OrderNotification, RelayEventKind, RelayPayload};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<String>>>,
        accept: usize,
    }

    impl EventSink for Recorder {
        fn deliver(&self, event: &RelayEvent) -> bool {
            let mut seen = self.seen.lock().unwrap();
            seen.push(event.order_id().unwrap_or_default().to_string());
            seen.len() < self.accept
        }
    }

    fn event(order_id: &str) -> RelayEvent {
        RelayEvent::new(
            "T1",
            RelayEventKind::OrderCreated,
            RelayPayload::Order(OrderNotification {
                order_id: order_id.into(),
                ..Default::default()
            }),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn forwards_in_order_until_cancelled() {
        let hub = TenantHub::default();
        let recorder = Recorder {
            accept: usize::MAX,
            ..Default::default()
        };
        let cancel = CancellationToken::new();
        let task = tokio::spawn(forward(
            recorder.clone(),
            "T1".into(),
            hub.subscribe("T1"),
            cancel.clone(),
        ));

        hub.publish(event("O1"));
        hub.publish(event("O2"));
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
        task.await.unwrap();

        assert_eq!(*recorder.seen.lock().unwrap(), vec!["O1", "O2"]);
        assert_eq!(hub.publish(event("O3")), 0);
    }

    #[tokio::test]
    async fn stops_when_peer_is_gone() {
        let hub = TenantHub::default();
        let recorder = Recorder {
            accept: 1,
            ..Default::default()
        };
        let task = tokio::spawn(forward(
            recorder.clone(),
            "T1".into(),
            hub.subscribe("T1"),
            CancellationToken::new(),
        ));

        hub.publish(event("O1"));
        task.await.unwrap();
        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn replacing_a_session_cancels_the_old_forwarder() {
        let sessions = Sessions::default();
        let first = sessions.replace("sid-1");
        let second = sessions.replace("sid-1");
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(sessions.len(), 1);

        sessions.end("sid-1");
        assert!(second.is_cancelled());
        assert!(sessions.is_empty());
    }
}
