//! Kitchen display
//!
//! Tickets oldest first, filtered by station and item status, each tagged with
//! its age and a display bucket recomputed on every tick.

use serde::Serialize;
use shared::order::{
    ItemStatus, Order, OrderFilter, OrderItem, OrderStatus, Role, Station,
};

use super::ViewCore;
use crate::ClientResult;
use crate::book::BookUpdate;
use crate::http::Gateway;
use shared::message::RelayEvent;

const MINUTE_MS: i64 = 60_000;

/// Whole minutes from `order_time` to `now`, rounded down
///
/// Clock skew (`now < order_time`) gives a negative value.
pub fn elapsed_minutes(order_time: i64, now: i64) -> i64 {
    (now - order_time).div_euclid(MINUTE_MS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "status", rename_all = "camelCase")]
pub enum DisplayBucket {
    Late,
    Status(OrderStatus),
}

/// `Late` once a live order has waited `threshold_minutes`, else its status
pub fn display_bucket(order: &Order, now: i64, threshold_minutes: i64) -> DisplayBucket {
    if !order.is_terminal() && elapsed_minutes(order.created_at, now) >= threshold_minutes {
        DisplayBucket::Late
    } else {
        DisplayBucket::Status(order.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenTicket {
    pub order_id: String,
    pub table_number: u32,
    pub display_order: Option<u32>,
    pub status: OrderStatus,
    pub elapsed_minutes: i64,
    pub bucket: DisplayBucket,
    /// Items passing the current filters, placement order
    pub items: Vec<OrderItem>,
}

pub struct KitchenView<G> {
    core: ViewCore<G>,
    late_threshold_minutes: i64,
    station: Option<Station>,
    item_status: Option<ItemStatus>,
}

impl<G: Gateway> KitchenView<G> {
    pub fn new(gateway: G, tenant_id: impl Into<String>, late_threshold_minutes: i64) -> Self {
        Self {
            core: ViewCore::new(gateway, tenant_id, Role::Kitchen),
            late_threshold_minutes,
            station: None,
            item_status: None,
        }
    }

    pub fn core(&self) -> &ViewCore<G> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut ViewCore<G> {
        &mut self.core
    }

    /// `None` shows every station, including items with no station
    pub fn set_station_filter(&mut self, station: Option<Station>) {
        self.station = station;
    }

    pub fn set_item_status_filter(&mut self, status: Option<ItemStatus>) {
        self.item_status = status;
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.core.refresh(&OrderFilter::default()).await
    }

    pub async fn handle_event(&mut self, event: &RelayEvent) -> ClientResult<BookUpdate> {
        self.core.handle_event(event).await
    }

    fn item_visible(&self, item: &OrderItem) -> bool {
        if item.status.is_cancelled() {
            return false;
        }
        if let Some(station) = self.station
            && item.station != Some(station)
        {
            return false;
        }
        self.item_status.is_none_or(|status| item.status == status)
    }

    fn filtering(&self) -> bool {
        self.station.is_some() || self.item_status.is_some()
    }

    /// Live tickets at `now` (Unix millis), oldest first
    ///
    /// With a filter set, orders with no matching item are left out.
    pub fn tickets(&self, now: i64) -> Vec<KitchenTicket> {
        self.core
            .book()
            .orders()
            .into_iter()
            .filter(|order| !order.is_terminal())
            .filter_map(|order| {
                let items: Vec<OrderItem> = order
                    .items
                    .iter()
                    .filter(|item| self.item_visible(item))
                    .cloned()
                    .collect();
                if self.filtering() && items.is_empty() {
                    return None;
                }
                Some(KitchenTicket {
                    order_id: order.id.clone(),
                    table_number: order.table_number,
                    display_order: order.display_order,
                    status: order.status,
                    elapsed_minutes: elapsed_minutes(order.created_at, now),
                    bucket: display_bucket(order, now, self.late_threshold_minutes),
                    items,
                })
            })
            .collect()
    }

    /// Approved → Pending
    pub async fn acknowledge(&mut self, order_id: &str) -> ClientResult<Order> {
        self.core.set_order_status(order_id, OrderStatus::Pending).await
    }

    /// Item Pending → Ready
    pub async fn mark_item_ready(&mut self, order_id: &str, item_id: &str) -> ClientResult<Order> {
        self.core
            .set_item_status(order_id, item_id, ItemStatus::Ready)
            .await
    }

    /// Pending → Completed
    pub async fn complete(&mut self, order_id: &str) -> ClientResult<Order> {
        self.core
            .set_order_status(order_id, OrderStatus::Completed)
            .await
    }
}
