//! Admin dashboard
//!
//! Read-only aggregates over the same orders every other view sees. Admins
//! can also cancel live orders.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::message::RelayEvent;
use shared::order::money;
use shared::order::{Order, OrderFilter, OrderStatus, Role};
use std::collections::HashMap;

use super::ViewCore;
use crate::ClientResult;
use crate::book::BookUpdate;
use crate::http::Gateway;

pub const DEFAULT_BEST_SELLERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSeller {
    pub dish_id: String,
    pub name: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    /// Inclusive start, Unix millis
    pub from: i64,
    /// Exclusive end, Unix millis
    pub to: i64,
    /// Sum of paid orders' totals
    pub revenue: f64,
    pub paid_orders: usize,
    pub cancelled_orders: usize,
    pub open_orders: usize,
    pub best_sellers: Vec<BestSeller>,
}

impl DashboardReport {
    /// Report over orders created in `[from, to)`
    ///
    /// Best sellers count non-cancelled items of non-cancelled orders by dish,
    /// highest quantity first, ties by name.
    pub fn build<'a>(
        orders: impl IntoIterator<Item = &'a Order>,
        from: i64,
        to: i64,
        top: usize,
    ) -> Self {
        let mut revenue = Decimal::ZERO;
        let mut paid_orders = 0;
        let mut cancelled_orders = 0;
        let mut open_orders = 0;
        let mut dishes: HashMap<&str, BestSeller> = HashMap::new();

        for order in orders
            .into_iter()
            .filter(|o| o.created_at >= from && o.created_at < to)
        {
            match order.status {
                OrderStatus::Paid => {
                    paid_orders += 1;
                    revenue = revenue.saturating_add(money::to_decimal(order.total_amount));
                }
                OrderStatus::Cancelled => {
                    cancelled_orders += 1;
                    continue;
                }
                _ => open_orders += 1,
            }
            for item in order.active_items() {
                dishes
                    .entry(item.dish_id.as_str())
                    .or_insert_with(|| BestSeller {
                        dish_id: item.dish_id.clone(),
                        name: item.name.clone(),
                        quantity: 0,
                    })
                    .quantity += u64::from(item.quantity);
            }
        }

        let mut best_sellers: Vec<BestSeller> = dishes.into_values().collect();
        best_sellers.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
        best_sellers.truncate(top);

        Self {
            from,
            to,
            revenue: money::to_f64(revenue),
            paid_orders,
            cancelled_orders,
            open_orders,
            best_sellers,
        }
    }
}

pub struct AdminView<G> {
    core: ViewCore<G>,
}

impl<G: Gateway> AdminView<G> {
    pub fn new(gateway: G, tenant_id: impl Into<String>) -> Self {
        Self {
            core: ViewCore::new(gateway, tenant_id, Role::Admin),
        }
    }

    pub fn core(&self) -> &ViewCore<G> {
        &self.core
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.core.refresh(&OrderFilter::default()).await
    }

    pub async fn handle_event(&mut self, event: &RelayEvent) -> ClientResult<BookUpdate> {
        self.core.handle_event(event).await
    }

    pub fn report(&self, from: i64, to: i64) -> DashboardReport {
        DashboardReport::build(self.core.book().orders(), from, to, DEFAULT_BEST_SELLERS)
    }

    pub async fn cancel_order(&mut self, order_id: &str) -> ClientResult<Order> {
        self.core
            .set_order_status(order_id, OrderStatus::Cancelled)
            .await
    }
}
