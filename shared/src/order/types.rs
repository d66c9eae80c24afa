//! Order and order item wire model

use super::money;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Status enums
// ============================================================================

/// Order-level status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Cart created, not yet submitted
    #[default]
    Unsubmit,
    /// Submitted by the customer
    Approved,
    /// Kitchen has acknowledged the order
    Pending,
    /// Every dish is ready
    Completed,
    Served,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        Self::Unsubmit,
        Self::Approved,
        Self::Pending,
        Self::Completed,
        Self::Served,
        Self::Paid,
        Self::Cancelled,
    ];

    /// Paid and Cancelled orders accept no further changes
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsubmit => "Unsubmit",
            Self::Approved => "Approved",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Served => "Served",
            Self::Paid => "Paid",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

/// Item-level status
///
/// The unconfirmed state is written as `"Unsubmit"`; `null` or a missing field
/// on input also mean unconfirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemStatus {
    #[default]
    #[serde(rename = "Unsubmit", alias = "Unconfirmed")]
    Unconfirmed,
    Pending,
    Ready,
    Served,
    Cancelled,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 5] = [
        Self::Unconfirmed,
        Self::Pending,
        Self::Ready,
        Self::Served,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfirmed => "Unsubmit",
            Self::Pending => "Pending",
            Self::Ready => "Ready",
            Self::Served => "Served",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unconfirmed") {
            return Ok(Self::Unconfirmed);
        }
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown item status: {s}"))
    }
}

fn nullable_item_status<'de, D>(deserializer: D) -> Result<ItemStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ItemStatus>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kitchen sub-area an item is prepared at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Station {
    Grill,
    Fryer,
    Bar,
    Dessert,
}

// ============================================================================
// Order item
// ============================================================================

/// Selected option on a dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    pub option_name: String,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub dish_id: String,
    pub name: String,
    /// Always at least 1
    pub quantity: u32,
    /// Per-unit price, modifiers included
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<Station>,
    #[serde(default, deserialize_with = "nullable_item_status")]
    pub status: ItemStatus,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        money::line_total(self.unit_price, self.quantity)
    }
}

// ============================================================================
// Order
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub table_id: String,
    pub table_number: u32,
    /// Daily display number printed on tickets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
    #[serde(default)]
    pub status: OrderStatus,
    /// Placement order, never reordered
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Set once by a claim, never cleared
    #[serde(default)]
    pub waiter_id: Option<String>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub item_count: u32,
    /// Unix millis
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Order {
    /// New unsubmitted order with totals derived from `items`
    pub fn new(
        id: impl Into<String>,
        table_id: impl Into<String>,
        table_number: u32,
        items: Vec<OrderItem>,
        created_at: i64,
    ) -> Self {
        let mut order = Self {
            id: id.into(),
            table_id: table_id.into(),
            table_number,
            display_order: None,
            status: OrderStatus::Unsubmit,
            items,
            waiter_id: None,
            total_amount: 0.0,
            item_count: 0,
            created_at,
            updated_at: created_at,
        };
        order.recompute_totals();
        order
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_claimed(&self) -> bool {
        self.waiter_id.is_some()
    }

    pub fn item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// Non-cancelled items in placement order
    pub fn active_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|item| !item.status.is_cancelled())
    }

    /// Refresh `total_amount` and `item_count` from the non-cancelled items
    pub fn recompute_totals(&mut self) {
        let total = money::sum(self.active_items().map(OrderItem::line_total));
        self.total_amount = money::to_f64(total);
        self.item_count = self.active_items().count() as u32;
    }

    /// Whether the cached totals agree with the items
    pub fn totals_consistent(&self) -> bool {
        let total = money::sum(self.active_items().map(OrderItem::line_total));
        money::amounts_match(self.total_amount, money::to_f64(total))
            && self.item_count as usize == self.active_items().count()
    }
}
