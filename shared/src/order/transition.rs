//! Role-gated status transitions
//!
//! The two tables below are the only place that decides which status change
//! a role may request. The gateway enforces them and every role view renders
//! its buttons from [`allowed_order_actions`] / [`allowed_item_actions`].

use super::types::{ItemStatus, Order, OrderStatus};
use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Actor requesting a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Kitchen,
    Waiter,
    Cashier,
    Admin,
    /// Gateway-internal automation
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Kitchen => "kitchen",
            Self::Waiter => "waiter",
            Self::Cashier => "cashier",
            Self::Admin => "admin",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "kitchen" => Ok(Self::Kitchen),
            "waiter" => Ok(Self::Waiter),
            "cashier" => Ok(Self::Cashier),
            "admin" => Ok(Self::Admin),
            "system" => Ok(Self::System),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

// ============================================================================
// Tables
// ============================================================================

struct Rule<S: 'static> {
    from: S,
    to: S,
    roles: &'static [Role],
}

const CANCELLERS: &[Role] = &[Role::Waiter, Role::Admin];

#[rustfmt::skip]
static ORDER_RULES: &[Rule<OrderStatus>] = &[
    Rule { from: OrderStatus::Unsubmit, to: OrderStatus::Approved, roles: &[Role::Customer] },
    Rule { from: OrderStatus::Approved, to: OrderStatus::Pending, roles: &[Role::Kitchen, Role::Waiter] },
    Rule { from: OrderStatus::Pending, to: OrderStatus::Completed, roles: &[Role::Kitchen] },
    Rule { from: OrderStatus::Completed, to: OrderStatus::Served, roles: &[Role::Waiter] },
    Rule { from: OrderStatus::Served, to: OrderStatus::Paid, roles: &[Role::Waiter, Role::Cashier] },
    Rule { from: OrderStatus::Unsubmit, to: OrderStatus::Cancelled, roles: CANCELLERS },
    Rule { from: OrderStatus::Approved, to: OrderStatus::Cancelled, roles: CANCELLERS },
    Rule { from: OrderStatus::Pending, to: OrderStatus::Cancelled, roles: CANCELLERS },
    Rule { from: OrderStatus::Completed, to: OrderStatus::Cancelled, roles: CANCELLERS },
    Rule { from: OrderStatus::Served, to: OrderStatus::Cancelled, roles: CANCELLERS },
];

#[rustfmt::skip]
static ITEM_RULES: &[Rule<ItemStatus>] = &[
    Rule { from: ItemStatus::Unconfirmed, to: ItemStatus::Pending, roles: &[Role::Waiter, Role::System] },
    Rule { from: ItemStatus::Pending, to: ItemStatus::Ready, roles: &[Role::Kitchen] },
    Rule { from: ItemStatus::Ready, to: ItemStatus::Served, roles: &[Role::Waiter] },
    Rule { from: ItemStatus::Unconfirmed, to: ItemStatus::Cancelled, roles: &[Role::Waiter] },
    Rule { from: ItemStatus::Pending, to: ItemStatus::Cancelled, roles: &[Role::Waiter] },
];

fn lookup<S: PartialEq + Copy + 'static>(
    rules: &'static [Rule<S>],
    from: S,
    to: S,
) -> Option<&'static Rule<S>> {
    rules.iter().find(|rule| rule.from == from && rule.to == to)
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Order cannot move from {from} to {to}")]
    OrderNotAllowed { from: OrderStatus, to: OrderStatus },

    #[error("Role {role} cannot move an order from {from} to {to}")]
    OrderRoleDenied {
        from: OrderStatus,
        to: OrderStatus,
        role: Role,
    },

    #[error("Item cannot move from {from} to {to}")]
    ItemNotAllowed { from: ItemStatus, to: ItemStatus },

    #[error("Role {role} cannot move an item from {from} to {to}")]
    ItemRoleDenied {
        from: ItemStatus,
        to: ItemStatus,
        role: Role,
    },

    #[error("Order is {0} and can no longer change")]
    OrderTerminal(OrderStatus),
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        let code = match &err {
            TransitionError::OrderTerminal(_) => ErrorCode::OrderTerminal,
            _ => ErrorCode::InvalidTransition,
        };
        let app = AppError::with_message(code, err.to_string());
        match err {
            TransitionError::OrderNotAllowed { from, to }
            | TransitionError::OrderRoleDenied { from, to, .. } => app
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str()),
            TransitionError::ItemNotAllowed { from, to }
            | TransitionError::ItemRoleDenied { from, to, .. } => app
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str()),
            TransitionError::OrderTerminal(status) => app.with_detail("status", status.as_str()),
        }
    }
}

// ============================================================================
// Checks
// ============================================================================

/// Check an order-level status change requested by `role`
pub fn order_transition(
    from: OrderStatus,
    to: OrderStatus,
    role: Role,
) -> Result<(), TransitionError> {
    let rule =
        lookup(ORDER_RULES, from, to).ok_or(TransitionError::OrderNotAllowed { from, to })?;
    if !rule.roles.contains(&role) {
        return Err(TransitionError::OrderRoleDenied { from, to, role });
    }
    Ok(())
}

/// Check an item-level status change requested by `role` on an order in
/// `order_status`
pub fn item_transition(
    order_status: OrderStatus,
    from: ItemStatus,
    to: ItemStatus,
    role: Role,
) -> Result<(), TransitionError> {
    if order_status.is_terminal() {
        return Err(TransitionError::OrderTerminal(order_status));
    }
    let rule = lookup(ITEM_RULES, from, to).ok_or(TransitionError::ItemNotAllowed { from, to })?;
    if !rule.roles.contains(&role) {
        return Err(TransitionError::ItemRoleDenied { from, to, role });
    }
    Ok(())
}

// ============================================================================
// Actions
// ============================================================================

/// Order-level action a view may offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    /// Unsubmit -> Approved
    Submit,
    /// Approved -> Pending
    Acknowledge,
    /// Pending -> Completed
    Complete,
    /// Completed -> Served
    Serve,
    /// Served -> Paid
    MarkPaid,
    Cancel,
    /// Assign the order to the requesting waiter
    Claim,
}

impl OrderAction {
    /// Status this action moves the order into; `None` for claim
    pub fn target(&self) -> Option<OrderStatus> {
        match self {
            Self::Submit => Some(OrderStatus::Approved),
            Self::Acknowledge => Some(OrderStatus::Pending),
            Self::Complete => Some(OrderStatus::Completed),
            Self::Serve => Some(OrderStatus::Served),
            Self::MarkPaid => Some(OrderStatus::Paid),
            Self::Cancel => Some(OrderStatus::Cancelled),
            Self::Claim => None,
        }
    }

    fn for_target(to: OrderStatus) -> Option<Self> {
        match to {
            OrderStatus::Approved => Some(Self::Submit),
            OrderStatus::Pending => Some(Self::Acknowledge),
            OrderStatus::Completed => Some(Self::Complete),
            OrderStatus::Served => Some(Self::Serve),
            OrderStatus::Paid => Some(Self::MarkPaid),
            OrderStatus::Cancelled => Some(Self::Cancel),
            OrderStatus::Unsubmit => None,
        }
    }
}

/// Item-level action a view may offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAction {
    /// Unconfirmed -> Pending
    Confirm,
    /// Pending -> Ready
    MarkReady,
    /// Ready -> Served
    Serve,
    Cancel,
}

impl ItemAction {
    pub fn target(&self) -> ItemStatus {
        match self {
            Self::Confirm => ItemStatus::Pending,
            Self::MarkReady => ItemStatus::Ready,
            Self::Serve => ItemStatus::Served,
            Self::Cancel => ItemStatus::Cancelled,
        }
    }

    fn for_target(to: ItemStatus) -> Option<Self> {
        match to {
            ItemStatus::Pending => Some(Self::Confirm),
            ItemStatus::Ready => Some(Self::MarkReady),
            ItemStatus::Served => Some(Self::Serve),
            ItemStatus::Cancelled => Some(Self::Cancel),
            ItemStatus::Unconfirmed => None,
        }
    }
}

/// Actions `role` may take on `order` right now, in table order
pub fn allowed_order_actions(order: &Order, role: Role) -> Vec<OrderAction> {
    if order.is_terminal() {
        return Vec::new();
    }
    let mut actions: Vec<OrderAction> = ORDER_RULES
        .iter()
        .filter(|rule| rule.from == order.status && rule.roles.contains(&role))
        .filter_map(|rule| OrderAction::for_target(rule.to))
        .collect();
    if role == Role::Waiter && !order.is_claimed() {
        actions.push(OrderAction::Claim);
    }
    actions
}

/// Actions `role` may take on an item in `item_status` belonging to an order
/// in `order_status`
pub fn allowed_item_actions(
    order_status: OrderStatus,
    item_status: ItemStatus,
    role: Role,
) -> Vec<ItemAction> {
    if order_status.is_terminal() {
        return Vec::new();
    }
    ITEM_RULES
        .iter()
        .filter(|rule| rule.from == item_status && rule.roles.contains(&role))
        .filter_map(|rule| ItemAction::for_target(rule.to))
        .collect()
}
