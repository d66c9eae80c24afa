//! Order model and status lifecycle
//!
//! - [`types`]: orders, items and their status enums (the wire model)
//! - [`transition`]: the role-gated transition table every view and the
//!   gateway consult
//! - [`money`]: decimal arithmetic behind the cached totals
//! - [`request`]: gateway request bodies

pub mod money;
pub mod request;
pub mod transition;
pub mod types;

// Re-exports
pub use request::{
    ClaimOrderRequest, CreateOrderItem, CreateOrderRequest, OrderFilter, UpdateItemStatusRequest,
    UpdateOrderStatusRequest,
};
pub use transition::{
    ItemAction, OrderAction, Role, TransitionError, allowed_item_actions, allowed_order_actions,
    item_transition, order_transition,
};
pub use types::*;
