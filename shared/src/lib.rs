//! Shared types for the Dine restaurant operations workspace
//!
//! Wire types used by both `dine-server` and `dine-client`: the order model,
//! the role-gated status transition table, relay events and the unified
//! error/response envelope.

pub mod error;
pub mod message;
pub mod order;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{RelayEvent, RelayEventKind, RelayPayload};
pub use order::transition;
pub use order::{
    ItemAction, ItemStatus, Modifier, Order, OrderAction, OrderItem, OrderStatus, Role, Station,
    TransitionError,
};
