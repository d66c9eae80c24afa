use shared::error::AppError;
use shared::order::TransitionError;
use thiserror::Error;

/// Order gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Item {item_id} not found in order {order_id}")]
    ItemNotFound { order_id: String, item_id: String },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Order already claimed by {0}")]
    AlreadyClaimed(String),

    #[error("Only waiters can claim orders")]
    ClaimNotPermitted,

    #[error("Order {0} is paid or cancelled")]
    Terminal(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::OrderNotFound(id) => AppError::order_not_found(&id),
            GatewayError::ItemNotFound { order_id, item_id } => {
                AppError::item_not_found(&order_id, &item_id)
            }
            GatewayError::Transition(e) => e.into(),
            GatewayError::AlreadyClaimed(waiter_id) => AppError::already_claimed(&waiter_id),
            e @ GatewayError::ClaimNotPermitted => AppError::permission_denied(e.to_string()),
            e @ GatewayError::Terminal(_) => AppError::order_terminal(e.to_string()),
        }
    }
}
