//! Input validation helpers
//!
//! Text limits and the checks applied to order bodies before they reach the
//! store.

use shared::error::AppError;
use shared::order::{CreateOrderItem, CreateOrderRequest};

// ── Text length limits ──────────────────────────────────────────────

/// Dish and table names
pub const MAX_NAME_LEN: usize = 200;

/// Item notes shown on kitchen tickets
pub const MAX_NOTE_LEN: usize = 50;

/// Identifiers: tenant, table, dish, waiter
pub const MAX_ID_LEN: usize = 100;

/// Call-staff messages
pub const MAX_MESSAGE_LEN: usize = 500;

// ── Numeric limits ──────────────────────────────────────────────────

/// Largest accepted unit or modifier price
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Largest accepted item quantity
pub const MAX_QUANTITY: u32 = 10_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Reject NaN, infinite, negative and oversized amounts
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || !(0.0..=MAX_AMOUNT).contains(&value) {
        return Err(AppError::validation(format!(
            "{field} must be a number between 0 and {MAX_AMOUNT}"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

// ── Order bodies ────────────────────────────────────────────────────

pub fn validate_create_order(req: &CreateOrderRequest) -> Result<(), AppError> {
    validate_required_text(&req.table_id, "tableId", MAX_ID_LEN)?;
    if req.items.is_empty() {
        return Err(AppError::new(shared::error::ErrorCode::OrderEmpty));
    }
    for (index, item) in req.items.iter().enumerate() {
        validate_item(item).map_err(|e| e.with_detail("itemIndex", index))?;
    }
    Ok(())
}

fn validate_item(item: &CreateOrderItem) -> Result<(), AppError> {
    validate_required_text(&item.dish_id, "dishId", MAX_ID_LEN)?;
    validate_required_text(&item.name, "name", MAX_NAME_LEN)?;
    if item.quantity == 0 || item.quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity must be between 1 and {MAX_QUANTITY}"
        ))
        .with_detail("field", "quantity"));
    }
    validate_amount(item.unit_price, "unitPrice")?;
    validate_optional_text(&item.note, "note", MAX_NOTE_LEN)?;
    for modifier in &item.modifiers {
        validate_required_text(&modifier.option_name, "optionName", MAX_NAME_LEN)?;
        validate_amount(modifier.price, "modifier price")?;
    }
    Ok(())
}
