//! Customer "call staff" side channel
//!
//! Relays `customer:call_staff` to the tenant. No order state changes and no
//! server-side rate limit; clients debounce on their own.

use axum::{Json, Router, extract::State, routing::post};
use shared::message::{CallStaffNotification, RelayEvent, RelayEventKind, RelayPayload};

use crate::api::extract::{ApiJson, TenantId};
use crate::core::ServerState;
use crate::utils::validation::{
    MAX_ID_LEN, MAX_MESSAGE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/call-staff", post(call_staff))
}

async fn call_staff(
    State(state): State<ServerState>,
    tenant: TenantId,
    ApiJson(payload): ApiJson<CallStaffNotification>,
) -> AppResult<Json<ApiResponse<RelayEvent>>> {
    validate_required_text(&payload.table_id, "tableId", MAX_ID_LEN)?;
    validate_required_text(&payload.request_type, "requestType", MAX_ID_LEN)?;
    validate_optional_text(&payload.message, "message", MAX_MESSAGE_LEN)?;

    tracing::info!(
        tenant_id = %tenant.as_str(),
        table_number = payload.table_number,
        request_type = %payload.request_type,
        "Customer called staff"
    );
    let event = state.relay.publish(
        tenant.as_str(),
        RelayEventKind::CallStaff,
        RelayPayload::CallStaff(payload),
    )?;
    Ok(ok(event))
}
