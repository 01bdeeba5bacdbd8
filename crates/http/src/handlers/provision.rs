use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use pgvec_provision_core::{build_statements, ProvisionError, ProvisioningEvent, ProvisioningRequest, SqlStatement};
use pgvec_provision_service::{InvocationError, InvocationResponse};

use crate::api_error::ApiError;
use crate::AppState;

/// Run one provisioning invocation. Malformed bodies still get an envelope.
pub async fn invoke(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<InvocationResponse>) {
    let response = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(event) => state.service.invoke(event).await,
        Err(e) => {
            tracing::warn!("rejecting unparsable invocation body: {e}");
            InvocationResponse::failure(&InvocationError::Provision(ProvisionError::InvalidPayload(
                e.to_string(),
            )))
        },
    };
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response))
}

/// Render the statements an event would execute, without touching the database.
pub async fn preview_statements(
    Json(event): Json<ProvisioningEvent>,
) -> Result<Json<Vec<SqlStatement>>, ApiError> {
    let request = ProvisioningRequest::try_from(event)?;
    Ok(Json(build_statements(&request)))
}
