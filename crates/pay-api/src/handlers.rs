//! # Request Handlers
//!
//! Axum request handlers for the payment API.

use crate::state::AppState;
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use pay_core::{Invoice, PaymentError, PaymentResult};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Content type of health responses (draft-inadarei-api-health-check)
pub const HEALTH_CONTENT_TYPE: &str = "application/health+json";

/// Health response body. There are no dependencies to check, so it never changes.
pub const HEALTH_BODY: &str = r#"{"status":"pass"}"#;

// =============================================================================
// Errors
// =============================================================================

/// Error response.
///
/// Rendered as a bare status code; charge failures never carry a body.
#[derive(Debug)]
pub struct ApiError(PaymentError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_client_error() {
            debug!("Rejected charge request: {}", self.0);
        } else {
            error!("Failed to charge invoice: {}", self.0);
        }
        self.status().into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint, mounted as both readiness and liveness check
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HEALTH_CONTENT_TYPE)],
        HEALTH_BODY,
    )
}

/// Collect the whole request body, giving up once `deadline` has passed.
///
/// The deadline covers the entire read, not the gap between chunks.
pub async fn read_body(body: Body, deadline: Duration) -> PaymentResult<Bytes> {
    match tokio::time::timeout(deadline, to_bytes(body, usize::MAX)).await {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(e)) => Err(PaymentError::InvalidRequest(format!(
            "Failed to read body: {}",
            e
        ))),
        Err(_) => Err(PaymentError::InvalidRequest(format!(
            "Body not received within {:?}",
            deadline
        ))),
    }
}

/// Charge an invoice.
///
/// Echoes the invoice back with `result` set to a freshly generated outcome.
#[instrument(skip_all)]
pub async fn charge(State(state): State<AppState>, body: Body) -> Result<Response, ApiError> {
    let body = read_body(body, state.config.read_timeout).await?;

    let mut invoice = Invoice::from_json(&body)?;
    let result = invoice.settle(state.outcomes.as_ref());

    debug!(
        customer_id = invoice.customer_id,
        value = invoice.value,
        result,
        "Charged invoice"
    );

    let body = invoice.to_json()?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
