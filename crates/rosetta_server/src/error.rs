//! Maps [`RosettaError`] onto an HTTP response (spec §6/§7): the wire body
//! is always the fixed `{code, message, retriable}` shape; the status
//! code is chosen so ordinary HTTP tooling (proxies, browsers) does
//! something reasonable even though Rosetta clients are expected to key
//! off the body, not the status line.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use rosetta_config::RosettaError;

/// A thin wrapper so this crate can implement [`IntoResponse`] for
/// [`RosettaError`] without running into the orphan rule (neither the
/// trait nor the error type is defined here).
pub struct ApiError(pub RosettaError);

impl From<RosettaError> for ApiError {
    fn from(error: RosettaError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RosettaError::UnavailableOffline => StatusCode::SERVICE_UNAVAILABLE,
            RosettaError::InvalidInput(_) | RosettaError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            RosettaError::BlockOrphaned { .. } => StatusCode::CONFLICT,
            RosettaError::GethError(_) => StatusCode::BAD_GATEWAY,
            RosettaError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RosettaError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RosettaError::Unimplemented(_) => StatusCode::NOT_IMPLEMENTED,
            RosettaError::GethNotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(self.0.to_wire())).into_response()
    }
}
