//! Mapping pipeline failures to the fixed caller-facing response shapes.
//!
//! Exactly four shapes leave this service: 200 `{ "content": ... }`,
//! 429 / 400 / 500 `{ "error": ... }` with fixed strings. Provider detail
//! is logged where the failure is caught and never serialized here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::gatekeeper::GatewayError;

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::MessageTooLong => StatusCode::BAD_REQUEST,
            GatewayError::EmptyConversation | GatewayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_the_fixed_strings() {
        assert_eq!(
            GatewayError::RateLimited.to_string(),
            "Rate limit exceeded. Please wait 5 seconds."
        );
        assert_eq!(
            GatewayError::MessageTooLong.to_string(),
            "Message too long. Please keep your message shorter."
        );
        assert_eq!(
            GatewayError::EmptyConversation.to_string(),
            "There was an error processing your request"
        );
    }
}
