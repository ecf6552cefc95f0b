//! HTTP error payloads and mapping from domain errors.
//!
//! The domain stays free of transport concerns; [`DomainError`] is
//! translated into status codes and the JSON error envelope here. Internal
//! errors are logged with their real message and redacted on the wire.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{DomainError, ErrorCode};
use crate::middleware::request_id::RequestId;

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `false` on error responses.
    pub success: bool,
    /// Human-readable failure description.
    #[schema(example = "Meal not found")]
    pub error: String,
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    pub code: ErrorCode,
    /// Correlation identifier echoed from the `x-request-id` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// HTTP-facing error carrying a domain code, a message, and the ambient
/// request identifier captured at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    request_id: Option<String>,
}

impl ApiError {
    /// Construct an API error from a domain failure, capturing any ambient
    /// request identifier.
    pub fn from_domain(error: DomainError) -> Self {
        Self {
            code: error.code(),
            message: error.message().to_owned(),
            request_id: RequestId::current().map(|id| id.to_string()),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    fn to_status_code(&self) -> StatusCode {
        match self.code {
            // Conflicts render as 400 to keep the public wire contract
            // stable for existing clients.
            ErrorCode::InvalidRequest | ErrorCode::Conflict => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_envelope(&self) -> ErrorEnvelope {
        let error = if self.code == ErrorCode::InternalError {
            "Internal server error".to_owned()
        } else {
            self.message.clone()
        };
        ErrorEnvelope {
            success: false,
            error,
            code: self.code,
            request_id: self.request_id.clone(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::from_domain(value)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.to_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        if self.code == ErrorCode::InternalError {
            error!(message = %self.message, "internal error redacted from response");
        }
        HttpResponse::build(self.status_code()).json(self.to_envelope())
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Map JSON body deserialization failures into the standard envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::from_domain(DomainError::invalid_request(format!(
        "Invalid JSON body: {err}"
    )))
    .into()
}

/// Map query-string deserialization failures into the standard envelope.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::from_domain(DomainError::invalid_request(format!(
        "Invalid query string: {err}"
    )))
    .into()
}

/// Map path-segment deserialization failures into the standard envelope.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::from_domain(DomainError::invalid_request(format!(
        "Invalid path parameter: {err}"
    )))
    .into()
}

#[cfg(test)]
mod tests {
    //! Status mapping and redaction coverage.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DomainError::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(DomainError::unauthorized("no"), StatusCode::UNAUTHORIZED)]
    #[case(DomainError::not_found("gone"), StatusCode::NOT_FOUND)]
    #[case(DomainError::conflict("dup"), StatusCode::BAD_REQUEST)]
    #[case(DomainError::external_service("upstream"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(DomainError::service_unavailable("db"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(DomainError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_expected_statuses(#[case] error: DomainError, #[case] expected: StatusCode) {
        assert_eq!(ApiError::from_domain(error).status_code(), expected);
    }

    #[rstest]
    fn envelope_carries_message_and_code() {
        let envelope = ApiError::from_domain(DomainError::not_found("Meal not found")).to_envelope();
        assert!(!envelope.success);
        assert_eq!(envelope.error, "Meal not found");
        assert_eq!(envelope.code, ErrorCode::NotFound);
    }

    #[rstest]
    fn internal_errors_are_redacted_on_the_wire() {
        let envelope =
            ApiError::from_domain(DomainError::internal("pool exhausted at 10.0.0.3")).to_envelope();
        assert_eq!(envelope.error, "Internal server error");
        assert!(!envelope.error.contains("10.0.0.3"));
    }

    #[rstest]
    fn external_service_message_is_preserved() {
        let envelope =
            ApiError::from_domain(DomainError::external_service("Failed to recommend meals"))
                .to_envelope();
        assert_eq!(envelope.error, "Failed to recommend meals");
    }

    #[rstest]
    fn envelope_serialises_camel_case() {
        let mut error = ApiError::from_domain(DomainError::not_found("Order not found"));
        error.request_id = Some("abc".to_owned());
        let json = serde_json::to_value(error.to_envelope()).expect("serialise");
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "not_found");
        assert_eq!(json["requestId"], "abc");
    }
}
