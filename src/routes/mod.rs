// Route exports
pub mod matches;
pub mod profiles;

use std::fmt;
use actix_web::{
    error::{self, JsonPayloadError},
    http::StatusCode,
    web, HttpRequest, HttpResponse,
};
use crate::models::ErrorResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(profiles::configure),
    );
}

/// A request rejected before it reached a handler
///
/// Rendered with the same `ErrorResponse` body the handlers use.
#[derive(Debug)]
pub struct RequestRejected {
    status: StatusCode,
    body: ErrorResponse,
}

impl RequestRejected {
    fn new(status: StatusCode, error: &str, message: String) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.to_string(),
                message,
                status_code: status.as_u16(),
            },
        }
    }
}

impl fmt::Display for RequestRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.body.error, self.status, self.body.message)
    }
}

impl error::ResponseError for RequestRejected {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(&self.body)
    }
}

/// Map JSON body extraction failures to `ErrorResponse` bodies
pub fn handle_json_payload_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let rejected = match &err {
        JsonPayloadError::ContentType => RequestRejected::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported_media_type",
            "Match requests must be sent as application/json".to_string(),
        ),
        JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => {
            RequestRejected::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                format!("Request body exceeds {} bytes, send a smaller candidate pool", limit),
            )
        }
        JsonPayloadError::Deserialize(e) => RequestRejected::new(
            StatusCode::BAD_REQUEST,
            "invalid_json",
            format!("Request body does not match the expected shape: {}", e),
        ),
        other => RequestRejected::new(StatusCode::BAD_REQUEST, "invalid_json", other.to_string()),
    };

    tracing::info!("Rejected body on {}: {}", req.path(), rejected);
    rejected.into()
}

/// Map path parameter failures to `ErrorResponse` bodies
pub fn handle_path_error(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Rejected path {}: {}", req.path(), err);
    RequestRejected::new(
        StatusCode::BAD_REQUEST,
        "invalid_path",
        format!("Unrecognised profile id in path: {}", err),
    )
    .into()
}
