//! Request ID middleware for call tracing and correlation.
//!
//! A caller-supplied `x-request-id` is kept when it is short printable ASCII;
//! anything else is replaced with a fresh UUID v4. The ID is attached to a
//! tracing span around the call, tagged on the Sentry scope and echoed in the
//! response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// The correlation ID of the current call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Take the caller's ID if it is usable, otherwise generate one.
    #[must_use]
    pub fn from_header(header: Option<&HeaderValue>) -> Self {
        header
            .and_then(|h| h.to_str().ok())
            .filter(|id| is_acceptable(id))
            .map_or_else(
                || Self(Uuid::new_v4().to_string()),
                |id| Self(id.to_owned()),
            )
    }
}

fn is_acceptable(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Middleware that ensures every call has a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = RequestId::from_header(request.headers().get(REQUEST_ID_HEADER));
    let span = tracing::info_span!(
        "rpc",
        request_id = %request_id.0,
        path = %request.uri().path(),
    );

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id.0);
    });

    let header = HeaderValue::from_str(&request_id.0).ok();
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
