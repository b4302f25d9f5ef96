//! Request correlation: every request gets an id, echoed back to the caller
//! and attached to the tracing span the handler runs in.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id for the current request, available to handlers as an
/// `Extension`. Also copied into error envelopes.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Reuses a caller-supplied `x-request-id` or mints a v4 UUID.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    let mut res = next.run(req).instrument(span).await;

    match HeaderValue::from_str(&id) {
        Ok(val) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, val);
        }
        Err(_) => tracing::warn!(request_id = %id, "request id is not a valid header value"),
    }

    res
}
