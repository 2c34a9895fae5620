//! Request/response logging middleware with sensitive data redaction

use std::sync::LazyLock;
use std::time::Instant;

use axum::{
    body::{to_bytes, Body},
    extract::MatchedPath,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use regex::Regex;
use tracing::{debug, info, Level};

/// Bodies above this size are never buffered for logging
const MAX_LOGGED_BODY_BYTES: usize = 16 * 1024;
const MAX_LOGGED_BODY_CHARS: usize = 1024;

static SENSITIVE_JSON_FIELD: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#""(password|password_confirm|old_password|new_password|password_hash|secret|token)"\s*:\s*"(?:[^"\\]|\\.)*""#,
    )
    .ok()
});

/// Middleware to log HTTP requests and responses with sensitive data redaction.
/// Note: This middleware does NOT create its own tracing span since `TraceLayer`
/// from tower-http already handles span creation.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);
    let headers_log = redact_headers(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %headers_log,
        "Incoming request"
    );

    let request = if tracing::enabled!(Level::DEBUG) {
        match log_json_body(request, &request_id).await {
            Ok(request) => request,
            Err(response) => return response,
        }
    } else {
        request
    };

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

/// Buffer a small JSON body, log it redacted, and hand back an equivalent request
async fn log_json_body(request: Request<Body>, request_id: &str) -> Result<Request<Body>, Response> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    let length = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    let Some(length) = length.filter(|len| is_json && *len <= MAX_LOGGED_BODY_BYTES) else {
        return Ok(request);
    };

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, length)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST.into_response())?;

    let text = String::from_utf8_lossy(&bytes);
    debug!(
        request_id = %request_id,
        body = %truncate_for_log(&redact_json_sensitive_fields(&text), MAX_LOGGED_BODY_CHARS),
        "Request body"
    );

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Redact sensitive headers for logging
fn redact_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .filter(|(name, _)| should_log_header(name.as_str()))
        .map(|(name, value)| {
            let value = if is_sensitive_header(name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            format!("{}={}", name.as_str(), value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "cookie" | "set-cookie" | "x-auth-token" | "proxy-authorization"
    )
}

fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "accept"
            | "user-agent"
            | "x-request-id"
            | "x-forwarded-for"
            | "authorization"
            | "cookie"
    )
}

/// Redact password-like values in a JSON string
pub fn redact_json_sensitive_fields(json: &str) -> String {
    match SENSITIVE_JSON_FIELD.as_ref() {
        Some(re) => re.replace_all(json, r#""$1":"[REDACTED]""#).to_string(),
        None => "[REDACTED]".to_string(),
    }
}

/// Truncate long strings for logging
pub fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((cut, _)) => format!(
            "{}...[truncated {} chars]",
            &s[..cut],
            s[cut..].chars().count()
        ),
    }
}
