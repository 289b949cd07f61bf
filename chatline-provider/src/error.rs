//! Turning failed proxy exchanges into [`ProviderError`]s.

use std::time::Duration;

use chatline_types::ProviderError;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::mapping::error_message;

/// Classify a non-success response.
///
/// The error text is the proxy's `error.message` when the body is a JSON
/// error document, otherwise the trimmed body.
pub(crate) fn map_http_status(status: StatusCode, headers: &HeaderMap, body: &str) -> ProviderError {
    let detail = status_detail(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Authentication(detail),
        StatusCode::BAD_REQUEST => ProviderError::InvalidRequest(detail),
        StatusCode::NOT_FOUND => ProviderError::ModelNotFound(detail),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimit {
            retry_after: retry_after_header(headers).or_else(|| retry_after_hint(&detail)),
        },
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => ProviderError::ServiceUnavailable(detail),
        _ => ProviderError::InvalidRequest(format!("HTTP {status}: {detail}")),
    }
}

fn status_detail(body: &str) -> String {
    let body = body.trim();
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) if json.get("error").is_some_and(|e| !e.is_null()) => error_message(&json["error"]),
        Ok(json) if json["message"].is_string() => json["message"].as_str().unwrap_or(body).to_string(),
        _ => body.to_string(),
    }
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// A "retry after N" phrase in the error text, e.g. `Please retry after 20s`.
fn retry_after_hint(text: &str) -> Option<Duration> {
    let lower = text.to_ascii_lowercase();
    let rest = lower
        .split_once("retry after")
        .or_else(|| lower.split_once("retry-after"))?
        .1
        .trim_start_matches([' ', ':']);
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    rest[..end].parse::<u64>().ok().map(Duration::from_secs)
}

/// Map a transport failure. `limit` is the deadline that was in force.
pub(crate) fn map_reqwest_error(err: reqwest::Error, limit: Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(limit)
    } else {
        ProviderError::Network(Box::new(err))
    }
}
