//! Client configuration.

use std::time::Duration;

use serde::Deserialize;

/// Default model used when none is specified on the request.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default proxy base URL.
pub const DEFAULT_BASE_URL: &str = "https://monica.im";

/// Path of the chat completions endpoint under the base URL.
pub const COMPLETIONS_PATH: &str = "/api/coder/llm_proxy/chat/completions";

/// Default `X-Client-Type` header value.
pub const DEFAULT_CLIENT_TYPE: &str = "streamlit";

/// Default `X-Time-Zone` header value.
pub const DEFAULT_TIME_ZONE: &str = "UTC;0";

const DEFAULT_MAX_TOKENS: u32 = 8192;
const DEFAULT_TEMPERATURE: f64 = 0.5;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Tunable settings for a [`ProxyClient`](crate::ProxyClient).
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// use chatline_provider::ProxyConfig;
///
/// let config: ProxyConfig = serde_json::from_str(r#"{"model": "gpt-4o"}"#).unwrap();
/// assert_eq!(config.model, "gpt-4o");
/// assert_eq!(config.max_tokens, 8192);
/// ```
///
/// Credentials are not part of the configuration; pass them to
/// [`ProxyClient::new`](crate::ProxyClient::new) and
/// [`ProxyClient::client_id`](crate::ProxyClient::client_id).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Base URL of the proxy (override for testing or self-hosted relays).
    pub base_url: String,
    /// Model used when a request leaves `model` empty.
    pub model: String,
    /// `max_tokens` used when a request leaves it unset.
    pub max_tokens: u32,
    /// `temperature` used when a request leaves it unset.
    pub temperature: f64,
    /// `X-Client-Type` header value.
    pub client_type: String,
    /// `X-Time-Zone` header value.
    pub time_zone: String,
    /// Whole-request timeout for non-streaming calls, in milliseconds.
    pub timeout_ms: u64,
    /// Deadline for a streaming call to connect and receive its response
    /// headers, in milliseconds. The body itself has no deadline.
    pub connect_timeout_ms: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            client_type: DEFAULT_CLIENT_TYPE.into(),
            time_zone: DEFAULT_TIME_ZONE.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl ProxyConfig {
    /// The non-streaming request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The deadline for establishing a stream.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Full URL of the chat completions endpoint.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}{COMPLETIONS_PATH}", self.base_url.trim_end_matches('/'))
    }
}

/// Whole milliseconds in `duration`, rounded up so a non-zero duration
/// never becomes zero.
pub(crate) fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
}
