//! Proxy API client struct and builder.

use std::future::Future;
use std::time::Duration;

use chatline_types::{ChatRequest, ChatResponse, Provider, ProviderError, StreamHandle};

use crate::config::{ProxyConfig, duration_to_millis};
use crate::error::{map_http_status, map_reqwest_error};
use crate::mapping::{from_api_response, to_api_request};
use crate::streaming::stream_completion;

/// Client for the hosted LLM proxy chat completions API.
///
/// Holds one shared `reqwest::Client`, so every request made through the
/// same `ProxyClient` reuses its connection pool. Implements [`Provider`].
///
/// # Example
///
/// ```no_run
/// use chatline_provider::ProxyClient;
///
/// let client = ProxyClient::new("api-key")
///     .client_id("client-id")
///     .model("claude-3-5-sonnet-20241022")
///     .base_url("https://monica.im");
/// ```
pub struct ProxyClient {
    /// Sent as `X-Api-Key`.
    pub(crate) api_key: String,
    /// Sent as `X-Client-Id` when set.
    pub(crate) client_id: Option<String>,
    /// Endpoint, defaults, and header values.
    pub(crate) config: ProxyConfig,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl ProxyClient {
    /// Create a new client with the given API key and default configuration.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client_id: None,
            config: ProxyConfig::default(),
            client: reqwest::Client::new(),
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: ProxyConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the client id sent as `X-Client-Id`.
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Override the default model.
    ///
    /// This is used when [`ChatRequest::model`] is empty.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a local mock server or a relay.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Override the `X-Client-Type` header.
    #[must_use]
    pub fn client_type(mut self, client_type: impl Into<String>) -> Self {
        self.config.client_type = client_type.into();
        self
    }

    /// Override the `X-Time-Zone` header.
    #[must_use]
    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.config.time_zone = time_zone.into();
        self
    }

    /// Override the non-streaming request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = duration_to_millis(timeout);
        self
    }

    /// Override the deadline for establishing a stream.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout_ms = duration_to_millis(timeout);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// A POST to the completions endpoint with the static headers attached.
    fn post(&self, body: &serde_json::Value) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(self.config.completions_url())
            .header("content-type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("x-client-type", &self.config.client_type)
            .header("x-time-zone", &self.config.time_zone);
        if let Some(client_id) = &self.client_id {
            builder = builder.header("x-client-id", client_id);
        }
        builder.json(body)
    }
}

impl Provider for ProxyClient {
    /// Send a non-streaming completion request.
    ///
    /// The whole exchange is bounded by the configured timeout.
    fn complete(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, ProviderError>> + Send {
        let mut body = to_api_request(&request, &self.config);
        body["stream"] = serde_json::Value::Bool(false);
        let timeout = self.config.timeout();
        let url = self.config.completions_url();
        let builder = self.post(&body).timeout(timeout);

        async move {
            tracing::debug!(url = %url, model = %body["model"], "sending completion request");

            let response = builder
                .send()
                .await
                .map_err(|e| map_reqwest_error(e, timeout))?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response
                .text()
                .await
                .map_err(|e| map_reqwest_error(e, timeout))?;

            if !status.is_success() {
                return Err(map_http_status(status, &headers, &response_text));
            }

            let json: serde_json::Value = serde_json::from_str(&response_text)
                .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON response: {e}")))?;

            from_api_response(&json)
        }
    }

    /// Send a streaming completion request.
    ///
    /// Connecting, the status line, and an error body together must finish
    /// within the connect timeout. The returned [`StreamHandle`] yields events
    /// as the body arrives, with no deadline on the body itself.
    fn complete_stream(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<StreamHandle, ProviderError>> + Send {
        let mut body = to_api_request(&request, &self.config);
        body["stream"] = serde_json::Value::Bool(true);
        let limit = self.config.connect_timeout();
        let url = self.config.completions_url();
        let builder = self.post(&body);

        async move {
            tracing::debug!(url = %url, model = %body["model"], "sending streaming completion request");

            let opened = async move {
                let response = builder
                    .send()
                    .await
                    .map_err(|e| map_reqwest_error(e, limit))?;

                let status = response.status();
                if !status.is_success() {
                    let headers = response.headers().clone();
                    let body_text = response
                        .text()
                        .await
                        .map_err(|e| map_reqwest_error(e, limit))?;
                    return Err(map_http_status(status, &headers, &body_text));
                }
                Ok::<_, ProviderError>(response)
            };

            let response = tokio::time::timeout(limit, opened).await.map_err(|_| {
                tracing::warn!(url = %url, limit_ms = limit.as_millis(), "stream did not open in time");
                ProviderError::Timeout(limit)
            })??;

            Ok(stream_completion(response))
        }
    }
}
