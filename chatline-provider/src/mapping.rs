//! Request/response mapping between chatline-types and the proxy's JSON format.

use chatline_types::{ChatMessage, ChatRequest, ChatResponse, ProviderError, Role};
use serde_json::Value;

use crate::config::ProxyConfig;

/// Reply used when a successful response carries no message text.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process that.";

/// Convert a [`ChatRequest`] into the proxy's JSON body.
///
/// Unset request fields take their values from `config`. The returned value
/// does **not** include `"stream"`; callers add that key.
#[must_use]
pub fn to_api_request(req: &ChatRequest, config: &ProxyConfig) -> Value {
    let model = if req.model.is_empty() {
        config.model.as_str()
    } else {
        req.model.as_str()
    };

    // Reasoning is display-only and never sent back upstream
    let messages: Vec<Value> = req
        .messages
        .iter()
        .map(|m| {
            serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            })
        })
        .collect();

    serde_json::json!({
        "messages": messages,
        "model": model,
        "max_tokens": req.max_tokens.unwrap_or(config.max_tokens),
        "temperature": req.temperature.unwrap_or(config.temperature),
    })
}

/// Parse a non-streaming response body.
///
/// An `error` object is an upstream failure. A body without
/// `choices[0].message.content` yields [`FALLBACK_REPLY`].
pub fn from_api_response(json: &Value) -> Result<ChatResponse, ProviderError> {
    if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
        return Err(ProviderError::Upstream(error_message(error)));
    }

    let message = &json["choices"][0]["message"];
    let content = message["content"].as_str().unwrap_or_else(|| {
        tracing::debug!("response has no message content; using fallback reply");
        FALLBACK_REPLY
    });

    let mut reply = ChatMessage {
        role: Role::Assistant,
        content: content.to_string(),
        reasoning: None,
    };
    if let Some(reasoning) = message["reasoning_content"].as_str() {
        reply = reply.with_reasoning(reasoning);
    }

    Ok(ChatResponse {
        id: json["id"].as_str().map(str::to_string),
        model: json["model"].as_str().map(str::to_string),
        message: reply,
    })
}

/// Text of an `error` value: its `message` field, the string itself, or
/// the raw JSON.
pub(crate) fn error_message(error: &Value) -> String {
    error["message"]
        .as_str()
        .or_else(|| error.as_str())
        .map_or_else(|| error.to_string(), str::to_string)
}
