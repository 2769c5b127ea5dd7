//! Upstream chat API client.
//!
//! One request per call and nothing cached between calls: the caller passes
//! the whole conversation every time. Failures are returned as
//! [`ChatError::Upstream`] and never retried here.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::api::{ChatCompletionResponse, ChatMessage, ChatRequest};
use crate::core::builtins::{find_builtin_provider, AuthMode};
use crate::core::error::ChatError;
use crate::core::message::Message;

/// What the upstream API answered for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    /// Opaque tool-call metadata, exactly as the API returned it.
    pub tool_calls: Vec<Value>,
    pub finish_reason: Option<String>,
}

impl AssistantReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
            finish_reason: None,
        }
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends `history` followed by `new_text` as a user message.
    async fn send(&self, history: &[Message], new_text: &str) -> Result<AssistantReply, ChatError>;
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_key: String,
    pub provider_name: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: Option<String>,
    pub timeout: Duration,
}

/// OpenAI-compatible `chat/completions` client.
#[derive(Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    settings: ClientSettings,
}

impl HttpChatClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ChatError::upstream(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, settings })
    }

    fn build_request(&self, history: &[Message], new_text: &str) -> ChatRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if let Some(system) = self
            .settings
            .system_prompt
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.extend(history.iter().map(|msg| ChatMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }));
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: new_text.to_string(),
        });

        ChatRequest {
            model: self.settings.model.clone(),
            messages,
            stream: false,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn send(&self, history: &[Message], new_text: &str) -> Result<AssistantReply, ChatError> {
        let request = self.build_request(history, new_text);
        info!(
            model = %request.model,
            message_count = request.messages.len(),
            has_system = self.settings.system_prompt.is_some(),
            temperature = request.temperature,
            "Sending chat request"
        );
        for (index, message) in request.messages.iter().enumerate() {
            debug!(index, role = %message.role, content = %message.content, "Request message");
        }

        let url = construct_api_url(&self.settings.base_url, "chat/completions");
        let http_request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        let http_request =
            add_auth_headers(http_request, &self.settings.provider_name, &self.settings.api_key);

        let response = http_request.json(&request).send().await.map_err(|e| {
            error!(error = %e, model = %request.model, "Chat request failed");
            ChatError::upstream(format_api_error(&e.to_string()))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read chat response body");
            ChatError::upstream(format_api_error(&e.to_string()))
        })?;

        if !status.is_success() {
            error!(status = %status, body = %body, "Chat API returned an error status");
            return Err(ChatError::upstream(format_api_error(&body)));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, "Chat API returned an unreadable body");
            ChatError::upstream(format!("Unexpected response from chat API: {e}"))
        })?;

        let usage = parsed.usage.unwrap_or_default();
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::upstream("Chat API response contained no choices"))?;
        let reply = AssistantReply {
            text: choice.message.content.unwrap_or_default(),
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
            finish_reason: choice.finish_reason,
        };

        info!(
            model = parsed.model.as_deref().unwrap_or(&request.model),
            finish_reason = reply.finish_reason.as_deref().unwrap_or("unknown"),
            input_tokens = usage.prompt_tokens,
            output_tokens = usage.completion_tokens,
            tool_calls = reply.tool_calls.len(),
            "Received chat response"
        );
        debug!(content = %reply.text, "Response content");

        Ok(reply)
    }
}

/// Joins a base URL and endpoint with exactly one slash between them.
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Anthropic expects `x-api-key` plus a version header; every other provider
/// takes a bearer token.
pub fn add_auth_headers(
    request: reqwest::RequestBuilder,
    provider_name: &str,
    api_key: &str,
) -> reqwest::RequestBuilder {
    let auth = find_builtin_provider(provider_name)
        .map(|p| p.auth)
        .unwrap_or_default();
    match auth {
        AuthMode::Anthropic => request
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01"),
        AuthMode::Bearer => request.header("Authorization", format!("Bearer {api_key}")),
    }
}

fn extract_error_summary(value: &Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Formats an upstream error body for display, pretty-printing JSON.
pub fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error: <empty response>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            return match extract_error_summary(&json_value).filter(|s| !s.is_empty()) {
                Some(summary) => format!("API Error: {summary}\n{pretty_json}"),
                None => format!("API Error:\n{pretty_json}"),
            };
        }
    }

    format!("API Error: {trimmed}")
}
