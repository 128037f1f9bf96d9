//! Anthropic-dialect egress connector

use crate::{
    EgressError, Result,
    client::{HttpClientConfig, create_client, retry_after_secs},
};
use lexroute_core::{
    normalized::{NormalizedRequest, NormalizedResponse, Role},
    provider::ProviderClient,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Anthropic connector configuration
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: https://api.anthropic.com)
    pub base_url: String,

    /// API version header (default: 2023-06-01)
    pub api_version: String,

    /// HTTP client configuration
    pub client_config: HttpClientConfig,
}

impl AnthropicConfig {
    /// Create a new configuration
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            client_config: HttpClientConfig::default(),
        }
    }

    /// Set the base URL (for custom endpoints)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }
}

/// Anthropic-dialect connector for one catalogue provider
pub struct AnthropicClient {
    provider_id: String,
    model: String,
    cost_per_1k_tokens: f64,
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicClient {
    /// Create a new connector bound to a catalogue provider.
    pub fn new(
        provider_id: impl Into<String>,
        model: impl Into<String>,
        cost_per_1k_tokens: f64,
        config: AnthropicConfig,
    ) -> Result<Self> {
        let client = create_client(&config.client_config)?;
        Ok(Self {
            provider_id: provider_id.into(),
            model: model.into(),
            cost_per_1k_tokens,
            config,
            client,
        })
    }

    async fn send_raw(&self, request: &NormalizedRequest) -> Result<NormalizedResponse> {
        let wire = to_anthropic_request(request, &self.model);
        let started = Instant::now();

        debug!(provider = %self.provider_id, model = %self.model, "sending Anthropic request");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .header("Content-Type", "application/json")
            .json(&wire)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EgressError::Timeout(self.config.client_config.timeout_secs)
                } else {
                    EgressError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            if status_code == 429 {
                return Err(EgressError::RateLimitExceeded {
                    retry_after_secs: retry_after_secs(&response),
                });
            }
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(EgressError::Provider {
                status_code,
                message: body,
            });
        }

        let parsed = response.json::<AnthropicResponse>().await.map_err(|e| {
            EgressError::Parse(format!("Failed to parse Anthropic response: {}", e))
        })?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let content: String = parsed
            .content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect();

        let total_tokens = parsed.usage.input_tokens + parsed.usage.output_tokens;
        let cost_usd = (total_tokens as f64 / 1000.0) * self.cost_per_1k_tokens;

        let mut metadata = HashMap::new();
        metadata.insert("dialect".to_string(), serde_json::json!("anthropic"));
        metadata.insert(
            "provider_response_id".to_string(),
            serde_json::json!(parsed.id),
        );
        metadata.insert("model".to_string(), serde_json::json!(parsed.model));
        if let Some(stop_reason) = &parsed.stop_reason {
            metadata.insert("stop_reason".to_string(), serde_json::json!(stop_reason));
        }

        Ok(NormalizedResponse {
            content,
            input_tokens: parsed.usage.input_tokens,
            output_tokens: parsed.usage.output_tokens,
            cost_usd,
            latency_ms,
            // The messages API always reports exact usage
            tokens_estimated: false,
            metadata,
        })
    }
}

#[async_trait::async_trait]
impl ProviderClient for AnthropicClient {
    async fn invoke(&self, request: NormalizedRequest) -> lexroute_core::Result<NormalizedResponse> {
        self.send_raw(&request)
            .await
            .map_err(|e| e.into_core(&self.provider_id))
    }

    fn id(&self) -> &str {
        &self.provider_id
    }
}

/// Default output budget when the caller did not set one
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

fn to_anthropic_request(request: &NormalizedRequest, model: &str) -> AnthropicRequest {
    // System-role messages fold into the system field; the messages API
    // accepts only user/assistant turns
    let mut system_parts: Vec<&str> = Vec::new();
    if let Some(system) = request.system.as_deref() {
        system_parts.push(system);
    }

    let mut messages = Vec::new();
    for message in &request.messages {
        match message.role {
            Role::System => system_parts.push(&message.content),
            Role::User => messages.push(AnthropicMessage {
                role: "user".to_string(),
                content: message.content.clone(),
            }),
            Role::Assistant => messages.push(AnthropicMessage {
                role: "assistant".to_string(),
                content: message.content.clone(),
            }),
        }
    }

    AnthropicRequest {
        model: model.to_string(),
        max_tokens: request
            .max_output_tokens
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        messages,
        system: if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        },
        temperature: request.temperature,
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    id: String,
    model: String,
    content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}
