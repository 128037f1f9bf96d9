//! OpenAI-dialect egress connector
//!
//! Also used for OpenAI-compatible gateways. Some of those omit the
//! `usage` block, so this connector carries the character-length token
//! fallback and flags it on the response.

use crate::{
    EgressError, Result,
    client::{HttpClientConfig, create_client, retry_after_secs},
};
use lexroute_core::{
    normalized::{NormalizedRequest, NormalizedResponse, Role},
    provider::ProviderClient,
    tokens::estimate_tokens,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// OpenAI connector configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: https://api.openai.com/v1)
    pub base_url: String,

    /// HTTP client configuration
    pub client_config: HttpClientConfig,
}

impl OpenAiConfig {
    /// Create a new configuration
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            client_config: HttpClientConfig::default(),
        }
    }

    /// Set the base URL (for compatible gateways)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// OpenAI-dialect connector for one catalogue provider
pub struct OpenAiClient {
    provider_id: String,
    model: String,
    cost_per_1k_tokens: f64,
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    /// Create a new connector bound to a catalogue provider.
    pub fn new(
        provider_id: impl Into<String>,
        model: impl Into<String>,
        cost_per_1k_tokens: f64,
        config: OpenAiConfig,
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
        let wire = to_openai_request(request, &self.model);
        let started = Instant::now();

        debug!(provider = %self.provider_id, model = %self.model, "sending OpenAI request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
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

        let parsed = response
            .json::<OpenAiResponse>()
            .await
            .map_err(|e| EgressError::Parse(format!("Failed to parse OpenAI response: {}", e)))?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default();

        // Compatible gateways may omit usage; fall back to the character
        // heuristic and flag the estimate
        let (input_tokens, output_tokens, tokens_estimated) = match &parsed.usage {
            Some(usage) => (usage.prompt_tokens, usage.completion_tokens, false),
            None => {
                let input = estimate_tokens_for_request(request);
                let output = estimate_tokens(&content);
                (input, output, true)
            }
        };

        let total_tokens = input_tokens + output_tokens;
        let cost_usd = (total_tokens as f64 / 1000.0) * self.cost_per_1k_tokens;

        let mut metadata = HashMap::new();
        metadata.insert("dialect".to_string(), serde_json::json!("openai"));
        metadata.insert(
            "provider_response_id".to_string(),
            serde_json::json!(parsed.id),
        );
        metadata.insert("model".to_string(), serde_json::json!(parsed.model));
        if let Some(finish_reason) = parsed
            .choices
            .first()
            .and_then(|choice| choice.finish_reason.as_deref())
        {
            metadata.insert("finish_reason".to_string(), serde_json::json!(finish_reason));
        }

        Ok(NormalizedResponse {
            content,
            input_tokens,
            output_tokens,
            cost_usd,
            latency_ms,
            tokens_estimated,
            metadata,
        })
    }
}

#[async_trait::async_trait]
impl ProviderClient for OpenAiClient {
    async fn invoke(&self, request: NormalizedRequest) -> lexroute_core::Result<NormalizedResponse> {
        self.send_raw(&request)
            .await
            .map_err(|e| e.into_core(&self.provider_id))
    }

    fn id(&self) -> &str {
        &self.provider_id
    }
}

fn estimate_tokens_for_request(request: &NormalizedRequest) -> u32 {
    let mut tokens = 0u32;
    if let Some(system) = request.system.as_deref() {
        tokens += estimate_tokens(system);
    }
    for message in &request.messages {
        tokens += estimate_tokens(&message.content);
    }
    tokens
}

fn to_openai_request(request: &NormalizedRequest, model: &str) -> OpenAiRequest {
    let mut messages = Vec::new();
    if let Some(system) = request.system.as_deref() {
        messages.push(OpenAiMessage {
            role: "system".to_string(),
            content: system.to_string(),
        });
    }
    for message in &request.messages {
        let role = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        messages.push(OpenAiMessage {
            role: role.to_string(),
            content: message.content.clone(),
        });
    }

    OpenAiRequest {
        model: model.to_string(),
        messages,
        max_tokens: request.max_output_tokens,
        temperature: request.temperature,
    }
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    id: String,
    model: String,
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexroute_core::normalized::Message;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiClient {
        let config = OpenAiConfig::new("test-key").with_base_url(base_url);
        OpenAiClient::new("fast-draft", "gpt-test", 0.5, config).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = OpenAiConfig::new("key");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_request_shaping_prepends_system() {
        let request = NormalizedRequest {
            messages: vec![Message {
                role: Role::User,
                content: "Resuma o contrato.".to_string(),
            }],
            system: Some("Você é um analista jurídico.".to_string()),
            max_output_tokens: Some(512),
            temperature: None,
            metadata: HashMap::new(),
        };

        let wire = to_openai_request(&request, "gpt-test");
        assert_eq!(wire.messages.len(), 2);
        assert_eq!(wire.messages[0].role, "system");
        assert_eq!(wire.messages[1].role, "user");
        assert_eq!(wire.max_tokens, Some(512));
    }

    #[tokio::test]
    async fn test_invoke_success_with_exact_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-01",
                "model": "gpt-test",
                "choices": [{
                    "message": {"role": "assistant", "content": "Risco baixo."},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 400, "completion_tokens": 100, "total_tokens": 500}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client
            .invoke(NormalizedRequest::from_document("Analise o contrato."))
            .await
            .unwrap();

        assert_eq!(response.content, "Risco baixo.");
        assert_eq!(response.input_tokens, 400);
        assert_eq!(response.output_tokens, 100);
        assert!(!response.tokens_estimated);
        // 500 tokens at $0.50/1k
        assert!((response.cost_usd - 0.25).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_invoke_without_usage_estimates_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-02",
                "model": "gpt-test",
                "choices": [{
                    "message": {"role": "assistant", "content": "Sem riscos relevantes."},
                    "finish_reason": "stop"
                }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        // 20 chars -> 5 estimated input tokens
        let response = client
            .invoke(NormalizedRequest::from_document("a".repeat(20)))
            .await
            .unwrap();

        assert!(response.tokens_estimated);
        assert_eq!(response.input_tokens, 5);
        assert_eq!(response.output_tokens, estimate_tokens("Sem riscos relevantes."));
        assert!(response.cost_usd > 0.0);
    }

    #[tokio::test]
    async fn test_invoke_rate_limit_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .invoke(NormalizedRequest::from_document("texto"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            lexroute_core::Error::ProviderCall { retryable: true, .. }
        ));
    }

    #[tokio::test]
    async fn test_invoke_server_error_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .invoke(NormalizedRequest::from_document("texto"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            lexroute_core::Error::ProviderCall { retryable: true, .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_choices_yield_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-03",
                "model": "gpt-test",
                "choices": [],
                "usage": {"prompt_tokens": 10, "completion_tokens": 0, "total_tokens": 10}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client
            .invoke(NormalizedRequest::from_document("texto"))
            .await
            .unwrap();
        assert!(response.content.is_empty());
    }
}
