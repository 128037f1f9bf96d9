//! Normalized request and response types
//!
//! Every backend provider speaks its own wire dialect; the engine deals
//! exclusively in these normalized shapes and leaves translation to the
//! egress adapters.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalized request structure that can be shaped into any provider's wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRequest {
    /// List of messages in the conversation
    pub messages: Vec<Message>,

    /// Optional system instruction
    pub system: Option<String>,

    /// Maximum number of tokens to generate
    pub max_output_tokens: Option<u32>,

    /// Sampling temperature (0.0 to 2.0)
    pub temperature: Option<f32>,

    /// Additional metadata, passed through opaquely
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl NormalizedRequest {
    /// Build a single-turn user request from document text.
    pub fn from_document(text: impl Into<String>) -> Self {
        Self {
            messages: vec![Message {
                role: Role::User,
                content: text.into(),
            }],
            system: None,
            max_output_tokens: None,
            temperature: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the output token limit.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    /// Total character length of system instruction plus all message content.
    pub fn content_chars(&self) -> usize {
        let system_len = self.system.as_deref().map(str::len).unwrap_or(0);
        system_len + self.messages.iter().map(|m| m.content.len()).sum::<usize>()
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Text content of the message
    pub content: String,
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Normalized response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedResponse {
    /// Text content of the provider's reply
    pub content: String,

    /// Tokens consumed by the prompt
    pub input_tokens: u32,

    /// Tokens produced in the completion
    pub output_tokens: u32,

    /// Cost of this call in USD, computed from the provider's per-token rate
    pub cost_usd: f64,

    /// Wall-clock latency of the provider call in milliseconds
    pub latency_ms: u64,

    /// Whether token counts were estimated by character-length heuristic
    /// rather than reported by the provider
    pub tokens_estimated: bool,

    /// Provider-specific metadata, passed through opaquely
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl NormalizedResponse {
    /// Combined input and output token count.
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}
