//! LexRoute Egress Connectors
//!
//! This crate provides connectors to downstream LLM providers:
//! - Anthropic-dialect connector (messages API)
//! - OpenAI-dialect connector (chat completions API)
//!
//! Each connector implements [`lexroute_core::provider::ProviderClient`]:
//! it shapes the normalized request into the provider's wire format,
//! classifies failures into the shared taxonomy, and fills in token
//! counts, cost, and latency on the normalized response. Connectors never
//! retry internally; retry and timeout policy belong to the dispatcher.

pub mod anthropic;
pub mod client;
pub mod error;
pub mod openai;

pub use error::{EgressError, Result};
