//! Provider catalogue entries
//!
//! A [`ProviderSpec`] describes the cost and capability attributes of one
//! backend language-model provider. Specs are loaded at startup, validated
//! by the registry, and shared read-only across all concurrent requests.

use crate::types::ComplexityTier;
use serde::{Deserialize, Serialize};

/// Ordinal output-quality classification, informational only.
///
/// Quality tiers are never compared numerically; they feed human-readable
/// reasoning strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Basic,
    Good,
    Excellent,
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QualityTier::Basic => "basic",
            QualityTier::Good => "good",
            QualityTier::Excellent => "excellent",
        };
        f.write_str(name)
    }
}

/// Ordinal speed classification, informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    Fast,
    Moderate,
    Slow,
}

/// Cost and capability attributes of one backend provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Unique provider identifier
    pub id: String,

    /// Cost in USD per thousand billed tokens
    pub cost_per_1k_tokens: f64,

    /// Upper bound on combined input + output tokens per call
    pub max_context_tokens: u32,

    /// Output quality classification
    pub quality_tier: QualityTier,

    /// Response speed classification
    pub speed_tier: SpeedTier,

    /// Complexity tiers this provider may serve
    pub tiers: Vec<ComplexityTier>,
}

impl ProviderSpec {
    /// Cost in USD for the given combined token count.
    pub fn cost_for_tokens(&self, tokens: u32) -> f64 {
        (tokens as f64 / 1000.0) * self.cost_per_1k_tokens
    }

    /// Whether the given combined token count fits this provider's window.
    pub fn fits(&self, tokens: u32) -> bool {
        tokens <= self.max_context_tokens
    }

    /// Whether this provider is configured to serve the given tier.
    pub fn serves(&self, tier: ComplexityTier) -> bool {
        self.tiers.contains(&tier)
    }

    /// Validate the invariants a catalogue entry must uphold.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("provider id must not be empty".to_string());
        }
        if self.cost_per_1k_tokens <= 0.0 {
            return Err(format!(
                "provider '{}': cost_per_1k_tokens must be positive, got {}",
                self.id, self.cost_per_1k_tokens
            ));
        }
        if self.max_context_tokens == 0 {
            return Err(format!(
                "provider '{}': max_context_tokens must be positive",
                self.id
            ));
        }
        if self.tiers.is_empty() {
            return Err(format!(
                "provider '{}': must serve at least one complexity tier",
                self.id
            ));
        }
        Ok(())
    }
}
