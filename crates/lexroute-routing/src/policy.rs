//! Provider selection policy
//!
//! Maps a complexity tier (plus caller overrides, analysis depth, and the
//! request's token estimate) to a concrete provider from the registry.
//! Pure given its inputs and the registry snapshot: no network calls, no
//! mutation, unit-testable without mocking I/O.

use crate::registry::ProviderRegistry;
use lexroute_core::{
    Error, Result,
    catalog::ProviderSpec,
    types::{AnalysisDepth, ComplexityTier},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Policy tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Output tokens reserved when checking a provider's context window
    /// and when estimating response cost
    pub reserved_output_tokens: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            reserved_output_tokens: 4096,
        }
    }
}

/// Tier-to-provider selection policy.
#[derive(Debug, Clone)]
pub struct RoutingPolicy {
    registry: Arc<ProviderRegistry>,
    config: PolicyConfig,
}

impl RoutingPolicy {
    /// Create a policy over a validated registry.
    pub fn new(registry: Arc<ProviderRegistry>, config: PolicyConfig) -> Self {
        Self { registry, config }
    }

    /// Output tokens reserved per call.
    pub fn reserved_output_tokens(&self) -> u32 {
        self.config.reserved_output_tokens
    }

    /// Select a provider for the given tier, depth, and token estimate.
    ///
    /// Returns the chosen provider and a human-readable reasoning trail.
    ///
    /// # Errors
    /// - `Error::ProviderNotConfigured` when a forced id does not resolve
    /// - `Error::ContextWindowExceeded` when not even the overflow
    ///   provider can fit the estimate
    pub fn select(
        &self,
        tier: ComplexityTier,
        depth: AnalysisDepth,
        estimated_input_tokens: u32,
        forced_provider_id: Option<&str>,
    ) -> Result<(ProviderSpec, String)> {
        if let Some(forced) = forced_provider_id {
            let spec = self.registry.provider(forced).ok_or_else(|| {
                Error::ProviderNotConfigured {
                    provider_id: forced.to_string(),
                }
            })?;
            debug!(provider = %spec.id, "provider forced by caller");
            return Ok((spec.clone(), "forced by caller".to_string()));
        }

        let required_tokens =
            estimated_input_tokens.saturating_add(self.config.reserved_output_tokens);

        let mut chosen = self.registry.default_for_tier(tier);
        let mut reasoning = vec![format!("tier {} default '{}'", tier, chosen.id)];

        // Depth shifts the choice one tier, when the shifted provider
        // still fits the request
        let shifted_tier = match depth {
            AnalysisDepth::Quick => Some(tier.downgraded()),
            AnalysisDepth::Detailed => Some(tier.upgraded()),
            AnalysisDepth::Standard => None,
        };
        if let Some(target) = shifted_tier
            && target != tier
        {
            let candidate = self.registry.default_for_tier(target);
            if candidate.id != chosen.id && candidate.fits(required_tokens) {
                let direction = if target < tier { "downgraded" } else { "upgraded" };
                reasoning.push(format!(
                    "{:?} depth: {} to tier {} default '{}'",
                    depth, direction, target, candidate.id
                ));
                chosen = candidate;
            }
        }

        if !chosen.fits(required_tokens) {
            let overflow = self.registry.overflow_provider();
            if !overflow.fits(required_tokens) {
                return Err(Error::ContextWindowExceeded {
                    estimated_tokens: required_tokens,
                    largest_window: overflow.max_context_tokens,
                });
            }
            debug!(
                from = %chosen.id,
                to = %overflow.id,
                required_tokens,
                "context window exceeded, escalating to overflow provider"
            );
            chosen = overflow;
            reasoning.push("escalated: context window exceeded".to_string());
        }

        Ok((chosen.clone(), reasoning.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexroute_core::catalog::{QualityTier, SpeedTier};
    use std::collections::HashMap;

    fn spec(id: &str, cost: f64, window: u32, tiers: &[ComplexityTier]) -> ProviderSpec {
        ProviderSpec {
            id: id.to_string(),
            cost_per_1k_tokens: cost,
            max_context_tokens: window,
            quality_tier: QualityTier::Good,
            speed_tier: SpeedTier::Moderate,
            tiers: tiers.to_vec(),
        }
    }

    fn policy() -> RoutingPolicy {
        let providers = vec![
            spec(
                "fast-draft",
                0.5,
                16_000,
                &[ComplexityTier::Simple, ComplexityTier::Medium],
            ),
            spec(
                "balanced",
                3.0,
                128_000,
                &[ComplexityTier::Medium, ComplexityTier::Complex],
            ),
            spec(
                "deep-review",
                15.0,
                200_000,
                &[ComplexityTier::Complex, ComplexityTier::Specialized],
            ),
        ];
        let defaults = HashMap::from([
            (ComplexityTier::Simple, "fast-draft".to_string()),
            (ComplexityTier::Medium, "balanced".to_string()),
            (ComplexityTier::Complex, "balanced".to_string()),
            (ComplexityTier::Specialized, "deep-review".to_string()),
        ]);
        let registry = Arc::new(ProviderRegistry::new(providers, defaults).unwrap());
        RoutingPolicy::new(registry, PolicyConfig::default())
    }

    #[test]
    fn test_forced_provider_wins() {
        let (provider, reasoning) = policy()
            .select(
                ComplexityTier::Simple,
                AnalysisDepth::Standard,
                100,
                Some("deep-review"),
            )
            .unwrap();
        assert_eq!(provider.id, "deep-review");
        assert_eq!(reasoning, "forced by caller");
    }

    #[test]
    fn test_forced_unknown_provider_fails() {
        let result = policy().select(
            ComplexityTier::Simple,
            AnalysisDepth::Standard,
            100,
            Some("ghost"),
        );
        assert!(matches!(
            result,
            Err(Error::ProviderNotConfigured { provider_id }) if provider_id == "ghost"
        ));
    }

    #[test]
    fn test_tier_default_selected_for_standard_depth() {
        let (provider, reasoning) = policy()
            .select(ComplexityTier::Complex, AnalysisDepth::Standard, 1000, None)
            .unwrap();
        assert_eq!(provider.id, "balanced");
        assert!(reasoning.contains("tier complex default"));
    }

    #[test]
    fn test_quick_depth_downgrades_one_tier() {
        let (provider, reasoning) = policy()
            .select(ComplexityTier::Medium, AnalysisDepth::Quick, 1000, None)
            .unwrap();
        assert_eq!(provider.id, "fast-draft");
        assert!(reasoning.contains("downgraded"));
    }

    #[test]
    fn test_detailed_depth_upgrades_one_tier() {
        let (provider, reasoning) = policy()
            .select(ComplexityTier::Complex, AnalysisDepth::Detailed, 1000, None)
            .unwrap();
        assert_eq!(provider.id, "deep-review");
        assert!(reasoning.contains("upgraded"));
    }

    #[test]
    fn test_quick_downgrade_skipped_when_tokens_do_not_fit() {
        // 40k tokens do not fit fast-draft's 16k window, so the quick
        // downgrade is skipped and the Medium default stays
        let (provider, reasoning) = policy()
            .select(ComplexityTier::Medium, AnalysisDepth::Quick, 40_000, None)
            .unwrap();
        assert_eq!(provider.id, "balanced");
        assert!(!reasoning.contains("downgraded"));
    }

    #[test]
    fn test_depth_never_shifts_past_tier_bounds() {
        // Simple cannot downgrade further
        let (provider, _) = policy()
            .select(ComplexityTier::Simple, AnalysisDepth::Quick, 100, None)
            .unwrap();
        assert_eq!(provider.id, "fast-draft");

        // Specialized cannot upgrade further
        let (provider, _) = policy()
            .select(
                ComplexityTier::Specialized,
                AnalysisDepth::Detailed,
                100,
                None,
            )
            .unwrap();
        assert_eq!(provider.id, "deep-review");
    }

    #[test]
    fn test_overflow_escalation() {
        // 150k + 4096 reserved exceeds balanced's 128k window
        let (provider, reasoning) = policy()
            .select(ComplexityTier::Medium, AnalysisDepth::Standard, 150_000, None)
            .unwrap();
        assert_eq!(provider.id, "deep-review");
        assert!(reasoning.contains("escalated: context window exceeded"));
    }

    #[test]
    fn test_context_window_exceeded_even_for_overflow() {
        let result = policy().select(
            ComplexityTier::Medium,
            AnalysisDepth::Standard,
            500_000,
            None,
        );
        assert!(matches!(
            result,
            Err(Error::ContextWindowExceeded { largest_window, .. }) if largest_window == 200_000
        ));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let policy = policy();
        for _ in 0..5 {
            let (provider, reasoning) = policy
                .select(ComplexityTier::Complex, AnalysisDepth::Quick, 2_000, None)
                .unwrap();
            assert_eq!(provider.id, "balanced");
            assert!(reasoning.contains("tier complex default"));
        }
    }
}
