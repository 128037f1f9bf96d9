//! Provider registry
//!
//! Holds the validated provider catalogue. Construction fails fast on a
//! misconfigured catalogue so tier-coverage gaps surface at process start,
//! never mid-request. The registry is read-only after construction and is
//! shared across all concurrent requests without locking.

use lexroute_core::{Error, Result, catalog::ProviderSpec, types::ComplexityTier};
use std::collections::HashMap;
use tracing::info;

/// Validated, immutable provider catalogue.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    /// All providers, sorted by cost ascending
    providers: Vec<ProviderSpec>,
    /// Designated default provider per complexity tier
    tier_defaults: HashMap<ComplexityTier, String>,
    /// Index into `providers` of the largest-context provider
    overflow_index: usize,
    /// Index into `providers` of the highest-cost provider
    baseline_index: usize,
}

impl ProviderRegistry {
    /// Build and validate a registry.
    ///
    /// # Errors
    /// `Error::RegistryMisconfigured` if the catalogue is empty, any spec
    /// fails its own validation, ids collide, any tier has no candidate
    /// provider, or any tier default does not resolve to a provider
    /// serving that tier.
    pub fn new(
        mut providers: Vec<ProviderSpec>,
        tier_defaults: HashMap<ComplexityTier, String>,
    ) -> Result<Self> {
        if providers.is_empty() {
            return Err(Error::RegistryMisconfigured(
                "provider catalogue is empty".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for spec in &providers {
            spec.validate().map_err(Error::RegistryMisconfigured)?;
            if !seen.insert(spec.id.clone()) {
                return Err(Error::RegistryMisconfigured(format!(
                    "duplicate provider id '{}'",
                    spec.id
                )));
            }
        }

        // Cheapest-suitable-first ordering for tier candidate lists
        providers.sort_by(|a, b| a.cost_per_1k_tokens.total_cmp(&b.cost_per_1k_tokens));

        for tier in ComplexityTier::ALL {
            if !providers.iter().any(|p| p.serves(tier)) {
                return Err(Error::RegistryMisconfigured(format!(
                    "no provider configured for tier '{}'",
                    tier
                )));
            }

            let default_id = tier_defaults.get(&tier).ok_or_else(|| {
                Error::RegistryMisconfigured(format!("no default provider for tier '{}'", tier))
            })?;
            let default = providers.iter().find(|p| &p.id == default_id).ok_or_else(|| {
                Error::RegistryMisconfigured(format!(
                    "default provider '{}' for tier '{}' is not in the catalogue",
                    default_id, tier
                ))
            })?;
            if !default.serves(tier) {
                return Err(Error::RegistryMisconfigured(format!(
                    "default provider '{}' does not serve tier '{}'",
                    default_id, tier
                )));
            }
        }

        let overflow_index = providers
            .iter()
            .enumerate()
            .max_by_key(|(_, p)| p.max_context_tokens)
            .map(|(i, _)| i)
            .unwrap_or(0);

        let baseline_index = providers
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.cost_per_1k_tokens.total_cmp(&b.cost_per_1k_tokens))
            .map(|(i, _)| i)
            .unwrap_or(0);

        info!(
            providers = providers.len(),
            overflow = %providers[overflow_index].id,
            baseline = %providers[baseline_index].id,
            "provider registry validated"
        );

        Ok(Self {
            providers,
            tier_defaults,
            overflow_index,
            baseline_index,
        })
    }

    /// Look up a provider by id.
    pub fn provider(&self, id: &str) -> Option<&ProviderSpec> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Candidate providers for a tier, cheapest first.
    pub fn providers_for_tier(&self, tier: ComplexityTier) -> Vec<&ProviderSpec> {
        self.providers.iter().filter(|p| p.serves(tier)).collect()
    }

    /// The designated default provider for a tier.
    pub fn default_for_tier(&self, tier: ComplexityTier) -> &ProviderSpec {
        // Validated at construction: the id resolves
        let id = &self.tier_defaults[&tier];
        self.providers
            .iter()
            .find(|p| &p.id == id)
            .unwrap_or(&self.providers[self.overflow_index])
    }

    /// The provider with the largest context window, used when estimated
    /// tokens exceed every tier-appropriate provider's limit.
    pub fn overflow_provider(&self) -> &ProviderSpec {
        &self.providers[self.overflow_index]
    }

    /// The highest-cost provider, the reference point for savings.
    pub fn baseline_provider(&self) -> &ProviderSpec {
        &self.providers[self.baseline_index]
    }

    /// All providers, sorted by cost ascending.
    pub fn providers(&self) -> &[ProviderSpec] {
        &self.providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexroute_core::catalog::{QualityTier, SpeedTier};

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

    fn full_catalogue() -> (Vec<ProviderSpec>, HashMap<ComplexityTier, String>) {
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
        (providers, defaults)
    }

    #[test]
    fn test_valid_catalogue_builds() {
        let (providers, defaults) = full_catalogue();
        let registry = ProviderRegistry::new(providers, defaults).unwrap();
        assert_eq!(registry.providers().len(), 3);
    }

    #[test]
    fn test_empty_catalogue_rejected() {
        let result = ProviderRegistry::new(vec![], HashMap::new());
        assert!(matches!(result, Err(Error::RegistryMisconfigured(_))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let (mut providers, defaults) = full_catalogue();
        providers.push(spec("fast-draft", 1.0, 8_000, &[ComplexityTier::Simple]));
        let result = ProviderRegistry::new(providers, defaults);
        assert!(matches!(result, Err(Error::RegistryMisconfigured(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_missing_tier_coverage_rejected() {
        let providers = vec![spec("only", 1.0, 8_000, &[ComplexityTier::Simple])];
        let defaults = HashMap::from([(ComplexityTier::Simple, "only".to_string())]);
        let result = ProviderRegistry::new(providers, defaults);
        assert!(matches!(result, Err(Error::RegistryMisconfigured(msg)) if msg.contains("tier")));
    }

    #[test]
    fn test_unresolvable_default_rejected() {
        let (providers, mut defaults) = full_catalogue();
        defaults.insert(ComplexityTier::Simple, "ghost".to_string());
        let result = ProviderRegistry::new(providers, defaults);
        assert!(matches!(result, Err(Error::RegistryMisconfigured(msg)) if msg.contains("ghost")));
    }

    #[test]
    fn test_default_must_serve_its_tier() {
        let (providers, mut defaults) = full_catalogue();
        // fast-draft does not serve Specialized
        defaults.insert(ComplexityTier::Specialized, "fast-draft".to_string());
        let result = ProviderRegistry::new(providers, defaults);
        assert!(matches!(result, Err(Error::RegistryMisconfigured(msg)) if msg.contains("serve")));
    }

    #[test]
    fn test_invalid_spec_rejected() {
        let (mut providers, defaults) = full_catalogue();
        providers.push(spec("freebie", 0.0, 8_000, &[ComplexityTier::Simple]));
        let result = ProviderRegistry::new(providers, defaults);
        assert!(result.is_err());
    }

    #[test]
    fn test_overflow_is_largest_window() {
        let (providers, defaults) = full_catalogue();
        let registry = ProviderRegistry::new(providers, defaults).unwrap();
        assert_eq!(registry.overflow_provider().id, "deep-review");
    }

    #[test]
    fn test_baseline_is_most_expensive() {
        let (providers, defaults) = full_catalogue();
        let registry = ProviderRegistry::new(providers, defaults).unwrap();
        assert_eq!(registry.baseline_provider().id, "deep-review");
    }

    #[test]
    fn test_tier_candidates_ordered_cheapest_first() {
        let (providers, defaults) = full_catalogue();
        let registry = ProviderRegistry::new(providers, defaults).unwrap();
        let candidates = registry.providers_for_tier(ComplexityTier::Medium);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "fast-draft");
        assert_eq!(candidates[1].id, "balanced");
    }

    #[test]
    fn test_lookup_by_id() {
        let (providers, defaults) = full_catalogue();
        let registry = ProviderRegistry::new(providers, defaults).unwrap();
        assert!(registry.provider("balanced").is_some());
        assert!(registry.provider("ghost").is_none());
    }

    #[test]
    fn test_default_for_tier() {
        let (providers, defaults) = full_catalogue();
        let registry = ProviderRegistry::new(providers, defaults).unwrap();
        assert_eq!(registry.default_for_tier(ComplexityTier::Simple).id, "fast-draft");
        assert_eq!(
            registry.default_for_tier(ComplexityTier::Specialized).id,
            "deep-review"
        );
    }
}
