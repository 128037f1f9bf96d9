//! Shared request classification types

use serde::{Deserialize, Serialize};

/// Complexity tier assigned to an incoming document.
///
/// Tiers form a total order: `Simple < Medium < Complex < Specialized`.
/// A tier is computed per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Simple,
    Medium,
    Complex,
    Specialized,
}

impl ComplexityTier {
    /// All tiers in ascending order.
    pub const ALL: [ComplexityTier; 4] = [
        ComplexityTier::Simple,
        ComplexityTier::Medium,
        ComplexityTier::Complex,
        ComplexityTier::Specialized,
    ];

    /// The next cheaper tier, saturating at `Simple`.
    pub fn downgraded(self) -> ComplexityTier {
        match self {
            ComplexityTier::Simple | ComplexityTier::Medium => ComplexityTier::Simple,
            ComplexityTier::Complex => ComplexityTier::Medium,
            ComplexityTier::Specialized => ComplexityTier::Complex,
        }
    }

    /// The next more capable tier, saturating at `Specialized`.
    pub fn upgraded(self) -> ComplexityTier {
        match self {
            ComplexityTier::Simple => ComplexityTier::Medium,
            ComplexityTier::Medium => ComplexityTier::Complex,
            ComplexityTier::Complex | ComplexityTier::Specialized => ComplexityTier::Specialized,
        }
    }
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComplexityTier::Simple => "simple",
            ComplexityTier::Medium => "medium",
            ComplexityTier::Complex => "complex",
            ComplexityTier::Specialized => "specialized",
        };
        f.write_str(name)
    }
}

/// How thorough the requested analysis should be.
///
/// Depth shifts the provider choice one tier down (`Quick`) or up
/// (`Detailed`) relative to the complexity tier's default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    Quick,
    #[default]
    Standard,
    Detailed,
}

/// Caller-supplied hints about the document under analysis.
///
/// All fields are optional; absent fields contribute nothing to the
/// complexity score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Declared contract value in USD.
    #[serde(default)]
    pub declared_value_usd: Option<f64>,

    /// Declared contract duration in months.
    #[serde(default)]
    pub declared_duration_months: Option<u32>,

    /// Free-form contract category label (informational only).
    #[serde(default)]
    pub contract_category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_total_order() {
        assert!(ComplexityTier::Simple < ComplexityTier::Medium);
        assert!(ComplexityTier::Medium < ComplexityTier::Complex);
        assert!(ComplexityTier::Complex < ComplexityTier::Specialized);
    }

    #[test]
    fn test_tier_downgrade_saturates() {
        assert_eq!(ComplexityTier::Specialized.downgraded(), ComplexityTier::Complex);
        assert_eq!(ComplexityTier::Complex.downgraded(), ComplexityTier::Medium);
        assert_eq!(ComplexityTier::Medium.downgraded(), ComplexityTier::Simple);
        assert_eq!(ComplexityTier::Simple.downgraded(), ComplexityTier::Simple);
    }

    #[test]
    fn test_tier_upgrade_saturates() {
        assert_eq!(ComplexityTier::Simple.upgraded(), ComplexityTier::Medium);
        assert_eq!(ComplexityTier::Complex.upgraded(), ComplexityTier::Specialized);
        assert_eq!(
            ComplexityTier::Specialized.upgraded(),
            ComplexityTier::Specialized
        );
    }

    #[test]
    fn test_tier_serde_lowercase() {
        let json = serde_json::to_string(&ComplexityTier::Specialized).unwrap();
        assert_eq!(json, r#""specialized""#);

        let tier: ComplexityTier = serde_json::from_str(r#""medium""#).unwrap();
        assert_eq!(tier, ComplexityTier::Medium);
    }

    #[test]
    fn test_depth_default_is_standard() {
        assert_eq!(AnalysisDepth::default(), AnalysisDepth::Standard);
    }

    #[test]
    fn test_metadata_defaults_empty() {
        let metadata: DocumentMetadata = serde_json::from_str("{}").unwrap();
        assert!(metadata.declared_value_usd.is_none());
        assert!(metadata.declared_duration_months.is_none());
        assert!(metadata.contract_category.is_none());
    }
}
