//! Analyzer configuration
//!
//! All scoring knobs are serializable configuration with working defaults.
//! The default keyword sets target Brazilian legal documents, the corpus
//! this engine was built for; deployments override them per jurisdiction.

use serde::{Deserialize, Serialize};

/// Score thresholds at which a document escalates to a higher tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Total score at or above which a document is Specialized
    pub specialized: u32,
    /// Total score at or above which a document is Complex
    pub complex: u32,
    /// Total score at or above which a document is Medium
    pub medium: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            specialized: 30,
            complex: 18,
            medium: 8,
        }
    }
}

/// Weight applied to each keyword match, per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordWeights {
    pub specialized: u32,
    pub complex: u32,
    pub medium: u32,
    pub simple: u32,
}

impl Default for KeywordWeights {
    fn default() -> Self {
        Self {
            specialized: 4,
            complex: 3,
            medium: 2,
            simple: 1,
        }
    }
}

/// Per-tier keyword sets, matched as lowercase substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSets {
    pub specialized: Vec<String>,
    pub complex: Vec<String>,
    pub medium: Vec<String>,
    pub simple: Vec<String>,
}

impl Default for KeywordSets {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            specialized: owned(&[
                "previdência privada",
                "aposentadoria",
                "benefício previdenciário",
                "regime próprio de previdência",
                "recuperação judicial",
                "falência",
                "fusão e aquisição",
                "incorporação imobiliária",
                "propriedade intelectual",
                "arbitragem internacional",
            ]),
            complex: owned(&[
                "cláusula penal",
                "força maior",
                "caso fortuito",
                "rescisão antecipada",
                "responsabilidade solidária",
                "garantia real",
                "fiança bancária",
                "indenização",
                "multa contratual",
                "juros compensatórios",
            ]),
            medium: owned(&[
                "prazo de vigência",
                "renovação automática",
                "reajuste",
                "confidencialidade",
                "foro de eleição",
                "notificação prévia",
                "multa por atraso",
                "pagamento parcelado",
            ]),
            simple: owned(&[
                "contrato",
                "partes",
                "assinatura",
                "serviço",
                "pagamento",
                "prazo",
                "valor",
            ]),
        }
    }
}

/// One step of the word-count size score: first step whose `min_words`
/// the document reaches contributes `score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeStep {
    pub min_words: usize,
    pub score: u32,
}

/// One step of the declared-value bonus: first step whose `min_usd` the
/// declared value reaches contributes `score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueStep {
    pub min_usd: f64,
    pub score: u32,
}

/// One step of the declared-duration bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationStep {
    pub min_months: u32,
    pub score: u32,
}

/// Complete analyzer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub thresholds: TierThresholds,
    pub keyword_weights: KeywordWeights,
    pub keywords: KeywordSets,

    /// Maximum score contribution per structural marker category
    pub structural_cap: u32,

    /// Word-count steps, evaluated largest first
    pub size_steps: Vec<SizeStep>,

    /// Declared-value steps, evaluated largest first
    pub value_steps: Vec<ValueStep>,

    /// Declared-duration steps, evaluated largest first
    pub duration_steps: Vec<DurationStep>,

    /// Maximum matched-signal entries recorded per keyword tier.
    /// Bounds the explanation only; scores are unaffected.
    pub max_signals_per_tier: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            thresholds: TierThresholds::default(),
            keyword_weights: KeywordWeights::default(),
            keywords: KeywordSets::default(),
            structural_cap: 3,
            size_steps: vec![
                SizeStep { min_words: 5000, score: 3 },
                SizeStep { min_words: 2000, score: 2 },
                SizeStep { min_words: 500, score: 1 },
            ],
            value_steps: vec![
                ValueStep { min_usd: 1_000_000.0, score: 3 },
                ValueStep { min_usd: 100_000.0, score: 2 },
                ValueStep { min_usd: 10_000.0, score: 1 },
            ],
            duration_steps: vec![
                DurationStep { min_months: 60, score: 2 },
                DurationStep { min_months: 24, score: 1 },
            ],
            max_signals_per_tier: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds_are_ordered() {
        let thresholds = TierThresholds::default();
        assert!(thresholds.medium < thresholds.complex);
        assert!(thresholds.complex < thresholds.specialized);
    }

    #[test]
    fn test_default_weights_descend_with_tier() {
        let weights = KeywordWeights::default();
        assert_eq!(weights.specialized, 4);
        assert_eq!(weights.complex, 3);
        assert_eq!(weights.medium, 2);
        assert_eq!(weights.simple, 1);
    }

    #[test]
    fn test_default_steps_are_descending() {
        let config = AnalyzerConfig::default();
        assert!(
            config
                .size_steps
                .windows(2)
                .all(|pair| pair[0].min_words > pair[1].min_words)
        );
        assert!(
            config
                .value_steps
                .windows(2)
                .all(|pair| pair[0].min_usd > pair[1].min_usd)
        );
        assert!(
            config
                .duration_steps
                .windows(2)
                .all(|pair| pair[0].min_months > pair[1].min_months)
        );
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = AnalyzerConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: AnalyzerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = "thresholds:\n  specialized: 50\n  complex: 25\n  medium: 10\n";
        let config: AnalyzerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.thresholds.specialized, 50);
        // Everything else falls back to defaults
        assert_eq!(config.structural_cap, 3);
        assert_eq!(config.max_signals_per_tier, 3);
        assert!(!config.keywords.specialized.is_empty());
    }
}
