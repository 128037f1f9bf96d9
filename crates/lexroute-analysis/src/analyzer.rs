//! Document complexity analyzer
//!
//! Scores a document across four dimensions (keywords, structure, size,
//! metadata) and classifies it into a [`ComplexityTier`]. Classification
//! is first-rule-wins: a single Specialized keyword always escalates to
//! Specialized regardless of total score, so one strong legal-domain
//! signal is never diluted by document length.

use crate::config::AnalyzerConfig;
use lexroute_core::types::{ComplexityTier, DocumentMetadata};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

static MONETARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(r\$|us\$|\$|€)\s*\d[\d.,]*").expect("valid monetary pattern")
});

static CLAUSE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)(cláusula\s+\S+|^\s*\d+(\.\d+)+)").expect("valid clause pattern")
});

static LEGAL_CITATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(lei\s+n[ºo°.]?\s*[\d./-]+|art(igo)?\.?\s*\d+|§\s*\d+|inciso\s+[ivxlcdm]+)")
        .expect("valid citation pattern")
});

static PARTY_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(contratante|contratad[ao]|interveniente|anuente|fiador|testemunha)")
        .expect("valid party pattern")
});

/// Keyword match counts per tier, used by the classification rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierMatches {
    pub specialized: u32,
    pub complex: u32,
    pub medium: u32,
    pub simple: u32,
}

/// Result of analyzing one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    /// Assigned complexity tier
    pub tier: ComplexityTier,

    /// Sum of all dimension scores
    pub total_score: u32,

    /// Score contribution per named dimension
    pub dimension_scores: BTreeMap<String, u32>,

    /// Keyword match counts per tier
    pub keyword_matches: TierMatches,

    /// Human-readable explanation of which signals fired.
    /// Bounded per tier; explanatory only, never authoritative.
    pub matched_signals: Vec<String>,
}

impl ComplexityAnalysis {
    /// Short reasoning string naming the top contributing dimensions.
    pub fn summary(&self) -> String {
        let mut dimensions: Vec<(&str, u32)> = self
            .dimension_scores
            .iter()
            .filter(|(_, score)| **score > 0)
            .map(|(name, score)| (name.as_str(), *score))
            .collect();
        dimensions.sort_by(|a, b| b.1.cmp(&a.1));

        if dimensions.is_empty() {
            return format!("tier={}: no complexity signals", self.tier);
        }

        let top: Vec<String> = dimensions
            .iter()
            .take(3)
            .map(|(name, score)| format!("{}={}", name, score))
            .collect();
        format!("tier={} ({})", self.tier, top.join(", "))
    }
}

/// Stateless complexity analyzer.
///
/// Pure and deterministic: identical inputs always produce identical
/// analyses, so concurrent use needs no coordination.
#[derive(Debug, Clone, Default)]
pub struct ComplexityAnalyzer {
    config: AnalyzerConfig,
}

impl ComplexityAnalyzer {
    /// Create an analyzer with the given configuration.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Access the active configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a document. Never fails: malformed or empty input yields
    /// the lowest tier with a zero score.
    pub fn analyze(
        &self,
        text: &str,
        metadata: Option<&DocumentMetadata>,
    ) -> ComplexityAnalysis {
        if text.trim().is_empty() {
            return self.trivial_analysis();
        }

        let lowered = text.to_lowercase();
        let word_count = lowered.split_whitespace().count();
        let mut signals = Vec::new();

        let (keyword_score, keyword_matches) = self.score_keywords(&lowered, &mut signals);
        let structure_score = self.score_structure(text, &mut signals);
        let size_score = self.score_size(word_count, &mut signals);
        let metadata_score = self.score_metadata(metadata, &mut signals);

        let total_score = keyword_score + structure_score + size_score + metadata_score;

        let mut dimension_scores = BTreeMap::new();
        dimension_scores.insert("keywords".to_string(), keyword_score);
        dimension_scores.insert("structure".to_string(), structure_score);
        dimension_scores.insert("size".to_string(), size_score);
        dimension_scores.insert("metadata".to_string(), metadata_score);

        let tier = self.classify(total_score, &keyword_matches);

        debug!(
            %tier,
            total_score,
            keyword_score,
            structure_score,
            size_score,
            metadata_score,
            word_count,
            "classified document"
        );

        ComplexityAnalysis {
            tier,
            total_score,
            dimension_scores,
            keyword_matches,
            matched_signals: signals,
        }
    }

    fn trivial_analysis(&self) -> ComplexityAnalysis {
        let mut dimension_scores = BTreeMap::new();
        for name in ["keywords", "structure", "size", "metadata"] {
            dimension_scores.insert(name.to_string(), 0);
        }
        ComplexityAnalysis {
            tier: ComplexityTier::Simple,
            total_score: 0,
            dimension_scores,
            keyword_matches: TierMatches::default(),
            matched_signals: vec!["empty or trivial input".to_string()],
        }
    }

    fn score_keywords(&self, lowered: &str, signals: &mut Vec<String>) -> (u32, TierMatches) {
        let weights = &self.config.keyword_weights;
        let sets = &self.config.keywords;

        let tiers: [(&str, &[String], u32); 4] = [
            ("specialized", &sets.specialized, weights.specialized),
            ("complex", &sets.complex, weights.complex),
            ("medium", &sets.medium, weights.medium),
            ("simple", &sets.simple, weights.simple),
        ];

        let mut matches = TierMatches::default();
        let mut score = 0u32;

        for (tier_name, keywords, weight) in tiers {
            let mut recorded = 0usize;
            let mut count = 0u32;
            for keyword in keywords {
                if lowered.contains(keyword.as_str()) {
                    count += 1;
                    score += weight;
                    // Signal cap bounds the explanation, not the score
                    if recorded < self.config.max_signals_per_tier {
                        signals.push(format!("keyword[{}]: {}", tier_name, keyword));
                        recorded += 1;
                    }
                }
            }
            match tier_name {
                "specialized" => matches.specialized = count,
                "complex" => matches.complex = count,
                "medium" => matches.medium = count,
                _ => matches.simple = count,
            }
        }

        (score, matches)
    }

    fn score_structure(&self, text: &str, signals: &mut Vec<String>) -> u32 {
        let cap = self.config.structural_cap;
        let categories: [(&str, &Lazy<Regex>); 4] = [
            ("monetary amounts", &MONETARY),
            ("clause markers", &CLAUSE_MARKER),
            ("legal citations", &LEGAL_CITATION),
            ("party markers", &PARTY_MARKER),
        ];

        let mut score = 0u32;
        for (label, pattern) in categories {
            let count = pattern.find_iter(text).count() as u32;
            if count > 0 {
                // Per-category cap keeps repeated boilerplate from
                // inflating the score without bound
                let contribution = count.min(cap);
                score += contribution;
                signals.push(format!("structure: {} {}", count, label));
            }
        }
        score
    }

    fn score_size(&self, word_count: usize, signals: &mut Vec<String>) -> u32 {
        for step in &self.config.size_steps {
            if word_count >= step.min_words {
                signals.push(format!("size: {} words", word_count));
                return step.score;
            }
        }
        0
    }

    fn score_metadata(
        &self,
        metadata: Option<&DocumentMetadata>,
        signals: &mut Vec<String>,
    ) -> u32 {
        let Some(metadata) = metadata else {
            return 0;
        };

        let mut score = 0u32;

        if let Some(value) = metadata.declared_value_usd {
            for step in &self.config.value_steps {
                if value >= step.min_usd {
                    score += step.score;
                    signals.push(format!("metadata: declared value US$ {:.0}", value));
                    break;
                }
            }
        }

        if let Some(months) = metadata.declared_duration_months {
            for step in &self.config.duration_steps {
                if months >= step.min_months {
                    score += step.score;
                    signals.push(format!("metadata: duration {} months", months));
                    break;
                }
            }
        }

        score
    }

    fn classify(&self, total_score: u32, matches: &TierMatches) -> ComplexityTier {
        let thresholds = &self.config.thresholds;

        // First rule wins; a Specialized keyword always escalates
        if matches.specialized >= 1 || total_score >= thresholds.specialized {
            ComplexityTier::Specialized
        } else if matches.complex >= 2 || total_score >= thresholds.complex {
            ComplexityTier::Complex
        } else if matches.medium >= 2 || total_score >= thresholds.medium {
            ComplexityTier::Medium
        } else {
            ComplexityTier::Simple
        }
    }
}
