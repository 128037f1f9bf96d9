//! LexRoute Complexity Analysis
//!
//! This crate scores the structural and legal complexity of an incoming
//! document and classifies it into one of four ordered tiers:
//! - Lexical scoring against per-tier weighted keyword sets
//! - Structural scoring against capped regex marker categories
//! - Size scoring by word count
//! - Bonus scoring from caller-supplied metadata hints
//!
//! The analyzer is a pure function: deterministic, stateless, and
//! infallible. Every weight, cap, and threshold lives in [`AnalyzerConfig`]
//! so tuning never requires a code change.

pub mod analyzer;
pub mod config;

pub use analyzer::{ComplexityAnalysis, ComplexityAnalyzer, TierMatches};
pub use config::{
    AnalyzerConfig, DurationStep, KeywordSets, KeywordWeights, SizeStep, TierThresholds, ValueStep,
};
