//! Routing decision type

use lexroute_analysis::ComplexityAnalysis;
use serde::{Deserialize, Serialize};

/// The outcome of routing one request: selected provider, the reasoning
/// trail that led there, and the token/cost estimates.
///
/// Created once per request and never mutated; the caller forwards it to
/// the dispatch layer and, after a successful call, to the usage
/// accountant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Catalogue id of the selected provider
    pub selected_provider_id: String,

    /// Human-readable reasoning trail
    pub reasoning: String,

    /// The complexity analysis that drove the selection
    pub complexity: ComplexityAnalysis,

    /// Estimated prompt tokens for this request
    pub estimated_input_tokens: u32,

    /// Output tokens reserved for the response
    pub estimated_output_tokens: u32,

    /// Estimated cost on the selected provider, USD
    pub estimated_cost_usd: f64,

    /// Cost if the baseline (most expensive) provider served the same
    /// token estimate, USD
    pub baseline_cost_usd: f64,

    /// `baseline_cost_usd - estimated_cost_usd`; zero when the selected
    /// provider is itself the baseline
    pub savings_usd: f64,
}

impl RoutingDecision {
    /// Combined input and output token estimate.
    pub fn estimated_total_tokens(&self) -> u32 {
        self.estimated_input_tokens
            .saturating_add(self.estimated_output_tokens)
    }
}
