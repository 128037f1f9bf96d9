//! Routing engine
//!
//! The pure decision service: analyze → select → estimate. Makes no
//! network calls and mutates nothing, so it is safe to call concurrently
//! without coordination; the dispatcher performs the actual provider
//! invocation.

use lexroute_analysis::{AnalyzerConfig, ComplexityAnalyzer};
use lexroute_core::{
    Result,
    tokens::estimate_tokens,
    types::{AnalysisDepth, DocumentMetadata},
};
use lexroute_routing::{
    PolicyConfig, ProviderRegistry, RoutingDecision, RoutingPolicy, UsageAccountant, UsageReport,
};
use std::sync::Arc;
use tracing::info;

/// Composition of analyzer, policy, and accounting over one registry.
pub struct RoutingEngine {
    analyzer: ComplexityAnalyzer,
    policy: RoutingPolicy,
    registry: Arc<ProviderRegistry>,
    accountant: Arc<UsageAccountant>,
}

impl RoutingEngine {
    /// Create an engine over a validated registry.
    pub fn new(
        registry: Arc<ProviderRegistry>,
        analyzer_config: AnalyzerConfig,
        policy_config: PolicyConfig,
    ) -> Self {
        let policy = RoutingPolicy::new(registry.clone(), policy_config);
        Self {
            analyzer: ComplexityAnalyzer::new(analyzer_config),
            policy,
            registry,
            accountant: Arc::new(UsageAccountant::new()),
        }
    }

    /// The shared usage accountant, handed to whatever dispatches calls.
    pub fn accountant(&self) -> Arc<UsageAccountant> {
        self.accountant.clone()
    }

    /// The registry this engine routes against.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Route one document: score complexity, select a provider, and
    /// estimate tokens, cost, and savings versus the baseline provider.
    ///
    /// Pure and synchronous; the returned decision carries everything the
    /// dispatcher and the accountant need.
    pub fn route(
        &self,
        text: &str,
        metadata: Option<&DocumentMetadata>,
        depth: AnalysisDepth,
        forced_provider_id: Option<&str>,
    ) -> Result<RoutingDecision> {
        let complexity = self.analyzer.analyze(text, metadata);
        let estimated_input_tokens = estimate_tokens(text);

        let (provider, selection_reasoning) = self.policy.select(
            complexity.tier,
            depth,
            estimated_input_tokens,
            forced_provider_id,
        )?;

        let estimated_output_tokens = self.policy.reserved_output_tokens();
        let estimated_total = estimated_input_tokens.saturating_add(estimated_output_tokens);

        let estimated_cost_usd = provider.cost_for_tokens(estimated_total);
        let baseline_cost_usd = self
            .registry
            .baseline_provider()
            .cost_for_tokens(estimated_total);
        let savings_usd = baseline_cost_usd - estimated_cost_usd;

        let reasoning = format!("{}; {}", complexity.summary(), selection_reasoning);

        info!(
            provider = %provider.id,
            tier = %complexity.tier,
            estimated_input_tokens,
            estimated_cost_usd,
            savings_usd,
            "routed document"
        );

        Ok(RoutingDecision {
            selected_provider_id: provider.id,
            reasoning,
            complexity,
            estimated_input_tokens,
            estimated_output_tokens,
            estimated_cost_usd,
            baseline_cost_usd,
            savings_usd,
        })
    }

    /// Current usage counters.
    pub fn usage_report(&self) -> UsageReport {
        self.accountant.snapshot()
    }
}
