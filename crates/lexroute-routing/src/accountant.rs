//! Usage accounting
//!
//! Aggregates per-provider call counts, token totals, cost totals, and
//! cumulative savings versus the baseline provider. `record` is the only
//! contended mutation point in the engine: it takes one mutex for the
//! whole update so a concurrent `snapshot` never observes a torn set of
//! counters. The lock is never held across I/O.

use crate::decision::RoutingDecision;
use lexroute_core::normalized::NormalizedResponse;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// Accumulated usage for one provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderUsage {
    /// Completed calls routed to this provider
    pub request_count: u64,

    /// Combined input + output tokens across all calls
    pub total_tokens: u64,

    /// Calls whose token counts were heuristic estimates rather than
    /// provider-reported values. Kept separate so estimated and exact
    /// counts are never silently mixed.
    pub estimated_token_requests: u64,

    /// Total cost across all calls, USD
    pub total_cost_usd: f64,

    /// Total provider-call latency across all calls, milliseconds
    pub total_latency_ms: u64,
}

/// Immutable snapshot of the usage account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Per-provider accumulators
    pub per_provider: BTreeMap<String, ProviderUsage>,

    /// Completed requests across all providers
    pub total_requests: u64,

    /// Cumulative savings versus the baseline provider, USD
    pub total_savings_usd: f64,
}

#[derive(Debug, Default)]
struct UsageState {
    per_provider: BTreeMap<String, ProviderUsage>,
    total_requests: u64,
    total_savings_usd: f64,
}

/// Thread-safe usage aggregator, created once at process start and shared
/// across all concurrent requests.
#[derive(Debug, Default)]
pub struct UsageAccountant {
    state: Mutex<UsageState>,
}

impl UsageAccountant {
    /// Create an empty accountant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful, fully-accounted provider call.
    ///
    /// Atomic per call: all counters for this record become visible
    /// together. Failed or timed-out calls record nothing, since their
    /// actual cost and token usage are unknown.
    pub fn record(&self, decision: &RoutingDecision, response: &NormalizedResponse) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let usage = state
            .per_provider
            .entry(decision.selected_provider_id.clone())
            .or_default();
        usage.request_count += 1;
        usage.total_tokens += u64::from(response.total_tokens());
        if response.tokens_estimated {
            usage.estimated_token_requests += 1;
        }
        usage.total_cost_usd += response.cost_usd;
        usage.total_latency_ms += response.latency_ms;

        state.total_requests += 1;
        state.total_savings_usd += decision.savings_usd;

        debug!(
            provider = %decision.selected_provider_id,
            tokens = response.total_tokens(),
            cost_usd = response.cost_usd,
            savings_usd = decision.savings_usd,
            "recorded provider call"
        );
    }

    /// Immutable copy of the current counters.
    pub fn snapshot(&self) -> UsageReport {
        let state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        UsageReport {
            per_provider: state.per_provider.clone(),
            total_requests: state.total_requests,
            total_savings_usd: state.total_savings_usd,
        }
    }
}
