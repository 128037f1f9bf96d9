//! Provider dispatch
//!
//! Thin layer between a routing decision and the wire: invokes the
//! selected provider client under a per-call deadline, retries transient
//! failures with exponential backoff, and records usage only for
//! successful, fully-accounted responses. Timed-out calls record nothing,
//! since their actual cost and token usage are unknown.

use crate::config::DispatchConfig;
use lexroute_core::{
    Error, Result,
    normalized::{NormalizedRequest, NormalizedResponse},
    provider::ProviderClient,
};
use lexroute_routing::{RoutingDecision, UsageAccountant};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A completed routed-and-invoked request.
#[derive(Debug, Clone)]
pub struct RoutingResult {
    /// The decision that selected the provider
    pub decision: RoutingDecision,

    /// The provider's normalized response
    pub response: NormalizedResponse,
}

/// Dispatches routing decisions to provider clients.
pub struct Dispatcher {
    clients: HashMap<String, Arc<dyn ProviderClient>>,
    accountant: Arc<UsageAccountant>,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create a dispatcher over the given clients and shared accountant.
    pub fn new(
        clients: HashMap<String, Arc<dyn ProviderClient>>,
        accountant: Arc<UsageAccountant>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            clients,
            accountant,
            config,
        }
    }

    /// Invoke the provider selected by `decision` and record usage on
    /// success.
    ///
    /// Transient failures (timeouts, rate limits, 5xx-class responses)
    /// are retried up to `max_retries` times with exponential backoff;
    /// deterministic failures surface immediately.
    pub async fn dispatch(
        &self,
        decision: RoutingDecision,
        request: NormalizedRequest,
    ) -> Result<RoutingResult> {
        let client = self
            .clients
            .get(&decision.selected_provider_id)
            .ok_or_else(|| Error::ProviderNotConfigured {
                provider_id: decision.selected_provider_id.clone(),
            })?;

        let request_id = uuid::Uuid::new_v4();
        let deadline = Duration::from_secs(self.config.timeout_secs);
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff_ms = self.config.retry_base_ms * 2u64.saturating_pow(attempt - 1);
                debug!(
                    %request_id,
                    attempt,
                    backoff_ms,
                    "retrying provider call"
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }

            let outcome = tokio::time::timeout(deadline, client.invoke(request.clone())).await;
            let error = match outcome {
                Ok(Ok(response)) => {
                    self.accountant.record(&decision, &response);
                    debug!(
                        %request_id,
                        provider = %decision.selected_provider_id,
                        attempt,
                        latency_ms = response.latency_ms,
                        "provider call succeeded"
                    );
                    return Ok(RoutingResult { decision, response });
                }
                Ok(Err(error)) => error,
                Err(_) => Error::ProviderTimeout {
                    provider_id: decision.selected_provider_id.clone(),
                    timeout_secs: self.config.timeout_secs,
                },
            };

            if error.is_retryable() && attempt < self.config.max_retries {
                warn!(
                    %request_id,
                    provider = %decision.selected_provider_id,
                    attempt = attempt + 1,
                    max_attempts = self.config.max_retries + 1,
                    %error,
                    "provider call failed, will retry"
                );
                last_error = Some(error);
            } else {
                warn!(
                    %request_id,
                    provider = %decision.selected_provider_id,
                    attempts = attempt + 1,
                    %error,
                    "provider call failed"
                );
                return Err(error);
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Config(
            "retry loop exited unexpectedly".to_string(),
        )))
    }

    /// The shared accountant this dispatcher records into.
    pub fn accountant(&self) -> Arc<UsageAccountant> {
        self.accountant.clone()
    }
}
