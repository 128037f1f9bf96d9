//! Provider client trait definition

use crate::{
    Result,
    normalized::{NormalizedRequest, NormalizedResponse},
};

/// Uniform call interface over heterogeneous backend providers.
///
/// One implementation exists per backend dialect. Adapters shape the
/// normalized request into the provider's wire format, classify failures
/// into the shared error taxonomy, and fill in token counts and cost on
/// the normalized response. Adapters never retry internally; retry and
/// timeout policy belong to the dispatch layer.
#[async_trait::async_trait]
pub trait ProviderClient: Send + Sync {
    /// Send a request and wait for the complete response.
    async fn invoke(&self, request: NormalizedRequest) -> Result<NormalizedResponse>;

    /// Catalogue identifier of the provider this client talks to.
    fn id(&self) -> &str;
}
