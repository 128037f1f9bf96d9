//! LexRoute Routing Engine
//!
//! This crate provides the provider-selection logic for LexRoute:
//! - Provider registry with tier-coverage validation
//! - Routing policy (forced overrides, depth adjustment, overflow escalation)
//! - Routing decisions with cost and savings estimates
//! - Thread-safe usage accounting

pub mod accountant;
pub mod decision;
pub mod policy;
pub mod registry;

// Re-export commonly used types
pub use accountant::{ProviderUsage, UsageAccountant, UsageReport};
pub use decision::RoutingDecision;
pub use policy::{PolicyConfig, RoutingPolicy};
pub use registry::ProviderRegistry;
