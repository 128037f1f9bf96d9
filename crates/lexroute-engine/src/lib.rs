//! LexRoute Engine
//!
//! Composition root for the routing engine:
//! - File-based configuration (provider catalogue, analyzer tuning,
//!   dispatch policy) with environment-variable secret resolution
//! - [`RoutingEngine`]: the pure decision service (no network)
//! - [`Dispatcher`]: the thin layer that invokes the selected provider
//!   under timeout and retry policy and records usage
//!
//! Keeping the decision service network-free makes routing trivially
//! testable; only the dispatcher touches I/O.

pub mod config;
pub mod dispatcher;
pub mod engine;

pub use config::{DispatchConfig, EngineConfig, ProviderDialect, ProviderEntry};
pub use dispatcher::{Dispatcher, RoutingResult};
pub use engine::RoutingEngine;
