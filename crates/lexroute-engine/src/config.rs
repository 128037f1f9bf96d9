//! Engine configuration
//!
//! Loads the provider catalogue, analyzer tuning, and dispatch policy
//! from a YAML or TOML file (format sniffed from the extension). API keys
//! support `$VAR_NAME` / `${VAR_NAME}` environment-variable references so
//! secrets stay out of config files.

use lexroute_analysis::AnalyzerConfig;
use lexroute_core::{
    Error, Result,
    catalog::ProviderSpec,
    provider::ProviderClient,
    types::ComplexityTier,
};
use lexroute_egress::{
    anthropic::{AnthropicClient, AnthropicConfig},
    client::HttpClientConfig,
    openai::{OpenAiClient, OpenAiConfig},
};
use lexroute_routing::{PolicyConfig, ProviderRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Wire dialect spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderDialect {
    /// OpenAI chat completions API (and compatible gateways)
    OpenAi,
    /// Anthropic messages API
    Anthropic,
}

/// One provider in the configuration file: catalogue attributes plus
/// connection details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    #[serde(flatten)]
    pub spec: ProviderSpec,

    /// Wire dialect for this provider
    pub dialect: ProviderDialect,

    /// Model identifier sent on the wire
    pub model: String,

    /// API key (supports env var syntax: $VAR_NAME or ${VAR_NAME})
    pub api_key: String,

    /// Base URL override (optional, defaults per dialect)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-provider request timeout in seconds (optional)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Dispatch-layer policy: per-call timeout and retry schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Per-call deadline in seconds
    pub timeout_secs: u64,

    /// Maximum retries after the first attempt, transient errors only
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds
    pub retry_base_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            max_retries: 3,
            retry_base_ms: 200,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Provider catalogue with connection details
    pub providers: Vec<ProviderEntry>,

    /// Designated default provider per complexity tier
    pub tier_defaults: HashMap<ComplexityTier, String>,

    /// Complexity analyzer tuning
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Provider selection tuning
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Dispatch timeout and retry policy
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl EngineConfig {
    /// Load a configuration file, resolving `~` and env-var references.
    ///
    /// The format is chosen by extension: `.toml` parses as TOML,
    /// anything else as YAML.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = expand_home(path.into())?;
        let contents = std::fs::read_to_string(&path)?;

        let mut config: EngineConfig = if path.extension().and_then(|s| s.to_str()) == Some("toml")
        {
            toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Invalid YAML: {}", e)))?
        };

        config.resolve_env_vars()?;
        info!(path = %path.display(), providers = config.providers.len(), "loaded engine config");
        Ok(config)
    }

    /// Resolve `$VAR_NAME` / `${VAR_NAME}` references in provider API keys.
    pub fn resolve_env_vars(&mut self) -> Result<()> {
        for entry in &mut self.providers {
            entry.api_key = resolve_env_var(&entry.api_key)?;
        }
        Ok(())
    }

    /// Build the validated provider registry from the catalogue.
    pub fn build_registry(&self) -> Result<ProviderRegistry> {
        let specs: Vec<ProviderSpec> = self.providers.iter().map(|e| e.spec.clone()).collect();
        ProviderRegistry::new(specs, self.tier_defaults.clone())
    }

    /// Build one wire client per configured provider.
    pub fn build_clients(&self) -> Result<HashMap<String, Arc<dyn ProviderClient>>> {
        let mut clients: HashMap<String, Arc<dyn ProviderClient>> = HashMap::new();
        for entry in &self.providers {
            let client_config = HttpClientConfig {
                timeout_secs: entry.timeout_secs.unwrap_or(self.dispatch.timeout_secs),
                ..HttpClientConfig::default()
            };

            let client: Arc<dyn ProviderClient> = match entry.dialect {
                ProviderDialect::Anthropic => {
                    let mut config = AnthropicConfig::new(entry.api_key.clone());
                    config.client_config = client_config;
                    if let Some(base_url) = &entry.base_url {
                        config = config.with_base_url(base_url.clone());
                    }
                    Arc::new(
                        AnthropicClient::new(
                            entry.spec.id.clone(),
                            entry.model.clone(),
                            entry.spec.cost_per_1k_tokens,
                            config,
                        )
                        .map_err(|e| Error::Config(e.to_string()))?,
                    )
                }
                ProviderDialect::OpenAi => {
                    let mut config = OpenAiConfig::new(entry.api_key.clone());
                    config.client_config = client_config;
                    if let Some(base_url) = &entry.base_url {
                        config = config.with_base_url(base_url.clone());
                    }
                    Arc::new(
                        OpenAiClient::new(
                            entry.spec.id.clone(),
                            entry.model.clone(),
                            entry.spec.cost_per_1k_tokens,
                            config,
                        )
                        .map_err(|e| Error::Config(e.to_string()))?,
                    )
                }
            };
            clients.insert(entry.spec.id.clone(), client);
        }
        Ok(clients)
    }
}

fn expand_home(path: PathBuf) -> Result<PathBuf> {
    if !path.starts_with("~") {
        return Ok(path);
    }
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
    let stripped = path
        .strip_prefix("~")
        .map_err(|_| Error::Config("Invalid home-relative path".to_string()))?;
    Ok(home.join(stripped))
}

/// Resolve a single environment variable reference.
/// Supports `$VAR_NAME` or `${VAR_NAME}`; values without a `$` prefix
/// pass through unchanged.
fn resolve_env_var(value: &str) -> Result<String> {
    let trimmed = value.trim();

    if let Some(var_name) = trimmed.strip_prefix('$') {
        let var_name = var_name
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(var_name);

        std::env::var(var_name)
            .map_err(|_| Error::Config(format!("Environment variable not found: {}", var_name)))
    } else {
        Ok(value.to_string())
    }
}

/// Convenience for tests and embedders: parse YAML from a string.
impl std::str::FromStr for EngineConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| Error::Config(format!("Invalid YAML: {}", e)))
    }
}
