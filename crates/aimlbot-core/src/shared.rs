//! Shared types used across all aimlbot crates.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the serialized brain inside `storage_path`.
pub const BRAIN_FILE_NAME: &str = "bot_brain.brn";

/// Tenant context for multi-tenant isolation across the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantContext {
    /// Unique tenant identifier.
    pub tenant_id: String,
    /// Optional correlation id for request tracing.
    pub correlation_id: Option<String>,
}

/// High-level goal types the orchestrator can delegate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Goal {
    /// Execute a named skill with optional payload.
    ExecuteSkill {
        name: String,
        payload: Option<serde_json::Value>,
    },
    /// Route an utterance no other skill recognized to the fallback brain.
    Fallback { utterance: String },
    /// Delete the persisted brain and clear in-memory state.
    ResetMemory,
    /// Custom goal for extension.
    Custom(String),
}

/// Global application configuration (gateway + adapter). Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity shown in logs.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Private persistent-storage directory; the serialized brain lives here.
    pub storage_path: String,
    /// Read-only directory of AIML category source files.
    pub aiml_path: String,
    /// Gates whether fallback handling is attempted at all. Absent = decline.
    #[serde(default)]
    pub enabled: bool,
    /// Persist the brain every Nth query. Minimum practical value is 1.
    pub save_loop_threshold: u32,
}

impl CoreConfig {
    /// Fixed path of the serialized brain file.
    pub fn brain_path(&self) -> PathBuf {
        Path::new(&self.storage_path).join(BRAIN_FILE_NAME)
    }

    /// Load config from file and environment. Precedence: env `AIMLBOT_CONFIG`
    /// path > `config/gateway.toml` > defaults, with `AIMLBOT__*` env overlay.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("AIMLBOT_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "AIML Fallback Gateway")?
            .set_default("port", 8001_i64)?
            .set_default("storage_path", "./data")?
            .set_default("aiml_path", "./aiml")?
            .set_default("enabled", false)?
            .set_default("save_loop_threshold", 4_i64)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("AIMLBOT").separator("__"))
            .build()?;

        built.try_deserialize()
    }
}
