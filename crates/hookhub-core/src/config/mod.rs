//! Configuration schemas.
//!
//! The root [`HooksConfig`] is deserialized via the `config` crate from
//! optional TOML files and `HOOKHUB__*` environment variables. Every section
//! has defaults, so an application without any configuration file gets the
//! stock behavior (`hook%d` form prefixes, newline-joined escaped template
//! output).

pub mod hooks;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::hooks::{FormHookConfig, ModelHookConfig, TemplateHookConfig};
use self::logging::LoggingConfig;

use crate::error::HooksError;

/// Root HookHub configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Form hook settings.
    #[serde(default)]
    pub forms: FormHookConfig,
    /// Template hook rendering settings.
    #[serde(default)]
    pub templates: TemplateHookConfig,
    /// Model hook composition settings.
    #[serde(default)]
    pub models: ModelHookConfig,
}

impl HooksConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default` with an environment-specific overlay
    /// (`config/{env}`) and environment variables prefixed with `HOOKHUB`,
    /// using `__` as the section separator (e.g. `HOOKHUB__LOGGING__LEVEL`).
    pub fn load(env: &str) -> Result<Self, HooksError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("HOOKHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| HooksError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| HooksError::configuration(format!("Failed to deserialize config: {e}")))?;

        tracing::debug!(
            env = %env,
            prefix_pattern = %config.forms.prefix_pattern,
            composite_name = %config.models.composite_name,
            "Hook configuration loaded"
        );

        Ok(config)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(source: &str) -> Result<Self, HooksError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
