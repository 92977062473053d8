//! HookHub: extension points a host application exposes to plugins.
//!
//! A host declares registries (form, signal, template, view, model and
//! search-index hooks), plugins attach to them during the load phase, and
//! the host invokes them while serving. This crate re-exports both member
//! crates and wires up logging.

use tracing_subscriber::{EnvFilter, fmt};

pub use hookhub_core;
pub use hookhub_hooks as hooks;

pub use hookhub_core::config::HooksConfig;
pub use hookhub_core::config::logging::LoggingConfig;
pub use hookhub_core::{ErrorKind, HookArgs, HooksError, HooksResult, PrefixPattern, Sender};
pub use hookhub_hooks::prelude;
pub use hookhub_hooks::{Plugin, PluginInfo, PluginManager};

/// Builds the filter for `config`; `RUST_LOG` takes precedence when set.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Installs the global tracing subscriber.
///
/// Fails with a `Configuration` error if the format is unknown. When a global
/// subscriber is already installed the existing one is kept.
pub fn init_logging(config: &LoggingConfig) -> HooksResult<()> {
    let filter = env_filter(config);

    let installed = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        "pretty" => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        other => {
            return Err(HooksError::configuration(format!(
                "Unknown log format '{other}', expected 'json' or 'pretty'"
            )));
        }
    };

    if let Err(e) = installed {
        tracing::debug!(error = %e, "Global subscriber already installed");
    }
    Ok(())
}
