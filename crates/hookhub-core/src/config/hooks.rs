//! Per-registry configuration sections.

use serde::{Deserialize, Serialize};

/// Form hook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormHookConfig {
    /// Default disambiguation pattern; must hold exactly one `%d`.
    #[serde(default = "default_prefix_pattern")]
    pub prefix_pattern: String,
}

impl Default for FormHookConfig {
    fn default() -> Self {
        Self {
            prefix_pattern: default_prefix_pattern(),
        }
    }
}

/// Template hook rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateHookConfig {
    /// String placed between adjacent fragments when rendering.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Whether fragments not marked safe are HTML-escaped.
    #[serde(default = "default_true")]
    pub autoescape: bool,
}

impl Default for TemplateHookConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            autoescape: true,
        }
    }
}

/// Model hook composition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelHookConfig {
    /// Name given to the synthesized abstract schema.
    #[serde(default = "default_composite_name")]
    pub composite_name: String,
}

impl Default for ModelHookConfig {
    fn default() -> Self {
        Self {
            composite_name: default_composite_name(),
        }
    }
}

fn default_prefix_pattern() -> String {
    "hook%d".to_string()
}

fn default_separator() -> String {
    "\n".to_string()
}

fn default_composite_name() -> String {
    "Plugins".to_string()
}

fn default_true() -> bool {
    true
}
