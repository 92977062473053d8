//! Configuration flowing into the registries.

use hookhub::prelude::*;
use hookhub::{HooksConfig, LoggingConfig};
use serde_json::Map;
use serial_test::serial;

use crate::helpers::{BadgePlugin, Blank, HostHooks, SubtitlePlugin};

const CONFIG: &str = r#"
[logging]
level = "debug"
format = "json"

[forms]
prefix_pattern = "ext-%d-form"

[templates]
separator = " | "
autoescape = false

[models]
composite_name = "Extensions"
"#;

#[test]
fn test_config_drives_registries() {
    let config = HooksConfig::from_toml(CONFIG).unwrap();
    assert_eq!(config.logging.level, "debug");

    let hooks = HostHooks::from_config(config).unwrap();
    let manager = hookhub::PluginManager::new();
    manager.load(SubtitlePlugin::new(hooks.clone())).unwrap();
    manager
        .load(std::sync::Arc::new(BadgePlugin {
            hooks: hooks.clone(),
        }))
        .unwrap();

    let forms = hooks.comment_form.invoke(&HookArgs::new()).unwrap();
    assert_eq!(forms.prefixes(), vec!["ext-0-form"]);

    let out = hookhub::hooks::render::render_hook(
        &hooks.templates,
        "sidebar",
        &Map::new(),
        &HookArgs::new(),
        &hooks.config.templates,
    )
    .unwrap();
    assert_eq!(out, "<p>anonymous's subtitles</p> | <badge>");

    assert_eq!(hooks.models.plugins().unwrap().name, "Extensions");
}

#[test]
fn test_bad_prefix_pattern_is_rejected() {
    let config = HooksConfig::from_toml("[forms]\nprefix_pattern = \"no-placeholder\"").unwrap();
    let err = HostHooks::from_config(config).err().unwrap();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[test]
fn test_unknown_log_format() {
    let config = LoggingConfig {
        level: "info".to_string(),
        format: "yaml".to_string(),
    };
    assert_eq!(
        hookhub::init_logging(&config).unwrap_err().kind,
        ErrorKind::Configuration
    );
}

const PREFIX_VAR: &str = "HOOKHUB__FORMS__PREFIX_PATTERN";

#[test]
#[serial]
fn test_load_without_env_overlay_uses_defaults_file() {
    let config = HooksConfig::load("no-such-environment").unwrap();
    assert_eq!(config.forms.prefix_pattern.as_str(), "hook%d");
    assert_eq!(config.templates.separator, "\n");
    assert!(config.templates.autoescape);
    assert_eq!(config.models.composite_name, "Plugins");
}

#[test]
#[serial]
fn test_load_env_var_overrides_file() {
    // SAFETY: env mutation is confined to #[serial] tests.
    unsafe { std::env::set_var(PREFIX_VAR, "env-%d") };
    let config = HooksConfig::load("no-such-environment");
    unsafe { std::env::remove_var(PREFIX_VAR) };

    let config = config.unwrap();
    assert_eq!(config.forms.prefix_pattern.as_str(), "env-%d");
    assert_eq!(config.models.composite_name, "Plugins");

    let hooks = HostHooks::from_config(config).unwrap();
    hooks.comment_form.register_fn(
        |prefix: &str, _: &HookArgs| -> HooksResult<Box<dyn HookForm>> {
            Ok(Box::new(Blank(prefix.to_string())))
        },
    );
    let forms = hooks.comment_form.invoke(&HookArgs::new()).unwrap();
    assert_eq!(forms.prefixes(), vec!["env-0"]);
}
