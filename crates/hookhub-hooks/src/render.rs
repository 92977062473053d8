//! Rendering boundary for template hooks.
//!
//! A host's template engine calls [`render_hook`] for `{% hook "name" %}`
//! style tags, or [`collect`] for slots it owns directly. Fragments are
//! escaped one by one (unless marked safe) and joined with the configured
//! separator.

use serde_json::{Map, Value};
use tracing::debug;

use hookhub_core::config::hooks::TemplateHookConfig;
use hookhub_core::{HookArgs, HooksResult};

use crate::hooks::template::{Fragment, TemplateHook, TemplateHooks};

/// Escapes `& < > " '` for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Joins fragments with `separator`, escaping every non-safe fragment on
/// its own when `autoescape` is set.
pub fn join_fragments(fragments: &[Fragment], separator: &str, autoescape: bool) -> String {
    fragments
        .iter()
        .map(|fragment| {
            if autoescape && !fragment.safe {
                escape_html(&fragment.text)
            } else {
                fragment.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Renders the named slot of `hooks`.
///
/// The render `context` is handed to every callback as the first
/// positional argument, ahead of `args`. Unknown names render as `""`.
pub fn render_hook(
    hooks: &TemplateHooks,
    name: &str,
    context: &Map<String, Value>,
    args: &HookArgs,
    config: &TemplateHookConfig,
) -> HooksResult<String> {
    let args = args.prepend(Value::Object(context.clone()));
    let fragments = hooks.call(name, &args)?;

    debug!(hook = %name, fragments = fragments.len(), "Rendering template hook");

    Ok(join_fragments(
        &fragments,
        &config.separator,
        config.autoescape,
    ))
}

/// Renders a slot the caller looked up itself; `None` renders as `""`.
pub fn collect(
    hook: Option<&TemplateHook>,
    args: &HookArgs,
    config: &TemplateHookConfig,
) -> HooksResult<String> {
    let Some(hook) = hook else {
        return Ok(String::new());
    };

    let fragments = hook.call(args)?;
    Ok(join_fragments(
        &fragments,
        &config.separator,
        config.autoescape,
    ))
}
