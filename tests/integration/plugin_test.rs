//! Plugins attaching to and detaching from every registry.

use std::sync::Arc;

use serde_json::{Map, json};

use hookhub::hooks::render::render_hook;
use hookhub::prelude::*;

use crate::helpers::{BadgePlugin, HostHooks, POST_SAVE_UID, SubtitlePlugin};

fn post_kwargs(title: &str) -> Map<String, serde_json::Value> {
    let mut kwargs = Map::new();
    kwargs.insert("title".to_string(), json!(title));
    kwargs
}

#[test]
fn test_plugin_attaches_to_every_registry() {
    let hooks = HostHooks::with_defaults();
    let manager = hookhub::PluginManager::new();
    manager.load(SubtitlePlugin::new(hooks.clone())).unwrap();

    assert_eq!(hooks.comment_form.len(), 1);
    assert_eq!(hooks.signals.get("post_save").unwrap().receiver_count(), 1);
    assert_eq!(hooks.templates.get("sidebar").unwrap().len(), 1);
    assert!(hooks.profile_view.contains::<crate::helpers::SubtitleView>());
    assert!(hooks.models.contains("SubtitleMixin"));
    assert_eq!(hooks.search.len(), 1);
    assert_eq!(manager.list()[0].author, "HookHub Team");
}

#[test]
fn test_unload_detaches_everything() {
    let hooks = HostHooks::with_defaults();
    let manager = hookhub::PluginManager::new();
    manager.load(SubtitlePlugin::new(hooks.clone())).unwrap();
    manager.unload("subtitle").unwrap();

    assert!(hooks.comment_form.is_empty());
    assert_eq!(hooks.signals.get("post_save").unwrap().receiver_count(), 0);
    assert!(hooks.templates.get("sidebar").unwrap().is_empty());
    assert!(hooks.profile_view.is_empty());
    assert!(hooks.models.is_empty());
    assert!(hooks.search.is_empty());
    assert!(!manager.contains("subtitle"));

    // the plugin can come back
    manager.load(SubtitlePlugin::new(hooks.clone())).unwrap();
    assert_eq!(hooks.comment_form.len(), 1);
}

#[test]
fn test_form_hook_round_trip() {
    let hooks = HostHooks::with_defaults();
    let manager = hookhub::PluginManager::new();
    manager.load(SubtitlePlugin::new(hooks.clone())).unwrap();

    let args = HookArgs::new()
        .with_kwarg("user", "ada")
        .with_kwarg("subtitle", "A second line");
    let mut forms = hooks.comment_form.invoke(&args).unwrap();
    assert_eq!(forms.prefixes(), vec!["hook0"]);
    assert!(forms.is_valid());

    let saved = forms.save(&args).unwrap();
    assert_eq!(
        saved,
        vec![json!({"prefix": "hook0", "subtitle": "A second line", "user": "ada"})]
    );

    let mut missing = hooks
        .comment_form
        .invoke(&HookArgs::new().with_kwarg("user", "ada"))
        .unwrap();
    assert!(!missing.is_valid());
}

#[test]
fn test_signal_sender_filtering_and_uid() {
    let hooks = HostHooks::with_defaults();
    let plugin = SubtitlePlugin::new(hooks.clone());
    let manager = hookhub::PluginManager::new();
    manager.load(plugin.clone()).unwrap();

    let post = Sender::named("Post");
    let comment = Sender::named("Comment");

    let responses = hooks
        .signals
        .send("post_save", Some(&post), &post_kwargs("Hello"))
        .unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].1, json!({"indexed": "Hello"}));

    let ignored = hooks
        .signals
        .send("post_save", Some(&comment), &post_kwargs("Nope"))
        .unwrap();
    assert!(ignored.is_empty());
    assert_eq!(*plugin.saves.lock(), vec!["Hello"]);

    // a second connect with the same uid is ignored
    let handler: Arc<dyn SignalHandler> =
        Arc::new(|_: &SignalEvent<'_>| -> HooksResult<serde_json::Value> { Ok(json!(null)) });
    assert!(!hooks.signals.connect(
        "post_save",
        handler,
        Some(post.clone()),
        Some(POST_SAVE_UID)
    ));
    assert_eq!(hooks.signals.get("post_save").unwrap().receiver_count(), 1);
}

#[test]
fn test_sidebar_renders_every_plugin() {
    let hooks = HostHooks::with_defaults();
    let manager = hookhub::PluginManager::new();
    manager.load(SubtitlePlugin::new(hooks.clone())).unwrap();
    manager
        .load(Arc::new(BadgePlugin {
            hooks: hooks.clone(),
        }))
        .unwrap();

    let out = render_hook(
        &hooks.templates,
        "sidebar",
        &Map::new(),
        &HookArgs::new().with_kwarg("user", "ada"),
        &hooks.config.templates,
    )
    .unwrap();
    assert_eq!(out, "<p>ada's subtitles</p>\n&lt;badge&gt;");
}

#[test]
fn test_model_and_search_composition() {
    let hooks = HostHooks::with_defaults();
    let manager = hookhub::PluginManager::new();
    manager.load(SubtitlePlugin::new(hooks.clone())).unwrap();
    manager
        .load(Arc::new(BadgePlugin {
            hooks: hooks.clone(),
        }))
        .unwrap();

    let post = hooks
        .models
        .compose("Post", vec![FieldDef::char("title", 75)])
        .unwrap();
    assert_eq!(post.field_names(), vec!["subtitle", "badge_count", "title"]);

    let base = SearchIndexSchema::search_index("PostIndex")
        .with_field(SearchField::new("text", FieldKind::Text).document());
    let index = hooks.search.build_search_index(&base).unwrap();
    assert!(index.is_indexable);
    assert_eq!(index.field_names(), vec!["text", "subtitle"]);
}

#[test]
fn test_unload_all_and_duplicate_ids() {
    let hooks = HostHooks::with_defaults();
    let manager = hookhub::PluginManager::new();
    manager.load(SubtitlePlugin::new(hooks.clone())).unwrap();

    let err = manager.load(SubtitlePlugin::new(hooks.clone())).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(hooks.comment_form.len(), 1);

    manager
        .load(Arc::new(BadgePlugin {
            hooks: hooks.clone(),
        }))
        .unwrap();
    manager.finish_loading();

    assert_eq!(manager.unload_all(), 2);
    assert_eq!(manager.count(), 0);
    assert!(hooks.comment_form.is_empty());
}
