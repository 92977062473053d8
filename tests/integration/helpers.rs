//! Shared test helpers for integration tests.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};

use hookhub::HooksConfig;
use hookhub::prelude::*;

/// Stand-in for the host's request object.
#[derive(Debug, Default)]
pub struct Request {
    pub user: String,
    pub log: Mutex<Vec<String>>,
}

impl Request {
    pub fn new(user: &str) -> Arc<Self> {
        Arc::new(Self {
            user: user.to_string(),
            log: Mutex::new(Vec::new()),
        })
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.log.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

/// Every extension point the test host exposes.
pub struct HostHooks {
    pub comment_form: FormHook,
    pub signals: SignalHooks,
    pub templates: TemplateHooks,
    pub profile_view: ViewHooks<Request>,
    pub models: ModelHooks,
    pub search: SearchIndexHooks,
    pub config: HooksConfig,
}

impl HostHooks {
    pub fn from_config(config: HooksConfig) -> HooksResult<Arc<Self>> {
        Ok(Arc::new(Self {
            comment_form: FormHook::from_config(&config.forms)?
                .with_providing_args(["user"]),
            signals: SignalHooks::new(),
            templates: TemplateHooks::new(),
            profile_view: ViewHooks::new(),
            models: ModelHooks::from_config(&config.models),
            search: SearchIndexHooks::new(),
            config,
        }))
    }

    pub fn with_defaults() -> Arc<Self> {
        Self::from_config(HooksConfig::default()).expect("default config is valid")
    }
}

/// Form contributed by [`SubtitlePlugin`].
pub struct SubtitleForm {
    prefix: String,
    subtitle: Option<String>,
    pub errors: Vec<String>,
}

impl HookForm for SubtitleForm {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn is_valid(&mut self) -> bool {
        match self.subtitle.as_deref() {
            Some(s) if !s.is_empty() => true,
            _ => {
                self.errors.push("subtitle is required".to_string());
                false
            }
        }
    }

    fn save(&mut self, args: &HookArgs) -> HooksResult<Value> {
        Ok(json!({
            "prefix": self.prefix,
            "subtitle": self.subtitle,
            "user": args.get_str("user"),
        }))
    }
}

/// A form that always validates; only its prefix matters.
pub struct Blank(pub String);

impl HookForm for Blank {
    fn prefix(&self) -> &str {
        &self.0
    }

    fn is_valid(&mut self) -> bool {
        true
    }

    fn save(&mut self, _args: &HookArgs) -> HooksResult<Value> {
        Ok(Value::Null)
    }
}

/// View step contributed by [`SubtitlePlugin`].
pub struct SubtitleView {
    base: ViewHookBase<Request>,
    subtitle: Option<String>,
}

impl ViewHook<Request> for SubtitleView {
    fn from_base(mut base: ViewHookBase<Request>) -> HooksResult<Self> {
        let user = base.request().user.clone();
        base.insert_context("subtitle_user", user);
        Ok(Self {
            base,
            subtitle: None,
        })
    }

    fn base(&self) -> &ViewHookBase<Request> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewHookBase<Request> {
        &mut self.base
    }

    fn dispatch(&mut self, _args: &HookArgs) -> HooksResult<()> {
        self.base.request().record("subtitle.dispatch");
        Ok(())
    }

    fn get(&mut self, _args: &HookArgs) -> HooksResult<()> {
        self.base.request().record("subtitle.get");
        Ok(())
    }

    fn post(&mut self, args: &HookArgs) -> HooksResult<()> {
        self.base.request().record("subtitle.post");
        self.subtitle = args.get_str("subtitle").map(str::to_string);
        Ok(())
    }

    fn is_valid(&mut self) -> bool {
        self.subtitle.is_some()
    }

    fn save(&mut self, _args: &HookArgs) -> HooksResult<()> {
        self.base.request().record("subtitle.save");
        let subtitle = self.subtitle.clone().unwrap_or_default();
        self.base.insert_context("saved_subtitle", subtitle);
        Ok(())
    }
}

#[derive(Default)]
struct Handles {
    form: Option<Arc<dyn FormFactory>>,
    template: Option<Arc<dyn TemplateCallback>>,
    search: Option<Arc<SearchIndexSchema>>,
}

/// A plugin touching every registry of [`HostHooks`].
pub struct SubtitlePlugin {
    hooks: Arc<HostHooks>,
    receiver: Arc<dyn SignalHandler>,
    handles: Mutex<Handles>,
    pub saves: Arc<Mutex<Vec<String>>>,
}

impl std::fmt::Debug for SubtitlePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubtitlePlugin").finish()
    }
}

pub const POST_SAVE_UID: &str = "subtitle.post_save";

impl SubtitlePlugin {
    pub fn new(hooks: Arc<HostHooks>) -> Arc<Self> {
        let saves = Arc::new(Mutex::new(Vec::new()));
        let seen = saves.clone();
        let receiver: Arc<dyn SignalHandler> =
            Arc::new(move |event: &SignalEvent<'_>| -> HooksResult<Value> {
                let title = event.get_str("title").unwrap_or_default().to_string();
                seen.lock().push(title.clone());
                Ok(json!({"indexed": title}))
            });

        Arc::new(Self {
            hooks,
            receiver,
            handles: Mutex::new(Handles::default()),
            saves,
        })
    }
}

impl Plugin for SubtitlePlugin {
    fn info(&self) -> PluginInfo {
        plugin_info!(
            id: "subtitle",
            name: "Subtitle",
            version: "1.0.0",
            description: "Adds a subtitle to posts",
            author: "HookHub Team"
        )
    }

    fn register(&self) -> HooksResult<()> {
        let hooks = &self.hooks;

        let form = hooks.comment_form.register_fn(
            |prefix: &str, args: &HookArgs| -> HooksResult<Box<dyn HookForm>> {
                Ok(Box::new(SubtitleForm {
                    prefix: prefix.to_string(),
                    subtitle: args.get_str("subtitle").map(str::to_string),
                    errors: Vec::new(),
                }))
            },
        );

        hooks.signals.connect(
            "post_save",
            self.receiver.clone(),
            Some(Sender::named("Post")),
            Some(POST_SAVE_UID),
        );

        let template = hooks.templates.register_fn(
            "sidebar",
            |args: &HookArgs| -> HooksResult<Fragment> {
                let user = args.get_str("user").unwrap_or("anonymous");
                Ok(Fragment::safe(format!("<p>{user}'s subtitles</p>")))
            },
        );

        hooks.profile_view.register::<SubtitleView>();

        hooks.models.register(
            ModelSchema::abstract_model("SubtitleMixin").with_field(FieldDef::char("subtitle", 75)),
        )?;

        let search = hooks.search.register(
            SearchIndexSchema::field_set("SubtitleSearch")
                .with_field(SearchField::new("subtitle", FieldKind::Char { max_length: 75 })),
        )?;

        *self.handles.lock() = Handles {
            form: Some(form),
            template: Some(template),
            search: Some(search),
        };
        Ok(())
    }

    fn unregister(&self) {
        let hooks = &self.hooks;
        let handles = std::mem::take(&mut *self.handles.lock());

        if let Some(form) = handles.form {
            hooks.comment_form.unregister(&form);
        }
        if let Some(template) = handles.template {
            hooks.templates.unregister("sidebar", &template);
        }
        if let Some(search) = handles.search {
            hooks.search.unregister(&search);
        }
        hooks.signals.disconnect("post_save", &self.receiver, Some(POST_SAVE_UID));
        hooks.profile_view.unregister::<SubtitleView>();
        hooks.models.unregister("SubtitleMixin");
    }
}

/// A second plugin contributing only a template fragment and a mixin.
pub struct BadgePlugin {
    pub hooks: Arc<HostHooks>,
}

impl std::fmt::Debug for BadgePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgePlugin").finish()
    }
}

impl Plugin for BadgePlugin {
    fn info(&self) -> PluginInfo {
        plugin_info!(
            id: "badge",
            name: "Badge",
            version: "0.2.0",
            description: "Shows user badges"
        )
    }

    fn register(&self) -> HooksResult<()> {
        self.hooks
            .templates
            .register_fn("sidebar", |_: &HookArgs| -> HooksResult<Fragment> {
                Ok(Fragment::text("<badge>"))
            });
        self.hooks.models.register(
            ModelSchema::abstract_model("BadgeMixin")
                .with_field(FieldDef::new("badge_count", FieldKind::Integer)),
        )?;
        Ok(())
    }
}
