//! The process-wide signal and template dispatchers.
//!
//! Tests share these across threads, so every test uses its own names.

use std::sync::Arc;

use parking_lot::Mutex;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

use hookhub::prelude::*;

use crate::helpers::Blank;

#[test]
fn test_global_signal_send_robust() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let seen = sent.clone();

    signals().connect_fn(
        "global.user_created",
        move |event: &SignalEvent<'_>| -> HooksResult<Value> {
            seen.lock().push(event.get_str("username").map(str::to_string));
            Ok(json!("welcomed"))
        },
    );
    signals().connect_fn(
        "global.user_created",
        |_: &SignalEvent<'_>| -> HooksResult<Value> { Err(HooksError::member("mailer down")) },
    );

    let mut kwargs = Map::new();
    kwargs.insert("username".to_string(), json!("ada"));

    let err = signals().send("global.user_created", None, &kwargs).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Member);

    let outcomes = signals().send_robust("global.user_created", None, &kwargs);
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].1.as_ref().ok(), Some(&json!("welcomed")));
    assert!(outcomes[1].1.is_err());
    assert_eq!(sent.lock().len(), 2);
}

#[test]
fn test_global_template_slot() {
    templates().register_fn("global.footer", |_: &HookArgs| -> HooksResult<Fragment> {
        Ok("© plugins".into())
    });
    let out = hookhub::hooks::render::render_hook(
        templates(),
        "global.footer",
        &Map::new(),
        &HookArgs::new(),
        &Default::default(),
    )
    .unwrap();
    assert_eq!(out, "© plugins");
}

proptest! {
    #[test]
    fn form_prefixes_follow_registration_order(count in 0usize..12) {
        let hook = FormHook::new();
        for _ in 0..count {
            hook.register_fn(|prefix: &str, _: &HookArgs| -> HooksResult<Box<dyn HookForm>> {
                Ok(Box::new(Blank(prefix.to_string())))
            });
        }

        let forms = hook.invoke(&HookArgs::new()).unwrap();
        let prefixes = forms.prefixes();
        let expected: Vec<String> = (0..count).map(|i| format!("hook{i}")).collect();
        prop_assert_eq!(prefixes, expected);
    }
}
