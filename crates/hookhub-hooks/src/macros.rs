//! Convenience macros for plugin development.

/// Builds a [`PluginInfo`](crate::registry::PluginInfo).
///
/// # Example
/// ```rust,ignore
/// let info = plugin_info!(
///     id: "my-plugin",
///     name: "My Plugin",
///     version: "1.0.0",
///     description: "Does things",
///     author: "Dev"
/// );
/// ```
#[macro_export]
macro_rules! plugin_info {
    (
        id: $id:expr,
        name: $name:expr,
        version: $version:expr,
        description: $desc:expr
    ) => {
        $crate::plugin_info!(
            id: $id,
            name: $name,
            version: $version,
            description: $desc,
            author: ""
        )
    };
    (
        id: $id:expr,
        name: $name:expr,
        version: $version:expr,
        description: $desc:expr,
        author: $author:expr
    ) => {
        $crate::registry::PluginInfo {
            id: $id.to_string(),
            name: $name.to_string(),
            version: $version.to_string(),
            description: $desc.to_string(),
            author: $author.to_string(),
        }
    };
}

/// Builds [`HookArgs`](crate::HookArgs): positional values first, then
/// `name = value` keyword pairs after a `;`.
///
/// # Example
/// ```rust,ignore
/// let args = hook_args!("foo", 1; extra = "bar", flag = true);
/// let kwargs_only = hook_args!(; user_id = 42);
/// ```
#[macro_export]
macro_rules! hook_args {
    () => {
        $crate::HookArgs::new()
    };
    ($($arg:expr),* $(,)? ; $($key:ident = $value:expr),* $(,)?) => {
        $crate::HookArgs::new()
            $(.with_arg($arg))*
            $(.with_kwarg(stringify!($key), $value))*
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::HookArgs::new()
            $(.with_arg($arg))+
    };
}
