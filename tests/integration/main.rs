//! Integration tests for HookHub.

mod helpers;

mod config_test;
mod global_test;
mod plugin_test;
