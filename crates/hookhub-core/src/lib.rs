//! # hookhub-core
//!
//! Core crate for HookHub. Contains the unified error system, the
//! configuration schemas and loader, and the argument types that every
//! hook registry forwards to its members.
//!
//! This crate has **no** internal dependencies on other HookHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{ErrorKind, HooksError};
pub use result::HooksResult;
pub use types::{HookArgs, PrefixPattern, Sender};
