//! Convenience result type alias for HookHub.

use crate::error::HooksError;

/// A specialized `Result` type for hook registration and fan-out.
///
/// This is defined as a convenience so that plugin code does not need to
/// write `Result<T, HooksError>` explicitly.
pub type HooksResult<T> = Result<T, HooksError>;
