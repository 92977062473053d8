//! Value types shared by every hook registry.

pub mod args;
pub mod prefix;
pub mod sender;

pub use args::HookArgs;
pub use prefix::PrefixPattern;
pub use sender::Sender;
