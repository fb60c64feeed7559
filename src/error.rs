//! Unified error handling for irckit.
//!
//! Nothing in this module is fatal to the host: the worst outcome of a
//! misbehaving extension is that its own contribution is dropped and a
//! diagnostic is recorded.

use thiserror::Error;

use crate::ext::version::HostVersion;

/// Errors raised while loading or registering an extension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    /// The extension declared a minimum host version newer than the host's
    /// compatibility token. The extension is never added and never receives
    /// a hook call.
    #[error("extension '{name}' requires host {required}, host provides {supported}")]
    IncompatibleVersion {
        name: String,
        required: HostVersion,
        supported: HostVersion,
    },

    /// A subscribed command collided with a scripted handler. Neither
    /// handler is invoked for that command.
    #[error("command '{command}' is claimed by both a script and an extension")]
    CommandConflict { command: String },
}

impl ExtensionError {
    /// Static code string for diagnostic labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::IncompatibleVersion { .. } => "incompatible_version",
            Self::CommandConflict { .. } => "command_conflict",
        }
    }
}

/// A fault raised inside an extension's hook.
///
/// Caught at the dispatcher boundary and logged with the offending
/// extension's identity. Chain-transform policies treat a fault like a
/// suppressing empty return; every other policy treats it as "no
/// contribution" and keeps dispatching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hook fault: {message}")]
pub struct HookFault {
    message: String,
}

impl HookFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
