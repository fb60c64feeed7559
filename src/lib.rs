//! irckit - IRC client core.
//!
//! Two concerns live here: the extension event pipeline, which lets
//! independently loaded extensions observe and transform protocol
//! traffic and user input without the host losing control, and the
//! channel membership model, which derives ordered privilege ranks from
//! server-reported mode strings and keeps decaying per-participant
//! activity weights.
//!
//! Transport, message parsing beyond mode and prefix tokens, and
//! rendering are external collaborators.

pub mod casemap;
pub mod config;
pub mod error;
pub mod ext;
pub mod member;

pub use config::Tuning;
pub use error::{ExtensionError, HookFault};
pub use ext::{
    Capability, EventDispatcher, Extension, ExtensionId, ExtensionRegistry, HostVersion,
    SuppressionRule, HOST_COMPATIBILITY_VERSION,
};
pub use member::{Participant, Rank, RankSet, Roster};
