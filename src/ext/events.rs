//! Canonical event payloads handed to extension hooks.
//!
//! One structured type per event kind. The deprecated key/value shapes
//! are produced from these on demand by [`crate::ext::legacy`]; there is
//! never a second dispatch path.

use chrono::{DateTime, Utc};

/// Kind of rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum LineType {
    Privmsg,
    Action,
    Notice,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Privmsg => "privmsg",
            Self::Action => "action",
            Self::Notice => "notice",
        }
    }
}

/// Whether the line was produced by the local user or another member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberType {
    Normal,
    LocalUser,
}

impl MemberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::LocalUser => "local_user",
        }
    }
}

/// Origin of a server input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Nickname, or the server address when `is_server` is set.
    pub nickname: String,
    pub username: String,
    pub address: String,
    pub is_server: bool,
}

impl Sender {
    /// Combined `nick!user@address` mask; just the name for servers.
    pub fn hostmask(&self) -> String {
        if self.is_server || self.username.is_empty() {
            self.nickname.clone()
        } else {
            format!("{}!{}@{}", self.nickname, self.username, self.address)
        }
    }
}

/// A subscribed server command or numeric, fully parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInputEvent {
    pub sender: Sender,
    /// May reflect the IRCv3 server-time value rather than socket arrival,
    /// so it can lie far in the past or even the future.
    pub received_at: DateTime<Utc>,
    /// Command name, or the numeric as a string (e.g. "301").
    pub command: String,
    pub numeric: Option<u16>,
    pub params: Vec<String>,
    /// The raw input line as received.
    pub sequence: String,
    pub network_name: String,
    pub network_address: String,
}

/// A message that has been handed to the rendering collaborator.
///
/// Delivered off the rendering context; subscribers must not reach back
/// into rendering state and only receive this payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    /// Identifier of the rendered line.
    pub line_number: String,
    /// Message text with formatting stripped.
    pub contents: String,
    /// Empty when the event has no sender.
    pub sender_nickname: String,
    pub line_type: LineType,
    pub member_type: MemberType,
    pub received_at: DateTime<Utc>,
    /// Byte ranges in `contents` believed to be URLs, with the resolved
    /// URL (schemes may have been prepended).
    pub hyperlinks: Vec<(std::ops::Range<usize>, String)>,
    /// Channel members mentioned in the body.
    pub mentioned_users: Vec<String>,
    pub keyword_match: bool,
    /// Set during bulk history or reload replay so subscribers can skip
    /// expensive per-event work.
    pub is_bulk: bool,
}

/// A plain text message (privmsg, action, or notice) that arrived and
/// is about to be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedText {
    pub author: Sender,
    /// Channel or query name the message is destined for.
    pub destination: String,
    pub line_type: LineType,
    pub contents: String,
    /// May reflect the IRCv3 server-time value rather than socket
    /// arrival, so it can lie far in the past or even the future.
    pub received_at: DateTime<Utc>,
    pub was_encrypted: bool,
}

/// Text submitted through the input field, before the host acts on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub text: String,
    /// The implied command ("privmsg", or "action" when the host rewrote
    /// the intent). Chained extensions normally pass this through.
    pub command: String,
}

/// Context for pre-render text transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub line_type: LineType,
    pub member_type: MemberType,
}
