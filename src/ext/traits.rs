//! The extension contract.
//!
//! An extension declares the hooks it supports as an explicit capability
//! set at load time; the dispatcher consults that declared set rather
//! than probing for method support per call. Hook methods have
//! pass-through defaults so an extension implements only what it
//! declared.

use std::collections::HashSet;

use crate::error::HookFault;
use crate::ext::events::{PostedMessage, ReceivedText, RenderContext, ServerInputEvent, UserInput};
use crate::ext::legacy::LegacyAttributes;
use crate::ext::suppression::SuppressionRule;
use crate::ext::version::HostVersion;

/// Named hooks an extension may declare support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Capability {
    /// Subscribed user-input commands (fan-out).
    UserInputCommand,
    /// Subscribed server-input commands and numerics (fan-out).
    ServerInputCommand,
    /// Deprecated key/value form of server input (fan-out, via adapter).
    ServerInputCommandLegacy,
    /// Display gate over received plain text (all-must-approve fan-out).
    ReceivedText,
    /// Pre-render text transformation (chain-transform).
    WillRenderMessage,
    /// Inline media URL resolution (first-wins).
    InlineMediaResolution,
    /// Post-render notification (fan-out).
    DidPostMessage,
    /// Deprecated key/value form of post-render notification.
    DidPostMessageLegacy,
    /// Raw server-input interception (chain-transform).
    InterceptServerInput,
    /// Raw user-input interception (chain-transform).
    InterceptUserInput,
}

/// An independently loaded unit of optional behavior.
///
/// The capability set, subscribed command lists, and suppression rules
/// are read once at registration and treated as immutable for the
/// extension's lifetime.
pub trait Extension: Send {
    /// Human-readable identity, used in diagnostics.
    fn name(&self) -> &str;

    /// Minimum host compatibility version this extension was built for.
    fn minimum_host_version(&self) -> HostVersion;

    /// The hooks this extension supports.
    fn capabilities(&self) -> HashSet<Capability>;

    /// Lowercase user-input command names this extension subscribes to.
    fn subscribed_user_commands(&self) -> Vec<String> {
        Vec::new()
    }

    /// Lowercase server command/numeric names this extension subscribes to.
    fn subscribed_server_commands(&self) -> Vec<String> {
        Vec::new()
    }

    /// Rules the rendering collaborator uses to drop matching lines.
    fn output_suppression_rules(&self) -> Vec<SuppressionRule> {
        Vec::new()
    }

    /// First call an extension receives, immediately after registration.
    fn loaded(&mut self) {}

    /// Last call an extension receives, before removal.
    fn will_unload(&mut self) {}

    /// A subscribed user-input command was performed.
    fn user_input_command(&mut self, _command: &str, _message: &str) -> Result<(), HookFault> {
        Ok(())
    }

    /// A subscribed server command or numeric arrived.
    fn server_input_command(&mut self, _event: &ServerInputEvent) -> Result<(), HookFault> {
        Ok(())
    }

    /// Deprecated dictionary-shaped variant of [`Self::server_input_command`].
    fn server_input_command_legacy(
        &mut self,
        _sender: &LegacyAttributes,
        _message: &LegacyAttributes,
    ) -> Result<(), HookFault> {
        Ok(())
    }

    /// Chain-transform over the raw server input line. Returning
    /// `Ok(None)` suppresses the line entirely.
    fn intercept_server_input(&mut self, line: String) -> Result<Option<String>, HookFault> {
        Ok(Some(line))
    }

    /// Chain-transform over submitted user input. Returning `Ok(None)`
    /// suppresses the input entirely.
    fn intercept_user_input(&mut self, input: UserInput) -> Result<Option<UserInput>, HookFault> {
        Ok(Some(input))
    }

    /// Asked for every received plain text message. Return `Ok(false)`
    /// to keep the message from being displayed. Invoked synchronously;
    /// extensions with no intent to hide content should return
    /// immediately and do any heavy work elsewhere.
    fn received_text(&mut self, _event: &ReceivedText) -> Result<bool, HookFault> {
        Ok(true)
    }

    /// Chain-transform over the text of a message about to be rendered.
    /// Returning `Ok(None)` suppresses the message.
    fn will_render_message(
        &mut self,
        text: String,
        _context: &RenderContext,
    ) -> Result<Option<String>, HookFault> {
        Ok(Some(text))
    }

    /// First-wins resolution of a URL to one displayable inline.
    /// `Ok(None)` signals no interest.
    fn resolve_inline_media(&mut self, _url: &str) -> Result<Option<String>, HookFault> {
        Ok(None)
    }

    /// A message was handed to the rendering collaborator. Arrives off
    /// the rendering context; do not touch rendering state from here.
    fn did_post_message(&mut self, _event: &PostedMessage) -> Result<(), HookFault> {
        Ok(())
    }

    /// Deprecated dictionary-shaped variant of [`Self::did_post_message`].
    fn did_post_message_legacy(
        &mut self,
        _attributes: &LegacyAttributes,
        _is_theme_reload: bool,
        _is_history_reload: bool,
    ) -> Result<(), HookFault> {
        Ok(())
    }
}
