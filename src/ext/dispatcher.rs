//! Event dispatch across loaded extensions.
//!
//! Each dispatch is a single synchronous pass over the load-ordered
//! extensions that declared the event's capability. Three merge policies
//! exist:
//!
//! - **chain-transform**: the current value threads through every
//!   eligible extension; an empty return (or a fault) suppresses the
//!   event and stops the chain.
//! - **first-wins**: the first structurally valid non-empty result is
//!   used; invalid results and faults are skipped.
//! - **fan-out-notify**: every eligible extension sees the same payload;
//!   results are ignored and a fault in one never stops the rest.
//! - **all-must-approve**: every eligible extension votes on the same
//!   payload; one veto decides, faults count as approval.
//!
//! There is no internal parallelism, so ordering between chained
//! extensions is exactly the registration order.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{ExtensionError, HookFault};
use crate::ext::events::{PostedMessage, ReceivedText, RenderContext, ServerInputEvent, UserInput};
use crate::ext::legacy;
use crate::ext::registry::{ExtensionId, ExtensionRegistry, LoadedExtension};
use crate::ext::suppression::SuppressionRule;
use crate::ext::traits::{Capability, Extension};
use crate::ext::version::HostVersion;

/// Structural validation for inline media results: a usable URL has a
/// scheme, a non-empty remainder, and no whitespace or control bytes.
fn is_structurally_valid_url(url: &str) -> bool {
    if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    match url.split_once("://") {
        Some((scheme, rest)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
                && !rest.is_empty()
        }
        None => false,
    }
}

/// Routes events to the subset of registered extensions that declared
/// support, applying the per-kind merge policy.
#[derive(Debug)]
pub struct EventDispatcher {
    registry: ExtensionRegistry,
    /// Lowercase user-input commands handled by the host itself.
    builtin_user_commands: HashSet<String>,
    /// Lowercase server commands/numerics handled exclusively by the host.
    builtin_server_commands: HashSet<String>,
    /// Lowercase user-input commands claimed by non-extension scripted
    /// handlers.
    script_commands: HashSet<String>,
    /// Commands claimed by both a script and an extension. Neither
    /// handler runs for these.
    conflicted_commands: HashSet<String>,
}

impl EventDispatcher {
    pub fn new(
        host_version: HostVersion,
        builtin_user_commands: impl IntoIterator<Item = String>,
        builtin_server_commands: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            registry: ExtensionRegistry::new(host_version),
            builtin_user_commands: builtin_user_commands
                .into_iter()
                .map(|c| c.to_ascii_lowercase())
                .collect(),
            builtin_server_commands: builtin_server_commands
                .into_iter()
                .map(|c| c.to_ascii_lowercase())
                .collect(),
            script_commands: HashSet::new(),
            conflicted_commands: HashSet::new(),
        }
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register an extension and apply command exclusivity to its
    /// subscriptions.
    ///
    /// A subscribed command already handled by the host is dropped with a
    /// diagnostic. A command already claimed by a scripted handler is
    /// marked conflicted: neither the script nor the extension runs for
    /// it, and a [`ExtensionError::CommandConflict`] diagnostic is
    /// emitted.
    pub fn register(
        &mut self,
        extension: Box<dyn Extension>,
    ) -> Result<ExtensionId, ExtensionError> {
        let id = self.registry.register(extension)?;

        // Entry was just appended, so it is last in load order.
        let (name, user_commands, server_commands) = match self.registry.iter().last() {
            Some(entry) => (
                entry.name.clone(),
                entry.user_commands.clone(),
                entry.server_commands.clone(),
            ),
            None => return Ok(id),
        };

        let mut kept_user = Vec::with_capacity(user_commands.len());
        for command in user_commands {
            if self.builtin_user_commands.contains(&command) {
                warn!(
                    extension = %name,
                    command = %command,
                    "subscription to host builtin command dropped"
                );
                continue;
            }
            if self.script_commands.contains(&command) {
                let conflict = ExtensionError::CommandConflict {
                    command: command.clone(),
                };
                warn!(
                    extension = %name,
                    command = %command,
                    error_code = conflict.error_code(),
                    "command claimed by a script; neither handler will run"
                );
                self.conflicted_commands.insert(command);
                continue;
            }
            kept_user.push(command);
        }

        let mut kept_server = Vec::with_capacity(server_commands.len());
        for command in server_commands {
            if self.builtin_server_commands.contains(&command) {
                warn!(
                    extension = %name,
                    command = %command,
                    "subscription to host-handled server command dropped"
                );
            } else {
                kept_server.push(command);
            }
        }

        if let Some(entry) = self.registry.iter_mut().last() {
            entry.user_commands = kept_user;
            entry.server_commands = kept_server;
        }

        Ok(id)
    }

    pub fn unregister(&mut self, id: ExtensionId) -> bool {
        self.registry.unregister(id)
    }

    /// Record a user-input command claimed by a non-extension scripted
    /// handler. If an already-loaded extension subscribed to the same
    /// command, the conflict rule applies symmetrically: the command is
    /// marked conflicted and neither handler runs.
    pub fn claim_script_command(&mut self, command: &str) {
        let command = command.to_ascii_lowercase();

        let extension_claimed = self
            .registry
            .iter()
            .any(|e| e.user_commands.iter().any(|c| *c == command));
        if extension_claimed {
            let conflict = ExtensionError::CommandConflict {
                command: command.clone(),
            };
            warn!(
                command = %command,
                error_code = conflict.error_code(),
                "script claims a command an extension subscribed to; neither handler will run"
            );
            self.conflicted_commands.insert(command.clone());
        }

        self.script_commands.insert(command);
    }

    /// Whether a command is excluded from both scripts and extensions.
    pub fn is_conflicted(&self, command: &str) -> bool {
        self.conflicted_commands
            .contains(&command.to_ascii_lowercase())
    }

    /// Aggregated suppression rules for the rendering collaborator.
    pub fn suppression_rules(&self) -> Vec<&SuppressionRule> {
        self.registry.suppression_rules()
    }

    // ------------------------------------------------------------------
    // Chain-transform dispatch
    // ------------------------------------------------------------------

    /// Thread a raw server input line through interceptors. `None` means
    /// the line was suppressed and must not be processed further.
    pub fn intercept_server_input(&mut self, line: String) -> Option<String> {
        let mut current = line;
        for entry in self.registry.supporting(Capability::InterceptServerInput) {
            match entry.extension.intercept_server_input(current) {
                Ok(Some(next)) => current = next,
                Ok(None) => {
                    debug!(extension = %entry.name, "server input suppressed");
                    return None;
                }
                Err(fault) => {
                    log_fault(entry, "intercept_server_input", &fault);
                    return None;
                }
            }
        }
        Some(current)
    }

    /// Thread submitted user input through interceptors. A transformed
    /// input whose command emptied is structurally invalid: it is
    /// discarded and the chain continues with the previous value.
    pub fn intercept_user_input(&mut self, input: UserInput) -> Option<UserInput> {
        let mut current = input;
        for entry in self.registry.supporting(Capability::InterceptUserInput) {
            match entry.extension.intercept_user_input(current.clone()) {
                Ok(Some(next)) if next.command.is_empty() => {
                    debug!(
                        extension = %entry.name,
                        "invalid user input transform discarded"
                    );
                }
                Ok(Some(next)) => current = next,
                Ok(None) => {
                    debug!(extension = %entry.name, "user input suppressed");
                    return None;
                }
                Err(fault) => {
                    log_fault(entry, "intercept_user_input", &fault);
                    return None;
                }
            }
        }
        Some(current)
    }

    /// Thread message text through pre-render transformers. `None` means
    /// the message was suppressed.
    pub fn will_render_message(
        &mut self,
        text: String,
        context: &RenderContext,
    ) -> Option<String> {
        let mut current = text;
        for entry in self.registry.supporting(Capability::WillRenderMessage) {
            match entry.extension.will_render_message(current, context) {
                Ok(Some(next)) => current = next,
                Ok(None) => {
                    debug!(extension = %entry.name, "render suppressed");
                    return None;
                }
                Err(fault) => {
                    log_fault(entry, "will_render_message", &fault);
                    return None;
                }
            }
        }
        Some(current)
    }

    // ------------------------------------------------------------------
    // All-must-approve dispatch
    // ------------------------------------------------------------------

    /// Ask every interested extension whether a received plain text
    /// message should be displayed. Any veto hides the message; a
    /// faulting extension forfeits its vote and counts as approval.
    pub fn should_display_received_text(&mut self, event: &ReceivedText) -> bool {
        for entry in self.registry.supporting(Capability::ReceivedText) {
            match entry.extension.received_text(event) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(extension = %entry.name, "received text hidden");
                    return false;
                }
                Err(fault) => log_fault(entry, "received_text", &fault),
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // First-wins dispatch
    // ------------------------------------------------------------------

    /// Resolve a URL to one displayable inline with chat. The first
    /// structurally valid result wins; invalid results and faults are
    /// treated as absent and dispatch continues.
    pub fn resolve_inline_media(&mut self, url: &str) -> Option<String> {
        for entry in self.registry.supporting(Capability::InlineMediaResolution) {
            match entry.extension.resolve_inline_media(url) {
                Ok(Some(resolved)) if is_structurally_valid_url(&resolved) => {
                    return Some(resolved);
                }
                Ok(Some(resolved)) => {
                    debug!(
                        extension = %entry.name,
                        resolved = %resolved,
                        "structurally invalid media result discarded"
                    );
                }
                Ok(None) => {}
                Err(fault) => log_fault(entry, "resolve_inline_media", &fault),
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Fan-out dispatch
    // ------------------------------------------------------------------

    /// Notify subscribers that a message was handed to the rendering
    /// collaborator. Returns the number of extensions notified
    /// (structured and legacy forms combined).
    pub fn did_post_message(&mut self, event: &PostedMessage) -> usize {
        let mut notified = 0;

        for entry in self.registry.supporting(Capability::DidPostMessage) {
            match entry.extension.did_post_message(event) {
                Ok(()) => notified += 1,
                Err(fault) => log_fault(entry, "did_post_message", &fault),
            }
        }

        let attributes = legacy::posted_message_attributes(event);
        for entry in self.registry.supporting(Capability::DidPostMessageLegacy) {
            match entry
                .extension
                .did_post_message_legacy(&attributes, false, event.is_bulk)
            {
                Ok(()) => notified += 1,
                Err(fault) => log_fault(entry, "did_post_message_legacy", &fault),
            }
        }

        notified
    }

    /// Deliver a subscribed user-input command to its subscribers.
    /// Returns the number of extensions invoked; zero for conflicted or
    /// unclaimed commands.
    pub fn dispatch_user_command(&mut self, command: &str, message: &str) -> usize {
        let command = command.to_ascii_lowercase();
        if self.conflicted_commands.contains(&command) {
            debug!(command = %command, "conflicted command dropped");
            return 0;
        }

        let mut invoked = 0;
        for entry in self.registry.supporting(Capability::UserInputCommand) {
            if !entry.user_commands.iter().any(|c| *c == command) {
                continue;
            }
            match entry.extension.user_input_command(&command, message) {
                Ok(()) => invoked += 1,
                Err(fault) => log_fault(entry, "user_input_command", &fault),
            }
        }
        invoked
    }

    /// Deliver a subscribed server command or numeric to its subscribers,
    /// including those on the deprecated key/value form. Returns the
    /// number of extensions invoked.
    pub fn dispatch_server_command(&mut self, event: &ServerInputEvent) -> usize {
        let command = event.command.to_ascii_lowercase();
        let mut invoked = 0;

        for entry in self.registry.supporting(Capability::ServerInputCommand) {
            if !entry.server_commands.iter().any(|c| *c == command) {
                continue;
            }
            match entry.extension.server_input_command(event) {
                Ok(()) => invoked += 1,
                Err(fault) => log_fault(entry, "server_input_command", &fault),
            }
        }

        let (sender, message) = legacy::server_input_attributes(event);
        for entry in self
            .registry
            .supporting(Capability::ServerInputCommandLegacy)
        {
            if !entry.server_commands.iter().any(|c| *c == command) {
                continue;
            }
            match entry
                .extension
                .server_input_command_legacy(&sender, &message)
            {
                Ok(()) => invoked += 1,
                Err(fault) => log_fault(entry, "server_input_command_legacy", &fault),
            }
        }

        invoked
    }
}

/// Report a hook fault to the diagnostic collaborator. The faulting
/// extension stays registered; only this contribution is dropped.
fn log_fault(entry: &LoadedExtension, hook: &str, fault: &HookFault) {
    warn!(
        extension = %entry.name,
        hook,
        fault = %fault.message(),
        "extension hook fault"
    );
}
