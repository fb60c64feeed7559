//! Output suppression rules declared by extensions.
//!
//! The rendering collaborator consumes these to silently drop rendered
//! lines matching a pattern. This core only stores and exposes the rule
//! list; it never filters output itself.

/// Destination class of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationClass {
    Console,
    Channel,
    PrivateMessage,
}

/// A single suppression rule: a pattern plus the destination classes it
/// is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionRule {
    pub pattern: String,
    pub restrict_console: bool,
    pub restrict_channel: bool,
    pub restrict_private_message: bool,
}

impl SuppressionRule {
    /// A rule applying to every destination class.
    pub fn everywhere(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            restrict_console: true,
            restrict_channel: true,
            restrict_private_message: true,
        }
    }

    /// Whether this rule is in force for the given destination class.
    pub fn restricts(&self, destination: DestinationClass) -> bool {
        match destination {
            DestinationClass::Console => self.restrict_console,
            DestinationClass::Channel => self.restrict_channel,
            DestinationClass::PrivateMessage => self.restrict_private_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everywhere_restricts_all_classes() {
        let rule = SuppressionRule::everywhere("End of /WHOIS");
        assert!(rule.restricts(DestinationClass::Console));
        assert!(rule.restricts(DestinationClass::Channel));
        assert!(rule.restricts(DestinationClass::PrivateMessage));
    }

    #[test]
    fn partial_restriction_only_hits_named_classes() {
        let rule = SuppressionRule {
            pattern: "MOTD".into(),
            restrict_console: true,
            restrict_channel: false,
            restrict_private_message: false,
        };
        assert!(rule.restricts(DestinationClass::Console));
        assert!(!rule.restricts(DestinationClass::Channel));
    }
}
