//! Ordered collection of loaded extensions.
//!
//! Load order is preserved and is the tie-break for all dispatch
//! chaining (first loaded runs first). Capability sets, subscribed
//! command lists, and suppression rules are snapshotted at registration
//! and never re-polled.

use std::collections::HashSet;

use tracing::info;
use uuid::Uuid;

use crate::error::ExtensionError;
use crate::ext::suppression::SuppressionRule;
use crate::ext::traits::{Capability, Extension};
use crate::ext::version::HostVersion;

/// Opaque identity of a loaded extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionId(Uuid);

/// A registered extension with its load-time snapshot.
pub struct LoadedExtension {
    pub id: ExtensionId,
    pub name: String,
    pub capabilities: HashSet<Capability>,
    /// Lowercase user-input command subscriptions.
    pub user_commands: Vec<String>,
    /// Lowercase server command/numeric subscriptions.
    pub server_commands: Vec<String>,
    pub suppression_rules: Vec<SuppressionRule>,
    pub extension: Box<dyn Extension>,
}

impl LoadedExtension {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl std::fmt::Debug for LoadedExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedExtension")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// Ordered registry of loaded extensions.
#[derive(Debug)]
pub struct ExtensionRegistry {
    host_version: HostVersion,
    entries: Vec<LoadedExtension>,
}

impl ExtensionRegistry {
    pub fn new(host_version: HostVersion) -> Self {
        Self {
            host_version,
            entries: Vec::new(),
        }
    }

    pub fn host_version(&self) -> HostVersion {
        self.host_version
    }

    /// Register an extension, appending it to the load order.
    ///
    /// Fails with [`ExtensionError::IncompatibleVersion`] when the
    /// extension declares a minimum host version newer than the host's
    /// compatibility token; such an extension never receives a hook call.
    pub fn register(
        &mut self,
        mut extension: Box<dyn Extension>,
    ) -> Result<ExtensionId, ExtensionError> {
        let required = extension.minimum_host_version();
        if required > self.host_version {
            return Err(ExtensionError::IncompatibleVersion {
                name: extension.name().to_owned(),
                required,
                supported: self.host_version,
            });
        }

        let id = ExtensionId(Uuid::new_v4());
        let name = extension.name().to_owned();
        let capabilities = extension.capabilities();
        let user_commands = lowercased(extension.subscribed_user_commands());
        let server_commands = lowercased(extension.subscribed_server_commands());
        let suppression_rules = extension.output_suppression_rules();

        extension.loaded();
        info!(extension = %name, "extension loaded");

        self.entries.push(LoadedExtension {
            id,
            name,
            capabilities,
            user_commands,
            server_commands,
            suppression_rules,
            extension,
        });
        Ok(id)
    }

    /// Remove an extension, invoking its unload hook first.
    pub fn unregister(&mut self, id: ExtensionId) -> bool {
        let Some(position) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        let mut entry = self.entries.remove(position);
        entry.extension.will_unload();
        info!(extension = %entry.name, "extension unloaded");
        true
    }

    /// Extensions supporting a capability, in load order.
    pub fn supporting(
        &mut self,
        capability: Capability,
    ) -> impl Iterator<Item = &mut LoadedExtension> {
        self.entries
            .iter_mut()
            .filter(move |e| e.supports(capability))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedExtension> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LoadedExtension> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aggregated suppression rules from every loaded extension, in load
    /// order. Exposed for the rendering collaborator; nothing here
    /// filters output.
    pub fn suppression_rules(&self) -> Vec<&SuppressionRule> {
        self.entries
            .iter()
            .flat_map(|e| e.suppression_rules.iter())
            .collect()
    }
}

fn lowercased(commands: Vec<String>) -> Vec<String> {
    commands.into_iter().map(|c| c.to_ascii_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::version::HOST_COMPATIBILITY_VERSION;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Probe {
        name: String,
        minimum: HostVersion,
        caps: HashSet<Capability>,
        loads: Arc<AtomicUsize>,
        unloads: Arc<AtomicUsize>,
    }

    impl Probe {
        fn boxed(
            name: &str,
            minimum: HostVersion,
        ) -> (Box<dyn Extension>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let loads = Arc::new(AtomicUsize::new(0));
            let unloads = Arc::new(AtomicUsize::new(0));
            let probe = Probe {
                name: name.into(),
                minimum,
                caps: HashSet::from([Capability::DidPostMessage]),
                loads: loads.clone(),
                unloads: unloads.clone(),
            };
            (Box::new(probe), loads, unloads)
        }
    }

    impl Extension for Probe {
        fn name(&self) -> &str {
            &self.name
        }
        fn minimum_host_version(&self) -> HostVersion {
            self.minimum
        }
        fn capabilities(&self) -> HashSet<Capability> {
            self.caps.clone()
        }
        fn loaded(&mut self) {
            self.loads.fetch_add(1, Ordering::SeqCst);
        }
        fn will_unload(&mut self) {
            self.unloads.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn register_preserves_load_order() {
        let mut registry = ExtensionRegistry::new(HOST_COMPATIBILITY_VERSION);
        let (first, _, _) = Probe::boxed("first", HostVersion::new(1, 0, 0));
        let (second, _, _) = Probe::boxed("second", HostVersion::new(0, 9, 0));
        registry.register(first).unwrap();
        registry.register(second).unwrap();

        let names: Vec<&str> = registry.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn newer_minimum_version_is_rejected_before_any_hook() {
        let mut registry = ExtensionRegistry::new(HOST_COMPATIBILITY_VERSION);
        let (probe, loads, _) = Probe::boxed("too-new", HostVersion::new(9, 0, 0));

        let err = registry.register(probe).unwrap_err();
        assert_eq!(err.error_code(), "incompatible_version");
        assert!(registry.is_empty());
        // The extension never received its load hook.
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn equal_minimum_version_is_accepted() {
        let mut registry = ExtensionRegistry::new(HOST_COMPATIBILITY_VERSION);
        let (probe, loads, _) = Probe::boxed("exact", HOST_COMPATIBILITY_VERSION);
        registry.register(probe).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregister_removes_and_notifies() {
        let mut registry = ExtensionRegistry::new(HOST_COMPATIBILITY_VERSION);
        let (probe, _, unloads) = Probe::boxed("gone", HostVersion::new(1, 0, 0));
        let id = registry.register(probe).unwrap();

        assert!(registry.unregister(id));
        assert!(registry.is_empty());
        assert_eq!(unloads.load(Ordering::SeqCst), 1);
        assert!(!registry.unregister(id));
    }

    #[test]
    fn command_subscriptions_are_lowercased_at_load() {
        struct Shouty;
        impl Extension for Shouty {
            fn name(&self) -> &str {
                "shouty"
            }
            fn minimum_host_version(&self) -> HostVersion {
                HostVersion::new(1, 0, 0)
            }
            fn capabilities(&self) -> HashSet<Capability> {
                HashSet::from([Capability::UserInputCommand])
            }
            fn subscribed_user_commands(&self) -> Vec<String> {
                vec!["Wallop".into(), "SLAP".into()]
            }
        }

        let mut registry = ExtensionRegistry::new(HOST_COMPATIBILITY_VERSION);
        registry.register(Box::new(Shouty)).unwrap();
        let entry = registry.iter().next().unwrap();
        assert_eq!(entry.user_commands, ["wallop", "slap"]);
    }
}
