//! Extension loading and event dispatch.
//!
//! Split into logical submodules:
//! - [`version`]: host compatibility tokens checked at load time
//! - [`events`]: canonical structured event payloads
//! - [`traits`]: the [`Extension`](traits::Extension) contract and capability set
//! - [`registry`]: load-ordered extension collection
//! - [`dispatcher`]: per-kind merge policies over the registry
//! - [`legacy`]: adapters for the deprecated key/value hook shapes
//! - [`suppression`]: output suppression rule storage

pub mod dispatcher;
pub mod events;
pub mod legacy;
pub mod registry;
pub mod suppression;
pub mod traits;
pub mod version;

pub use dispatcher::EventDispatcher;
pub use events::{
    LineType, MemberType, PostedMessage, ReceivedText, RenderContext, Sender, ServerInputEvent,
    UserInput,
};
pub use legacy::LegacyAttributes;
pub use registry::{ExtensionId, ExtensionRegistry, LoadedExtension};
pub use suppression::{DestinationClass, SuppressionRule};
pub use traits::{Capability, Extension};
pub use version::{HostVersion, HOST_COMPATIBILITY_VERSION};
