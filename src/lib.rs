// Library crate for the module-scoped event registry
// This file exposes the public API for integration tests and the demo binary

pub mod binding;
pub mod config;
pub mod event;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use binding::{
    bind_registry, BoundConsumer, ConsumerDescriptor, ConsumerKind, RegistryHandle,
};
pub use config::RegistryConfig;
pub use event::{
    DelayOptions, DispatchMode, EventOptions, EventRef, EventRegistry, HandlerError,
    HandlerPolicy, ModuleNames,
};
pub use shared::{RegistryError, SharedRegistry};
