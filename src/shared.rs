use std::convert::Infallible;
use std::ops::Deref;
use thiserror::Error;

use crate::config::RegistryConfig;
use crate::event::{DispatchMode, EventRegistry, HandlerError, HandlerPolicy};

/// Errors surfaced by registry operations
///
/// Routing misses (emitting or removing an event nobody listens to) are not
/// errors; they are logged and the call returns normally.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Handler for {module}/{event} failed: {source}")]
    Handler {
        module: String,
        event: String,
        #[source]
        source: HandlerError,
    },

    #[error("Delayed emission requires a running tokio runtime")]
    NoRuntime,
}

impl From<Infallible> for RegistryError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl RegistryError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        RegistryError::InvalidArgument(msg.into())
    }
}

/// Process-wide GLOBAL-mode registry
///
/// Built once at startup and handed to whoever needs cross-cutting events.
/// Clones share the same underlying registry.
pub struct SharedRegistry<A> {
    registry: EventRegistry<A>,
}

impl<A> Clone for SharedRegistry<A> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<A> SharedRegistry<A> {
    pub fn new() -> Self {
        Self::from_config(&RegistryConfig::new())
    }

    /// Always GLOBAL: callers address modules per call
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self {
            registry: EventRegistry::with_config(
                DispatchMode::Global,
                None,
                HandlerPolicy::Accumulate,
                config,
            ),
        }
    }

    pub fn registry(&self) -> &EventRegistry<A> {
        &self.registry
    }
}

impl<A> Default for SharedRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Deref for SharedRegistry<A> {
    type Target = EventRegistry<A>;

    fn deref(&self) -> &Self::Target {
        &self.registry
    }
}
