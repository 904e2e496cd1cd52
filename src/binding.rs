use std::ops::Deref;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::RegistryConfig;
use crate::event::{DispatchMode, EventRegistry, HandlerPolicy};

/// Shape of a consumer, which decides how its registry collects handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsumerKind {
    /// Long-lived consumer that may have several live instances; handlers accumulate
    Class,
    /// Consumer that re-registers on every invocation; one handler per event
    Function,
}

impl From<ConsumerKind> for HandlerPolicy {
    fn from(kind: ConsumerKind) -> Self {
        match kind {
            ConsumerKind::Class => HandlerPolicy::Accumulate,
            ConsumerKind::Function => HandlerPolicy::SingleSlot,
        }
    }
}

/// Identity of a consumer a registry gets bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerDescriptor {
    pub name: String,
    pub kind: ConsumerKind,
}

impl ConsumerDescriptor {
    pub fn new(name: impl Into<String>, kind: ConsumerKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ConsumerKind::Class)
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::new(name, ConsumerKind::Function)
    }

    /// Descriptor for a consumer without a usable name
    pub fn anonymous(kind: ConsumerKind) -> Self {
        Self::new(format!("anonymous-{}", Uuid::new_v4()), kind)
    }
}

/// SINGLE-mode registry owned by one consumer
pub struct RegistryHandle<A> {
    consumer: ConsumerDescriptor,
    registry: EventRegistry<A>,
}

impl<A> RegistryHandle<A> {
    pub fn consumer(&self) -> &ConsumerDescriptor {
        &self.consumer
    }

    pub fn registry(&self) -> &EventRegistry<A> {
        &self.registry
    }
}

impl<A> Clone for RegistryHandle<A> {
    fn clone(&self) -> Self {
        Self {
            consumer: self.consumer.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<A> Deref for RegistryHandle<A> {
    type Target = EventRegistry<A>;

    fn deref(&self) -> &Self::Target {
        &self.registry
    }
}

/// Consumers that carry their own registry
pub trait BoundConsumer<A> {
    fn registry(&self) -> &RegistryHandle<A>;
}

/// Creates a registry scoped to the consumer's name
///
/// Call it from the consumer's constructor and keep the handle on the consumer.
#[instrument(skip(consumer), fields(consumer = %consumer.name, kind = ?consumer.kind))]
pub fn bind_registry<A>(consumer: &ConsumerDescriptor) -> RegistryHandle<A> {
    bind_registry_with_config(consumer, &RegistryConfig::new())
}

pub fn bind_registry_with_config<A>(
    consumer: &ConsumerDescriptor,
    config: &RegistryConfig,
) -> RegistryHandle<A> {
    let registry = EventRegistry::with_config(
        DispatchMode::Single,
        Some(consumer.name.as_str()),
        consumer.kind.into(),
        config,
    );

    debug!(consumer = %consumer.name, "Bound registry to consumer");

    RegistryHandle {
        consumer: consumer.clone(),
        registry,
    }
}
