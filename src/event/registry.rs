use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use strum_macros::{Display, EnumString};
use tokio::runtime::Handle;
use tracing::{debug, error, info, instrument};

use super::{
    handler::{Handler, HandlerError},
    reference::{DelayOptions, EventRef, ModuleNames},
};
use crate::config::RegistryConfig;
use crate::shared::RegistryError;

/// Where a registry takes the module name from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DispatchMode {
    /// Module name supplied by the caller on every operation
    Global,
    /// Module name fixed to the registry's own scope
    Single,
}

/// What `on` does when an event already has handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerPolicy {
    /// Every registration is appended
    Accumulate,
    /// Only the first registration is kept; later ones are ignored
    SingleSlot,
}

impl From<bool> for HandlerPolicy {
    fn from(accumulate: bool) -> Self {
        if accumulate {
            HandlerPolicy::Accumulate
        } else {
            HandlerPolicy::SingleSlot
        }
    }
}

/// module name -> event name -> handlers in registration order
type EventMap<A> = HashMap<String, HashMap<String, Vec<Handler<A>>>>;

/// In-process registry of named event handlers grouped by module
///
/// Clones share the same handler table, which is what lets a delayed
/// emission fire against the registry that scheduled it.
pub struct EventRegistry<A> {
    mode: DispatchMode,
    module_name: String,
    policy: HandlerPolicy,
    default_delay: Duration,
    modules: Arc<RwLock<EventMap<A>>>,
}

impl<A> Clone for EventRegistry<A> {
    fn clone(&self) -> Self {
        Self {
            mode: self.mode,
            module_name: self.module_name.clone(),
            policy: self.policy,
            default_delay: self.default_delay,
            modules: self.modules.clone(),
        }
    }
}

impl<A> std::fmt::Debug for EventRegistry<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("mode", &self.mode)
            .field("module_name", &self.module_name)
            .field("policy", &self.policy)
            .field("modules", &self.module_names())
            .finish()
    }
}

impl<A> EventRegistry<A> {
    /// Creates a registry using configuration from the environment
    ///
    /// A missing module name falls back to the configured default ("Global").
    pub fn new(mode: DispatchMode, module_name: Option<&str>, policy: HandlerPolicy) -> Self {
        Self::with_config(mode, module_name, policy, &RegistryConfig::new())
    }

    pub fn with_config(
        mode: DispatchMode,
        module_name: Option<&str>,
        policy: HandlerPolicy,
        config: &RegistryConfig,
    ) -> Self {
        let module_name = module_name
            .unwrap_or(config.default_module_name.as_str())
            .to_string();

        debug!(
            mode = %mode,
            module = %module_name,
            policy = ?policy,
            "Creating event registry"
        );

        Self {
            mode,
            module_name,
            policy,
            default_delay: config.default_delay,
            modules: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// GLOBAL-mode registry that accumulates handlers
    pub fn global() -> Self {
        Self::new(DispatchMode::Global, None, HandlerPolicy::Accumulate)
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn policy(&self) -> HandlerPolicy {
        self.policy
    }

    /// Registers a handler closure for an event
    pub fn on<F>(&self, event: impl Into<EventRef>, handler: F)
    where
        F: Fn(&A) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on_handler(event, Arc::new(handler));
    }

    /// Registers an already shared handler
    ///
    /// Under `SingleSlot` the call is silently ignored when the event
    /// already has a handler.
    #[instrument(skip(self, event, handler), fields(scope = %self.module_name))]
    pub fn on_handler(&self, event: impl Into<EventRef>, handler: Handler<A>) {
        let event = event.into();
        let (module, name) = self.resolve(&event);

        let mut modules = self.write();
        let handlers = modules
            .entry(module.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default();

        match self.policy {
            HandlerPolicy::Accumulate => handlers.push(handler),
            HandlerPolicy::SingleSlot if handlers.is_empty() => handlers.push(handler),
            HandlerPolicy::SingleSlot => {
                debug!(module = %module, event = %name, "Handler already registered, ignoring");
                return;
            }
        }

        debug!(
            module = %module,
            event = %name,
            handler_count = handlers.len(),
            "Handler registered"
        );
    }

    /// Invokes every handler of an event in registration order
    ///
    /// Emitting an event nobody listens to is logged and returns `Ok`.
    /// The first failing handler aborts the emission and its error is
    /// returned; a once-only event is then left registered.
    pub fn emit(&self, event: impl Into<EventRef>, args: A) -> Result<(), RegistryError> {
        let event = event.into();
        let (module, name) = self.resolve(&event);

        // Handlers run without the lock held so they can call back into the registry
        let handlers = {
            let modules = self.read();
            let Some(events) = modules.get(module) else {
                debug!(module = %module, event = %name, "Emitted an unlistened event");
                return Ok(());
            };
            match events.get(name) {
                Some(handlers) => handlers.clone(),
                None => {
                    debug!(module = %module, event = %name, "Event not listened under this module");
                    return Ok(());
                }
            }
        };

        debug!(
            module = %module,
            event = %name,
            handler_count = handlers.len(),
            "Dispatching event"
        );

        for handler in &handlers {
            handler(&args).map_err(|source| RegistryError::Handler {
                module: module.to_string(),
                event: name.to_string(),
                source,
            })?;
        }

        if event.only_once() {
            self.remove_event(module, name);
        }

        Ok(())
    }

    /// Schedules `emit` after the requested timeout
    ///
    /// There is no way to cancel the emission once scheduled. Handler errors
    /// raised when it fires are logged since no caller is left to receive them.
    pub fn emit_delay(
        &self,
        options: impl Into<DelayOptions>,
        args: A,
    ) -> Result<(), RegistryError>
    where
        A: Send + 'static,
    {
        let options = options.into();
        let delay = options.delay_or(self.default_delay);
        let runtime = Handle::try_current().map_err(|_| RegistryError::NoRuntime)?;

        debug!(
            event = %options.target.event_name(),
            delay_ms = delay.as_millis() as u64,
            "Scheduling delayed emission"
        );

        let registry = self.clone();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = registry.emit(options.target, args) {
                error!(error = %e, "Delayed emission failed");
            }
        });

        Ok(())
    }

    /// Removes every handler of an event
    #[instrument(skip(self, event), fields(scope = %self.module_name))]
    pub fn off(&self, event: impl Into<EventRef>) {
        let event = event.into();
        let (module, name) = self.resolve(&event);

        if !self.remove_event(module, name) {
            debug!(module = %module, event = %name, "No such event is listened");
        }
    }

    /// Drops all modules, events and handlers
    pub fn off_all(&self) {
        let mut modules = self.write();
        info!(
            scope = %self.module_name,
            module_count = modules.len(),
            "Removing all event handlers"
        );
        modules.clear();
    }

    /// Drops every event of the named modules
    ///
    /// Accepts a non-empty module name or a list of names. Unknown modules
    /// are skipped.
    pub fn off_by_module<M>(&self, module_names: M) -> Result<(), RegistryError>
    where
        M: TryInto<ModuleNames>,
        RegistryError: From<M::Error>,
    {
        let module_names: ModuleNames = module_names.try_into()?;

        let mut modules = self.write();
        for module in module_names.iter() {
            if modules.remove(module).is_some() {
                info!(module = %module, "Removed module handlers");
            } else {
                debug!(module = %module, "Module has no handlers, skipping");
            }
        }

        Ok(())
    }

    pub fn has_module(&self, module_name: &str) -> bool {
        self.read().contains_key(module_name)
    }

    pub fn is_listening(&self, event: impl Into<EventRef>) -> bool {
        self.handler_count(event) > 0
    }

    /// Number of handlers an emission of this event would invoke
    pub fn handler_count(&self, event: impl Into<EventRef>) -> usize {
        let event = event.into();
        let (module, name) = self.resolve(&event);

        self.read()
            .get(module)
            .and_then(|events| events.get(name))
            .map_or(0, Vec::len)
    }

    /// Modules that currently have handlers, sorted
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Module a reference addresses under this registry's mode
    fn resolve<'a>(&'a self, event: &'a EventRef) -> (&'a str, &'a str) {
        let module = match self.mode {
            DispatchMode::Global => event.module_name().unwrap_or(self.module_name.as_str()),
            DispatchMode::Single => self.module_name.as_str(),
        };
        (module, event.event_name())
    }

    /// Returns whether the event existed. Empty modules are dropped.
    fn remove_event(&self, module: &str, name: &str) -> bool {
        let mut modules = self.write();
        let Some(events) = modules.get_mut(module) else {
            return false;
        };

        let removed = events.remove(name).is_some();
        if events.is_empty() {
            modules.remove(module);
        }

        if removed {
            debug!(module = %module, event = %name, "Event handlers removed");
        }
        removed
    }

    fn read(&self) -> RwLockReadGuard<'_, EventMap<A>> {
        self.modules.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EventMap<A>> {
        self.modules.write().unwrap_or_else(PoisonError::into_inner)
    }
}
