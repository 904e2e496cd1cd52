use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::shared::RegistryError;

/// Structured address of an event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOptions {
    /// Ignored by SINGLE-mode registries
    pub module_name: String,
    pub event_name: String,
    /// Deregister the whole event after its first successful emission
    #[serde(default)]
    pub only_once: bool,
}

impl EventOptions {
    pub fn new(module_name: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            event_name: event_name.into(),
            only_once: false,
        }
    }

    pub fn once(mut self) -> Self {
        self.only_once = true;
        self
    }
}

/// How a caller names an event: by bare name, or with full options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRef {
    ByName(String),
    ByOption(EventOptions),
}

impl EventRef {
    pub fn event_name(&self) -> &str {
        match self {
            EventRef::ByName(name) => name,
            EventRef::ByOption(opts) => &opts.event_name,
        }
    }

    /// Module requested by the caller, if any
    pub fn module_name(&self) -> Option<&str> {
        match self {
            EventRef::ByName(_) => None,
            EventRef::ByOption(opts) => Some(&opts.module_name),
        }
    }

    pub fn only_once(&self) -> bool {
        matches!(self, EventRef::ByOption(opts) if opts.only_once)
    }
}

impl From<&str> for EventRef {
    fn from(name: &str) -> Self {
        EventRef::ByName(name.to_string())
    }
}

impl From<String> for EventRef {
    fn from(name: String) -> Self {
        EventRef::ByName(name)
    }
}

impl From<EventOptions> for EventRef {
    fn from(opts: EventOptions) -> Self {
        EventRef::ByOption(opts)
    }
}

impl From<&EventOptions> for EventRef {
    fn from(opts: &EventOptions) -> Self {
        EventRef::ByOption(opts.clone())
    }
}

/// Target and delay of a deferred emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayOptions {
    pub target: EventRef,
    /// Milliseconds; `None` or `Some(0)` falls back to the configured default
    pub timeout_ms: Option<u64>,
}

impl DelayOptions {
    pub fn new(target: impl Into<EventRef>) -> Self {
        Self {
            target: target.into(),
            timeout_ms: None,
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn delay_or(&self, default: Duration) -> Duration {
        match self.timeout_ms {
            Some(ms) if ms > 0 => Duration::from_millis(ms),
            _ => default,
        }
    }
}

impl From<&str> for DelayOptions {
    fn from(name: &str) -> Self {
        DelayOptions::new(name)
    }
}

impl From<String> for DelayOptions {
    fn from(name: String) -> Self {
        DelayOptions::new(name)
    }
}

impl From<EventOptions> for DelayOptions {
    fn from(opts: EventOptions) -> Self {
        DelayOptions::new(opts)
    }
}

impl From<EventRef> for DelayOptions {
    fn from(target: EventRef) -> Self {
        DelayOptions::new(target)
    }
}

/// Validated list of module names for bulk teardown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNames(Vec<String>);

impl ModuleNames {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn single(name: &str) -> Result<Self, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::invalid_argument(
                "module name must be a non-empty string or a list of strings",
            ));
        }
        Ok(ModuleNames(vec![name.to_string()]))
    }
}

impl TryFrom<&str> for ModuleNames {
    type Error = RegistryError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        ModuleNames::single(name)
    }
}

impl TryFrom<String> for ModuleNames {
    type Error = RegistryError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        ModuleNames::single(&name)
    }
}

impl TryFrom<Vec<String>> for ModuleNames {
    type Error = RegistryError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Ok(ModuleNames(names))
    }
}

impl TryFrom<Vec<&str>> for ModuleNames {
    type Error = RegistryError;

    fn try_from(names: Vec<&str>) -> Result<Self, Self::Error> {
        Ok(ModuleNames(names.into_iter().map(str::to_string).collect()))
    }
}

impl TryFrom<&[&str]> for ModuleNames {
    type Error = RegistryError;

    fn try_from(names: &[&str]) -> Result<Self, Self::Error> {
        Ok(ModuleNames(names.iter().map(|s| s.to_string()).collect()))
    }
}

impl<const N: usize> TryFrom<[&str; N]> for ModuleNames {
    type Error = RegistryError;

    fn try_from(names: [&str; N]) -> Result<Self, Self::Error> {
        Ok(ModuleNames(names.iter().map(|s| s.to_string()).collect()))
    }
}

/// Accepts a JSON string or array of strings; every other shape is rejected
impl TryFrom<Value> for ModuleNames {
    type Error = RegistryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(name) => ModuleNames::single(&name),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    other => Err(RegistryError::invalid_argument(format!(
                        "module list contains a non-string entry: {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ModuleNames),
            other => Err(RegistryError::invalid_argument(format!(
                "expected a module name or a list of module names, got {}",
                other
            ))),
        }
    }
}
