use std::time::Duration;
use tracing::debug;

pub const DEFAULT_MODULE_NAME: &str = "Global";
pub const DEFAULT_DELAY_MS: u64 = 3000;

/// Configuration shared by registries built in this process
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Module used when a registry is built without a name, and for
    /// name-only event references in GLOBAL mode
    pub default_module_name: String,
    /// Delay applied by `emit_delay` when no timeout is given
    pub default_delay: Duration,
}

impl RegistryConfig {
    pub fn new() -> Self {
        let default_delay_ms = std::env::var("MODULE_EVENTS_DEFAULT_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_DELAY_MS);

        let default_module_name = std::env::var("MODULE_EVENTS_DEFAULT_MODULE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_MODULE_NAME.to_string());

        debug!(
            default_module_name = %default_module_name,
            default_delay_ms = default_delay_ms,
            "Loaded registry configuration"
        );

        Self {
            default_module_name,
            default_delay: Duration::from_millis(default_delay_ms),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
