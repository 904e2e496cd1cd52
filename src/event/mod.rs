// Event registry components
//
// Named handlers grouped by module, dispatched synchronously on emit.

// Public API - what other modules can use
pub use handler::{handler, Handler, HandlerError};
pub use reference::{DelayOptions, EventOptions, EventRef, ModuleNames};
pub use registry::{DispatchMode, EventRegistry, HandlerPolicy};

// Internal modules
mod handler;
mod reference;
mod registry;
