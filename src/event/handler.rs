use std::sync::Arc;
use thiserror::Error;

/// Errors a handler can report back to the emitter
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Handler failed: {0}")]
    Failed(String),

    #[error("Handler rejected arguments: {0}")]
    Rejected(String),
}

impl HandlerError {
    /// Create a generic failure
    pub fn failed(msg: impl Into<String>) -> Self {
        HandlerError::Failed(msg.into())
    }

    /// Create an error for arguments the handler cannot work with
    pub fn rejected(msg: impl Into<String>) -> Self {
        HandlerError::Rejected(msg.into())
    }
}

/// A registered event handler
///
/// Every handler of one emission receives a reference to the same argument
/// payload. Returning an error stops the emission; handlers registered after
/// the failing one are not invoked.
pub type Handler<A> = Arc<dyn Fn(&A) -> Result<(), HandlerError> + Send + Sync>;

/// Wraps a closure into a shareable handler
pub fn handler<A, F>(f: F) -> Handler<A>
where
    F: Fn(&A) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Arc::new(f)
}
