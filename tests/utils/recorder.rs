use std::sync::{Arc, Mutex};

use module_events::HandlerError;

/// Collects `(tag, payload)` pairs from handlers in invocation order
#[derive(Clone, Default)]
pub struct Recorder<A> {
    calls: Arc<Mutex<Vec<(String, A)>>>,
}

impl<A: Clone + Send + 'static> Recorder<A> {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handler closure that records its tag together with the payload
    pub fn handler(
        &self,
        tag: &str,
    ) -> impl Fn(&A) -> Result<(), HandlerError> + Send + Sync + 'static {
        let calls = self.calls.clone();
        let tag = tag.to_string();
        move |args: &A| {
            calls.lock().unwrap().push((tag.clone(), args.clone()));
            Ok(())
        }
    }

    pub fn calls(&self) -> Vec<(String, A)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.calls().into_iter().map(|(tag, _)| tag).collect()
    }
}
