mod utils;

use std::time::Duration;

use module_events::{
    bind_registry, BoundConsumer, ConsumerDescriptor, DelayOptions, EventOptions, HandlerError,
    RegistryConfig, RegistryError, RegistryHandle, SharedRegistry,
};
use serde_json::json;
use utils::Recorder;

// ============================================================================
// Consumers used across the workflow
// ============================================================================

/// Class-style consumer: every instance registers its own listener
struct ChatPanel {
    events: RegistryHandle<String>,
}

impl ChatPanel {
    fn mount(events: &RegistryHandle<String>, recorder: &Recorder<String>, tag: &str) -> Self {
        events.on("message", recorder.handler(tag));
        Self {
            events: events.clone(),
        }
    }
}

impl BoundConsumer<String> for ChatPanel {
    fn registry(&self) -> &RegistryHandle<String> {
        &self.events
    }
}

fn test_config() -> RegistryConfig {
    RegistryConfig {
        default_module_name: "Global".to_string(),
        default_delay: Duration::from_millis(3000),
    }
}

// ============================================================================
// Workflows
// ============================================================================

#[test]
fn test_class_consumer_instances_all_receive_messages() {
    let events: RegistryHandle<String> = bind_registry(&ConsumerDescriptor::class("ChatPanel"));
    let recorder = Recorder::new();

    let first = ChatPanel::mount(&events, &recorder, "first");
    let _second = ChatPanel::mount(&events, &recorder, "second");

    first
        .registry()
        .emit("message", "hello".to_string())
        .unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            ("first".to_string(), "hello".to_string()),
            ("second".to_string(), "hello".to_string()),
        ]
    );
}

#[test]
fn test_function_consumer_rerender_does_not_duplicate() {
    let events: RegistryHandle<u32> = bind_registry(&ConsumerDescriptor::function("Badge"));
    let recorder = Recorder::new();

    for render in ["render-1", "render-2", "render-3"] {
        events.on("count", recorder.handler(render));
    }

    events.emit("count", 7).unwrap();

    assert_eq!(recorder.calls(), vec![("render-1".to_string(), 7)]);
}

#[test]
fn test_shared_registry_routes_by_module() {
    let shared: SharedRegistry<serde_json::Value> = SharedRegistry::from_config(&test_config());
    let recorder = Recorder::new();

    shared.on(EventOptions::new("Cart", "updated"), recorder.handler("cart"));
    shared.on(EventOptions::new("Profile", "updated"), recorder.handler("profile"));

    shared
        .emit(EventOptions::new("Cart", "updated"), json!({ "items": 2 }))
        .unwrap();

    assert_eq!(
        recorder.calls(),
        vec![("cart".to_string(), json!({ "items": 2 }))]
    );
}

#[test]
fn test_once_listener_fires_a_single_time() {
    let shared: SharedRegistry<()> = SharedRegistry::from_config(&test_config());
    let recorder = Recorder::new();

    shared.on(EventOptions::new("Auth", "ready"), recorder.handler("a"));
    shared.on(EventOptions::new("Auth", "ready"), recorder.handler("b"));

    shared.emit(EventOptions::new("Auth", "ready").once(), ()).unwrap();
    shared.emit(EventOptions::new("Auth", "ready").once(), ()).unwrap();

    assert_eq!(recorder.tags(), vec!["a", "b"]);
    assert!(!shared.is_listening(EventOptions::new("Auth", "ready")));
}

#[test]
fn test_bulk_teardown_and_reset() {
    let shared: SharedRegistry<()> = SharedRegistry::from_config(&test_config());
    let recorder = Recorder::new();

    for module in ["A", "B", "C"] {
        shared.on(EventOptions::new(module, "E"), recorder.handler(module));
    }

    shared.off_by_module(vec!["A", "C"]).unwrap();
    for module in ["A", "B", "C"] {
        shared.emit(EventOptions::new(module, "E"), ()).unwrap();
    }
    assert_eq!(recorder.tags(), vec!["B"]);

    let err = shared.off_by_module(json!(12)).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidArgument(_)));

    shared.off_all();
    shared.emit(EventOptions::new("B", "E"), ()).unwrap();
    assert_eq!(recorder.tags(), vec!["B"]);
}

#[test]
fn test_handler_failure_reaches_emitter() {
    let shared: SharedRegistry<()> = SharedRegistry::from_config(&test_config());
    let recorder = Recorder::new();

    shared.on(EventOptions::new("Upload", "done"), |_: &()| {
        Err(HandlerError::failed("disk full"))
    });
    shared.on(EventOptions::new("Upload", "done"), recorder.handler("never"));

    let err = shared
        .emit(EventOptions::new("Upload", "done"), ())
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Handler for Upload/done failed: Handler failed: disk full"
    );
    assert!(recorder.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_delayed_emission_on_bound_registry() {
    let events: RegistryHandle<String> =
        module_events::binding::bind_registry_with_config(
            &ConsumerDescriptor::class("Toast"),
            &test_config(),
        );
    let recorder = Recorder::new();
    events.on("show", recorder.handler("toast"));

    events
        .emit_delay(
            DelayOptions::new(EventOptions::new("Elsewhere", "show").once()).with_timeout(10),
            "saved".to_string(),
        )
        .unwrap();
    events.emit_delay("show", "default delay".to_string()).unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(
        recorder.calls(),
        vec![("toast".to_string(), "saved".to_string())]
    );

    // The once-only emission removed the event before the default-delay one fired
    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(recorder.calls().len(), 1);
    assert!(events.module_names().is_empty());
}
