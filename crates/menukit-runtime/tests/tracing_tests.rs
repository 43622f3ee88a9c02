#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! Spans and events enabled:
//!   cargo test -p menukit-runtime --features tracing --test tracing_tests
//!
//! Without the feature the logging macros compile to nothing:
//!   cargo test -p menukit-runtime --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use menukit_core::event::{Event, KeyCode};
use menukit_runtime::{Menu, MenuConfig, MenuController};
use menukit_widgets::Widget;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span with its fields and parent.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

/// A captured log event.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

/// A tracing Layer that records spans and events.
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Handle to read what was captured.
struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

/// Visitor that extracts fields as strings.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

/// Run `f` under a subscriber that captures spans and events.
fn with_capture<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

fn two_button_controller() -> MenuController {
    let mut root = Menu::new("Main", MenuConfig::default()).unwrap();
    root.add_with_id("play", Widget::button("Play")).unwrap();
    root.add_with_id("quit", Widget::button("Quit")).unwrap();
    MenuController::new(root)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn layout_pass_runs_in_a_span() {
    let handle = with_capture(|| {
        let _ = two_button_controller();
    });
    let layout_spans: Vec<_> = handle
        .spans()
        .into_iter()
        .filter(|s| s.name == "menu_layout")
        .collect();
    assert!(!layout_spans.is_empty());
    assert!(
        layout_spans
            .iter()
            .all(|s| s.fields.get("menu").map(String::as_str) == Some("Main"))
    );
}

#[test]
#[cfg(feature = "tracing")]
fn focus_changes_log_at_debug() {
    let handle = with_capture(|| {
        let mut controller = two_button_controller();
        controller.update(&[Event::key(KeyCode::Down)]);
    });
    let focus: Vec<_> = handle
        .events()
        .into_iter()
        .filter(|e| e.message() == "focus changed")
        .collect();
    assert_eq!(focus.len(), 2);
    assert!(focus.iter().all(|e| e.level == tracing::Level::DEBUG));
    assert_eq!(
        focus.last().and_then(|e| e.fields.get("widget")).map(String::as_str),
        Some("quit")
    );

    let update = handle
        .spans()
        .into_iter()
        .find(|s| s.name == "menu_update")
        .expect("update span");
    assert_eq!(update.fields.get("events").map(String::as_str), Some("1"));
}

#[test]
#[cfg(feature = "tracing")]
fn stack_changes_log_at_info_and_stale_ids_at_warn() {
    let handle = with_capture(|| {
        let mut controller = two_button_controller();
        let child = controller.add_menu(Menu::new("Options", MenuConfig::default()).unwrap());
        controller.open(child);
        controller.back();
        controller.open(menukit_widgets::MenuId(42));
        if let Some(menu) = controller.current_menu_mut() {
            menu.remove("ghost");
        }
    });
    let events = handle.events();
    let info: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::INFO)
        .map(CapturedEvent::message)
        .collect();
    assert_eq!(info, ["menu opened", "menu popped"]);
    let warnings = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .count();
    assert_eq!(warnings, 2);
}

#[test]
fn zero_overhead_without_subscriber() {
    let mut controller = two_button_controller();
    assert!(controller.update(&[Event::key(KeyCode::Down)]));
    assert_eq!(
        controller.focused_widget_id().map(|id| id.as_str()),
        Some("quit")
    );
}

#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_nothing_captured() {
    let handle = with_capture(|| {
        let mut controller = two_button_controller();
        controller.update(&[Event::key(KeyCode::Down)]);
    });
    assert!(handle.spans().is_empty());
    assert!(handle.events().is_empty());
}
