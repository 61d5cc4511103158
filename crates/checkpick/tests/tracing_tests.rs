#![forbid(unsafe_code)]

//! Tracing instrumentation tests.
//!
//! Spans and events enabled:
//!   cargo test -p checkpick --features tracing --test tracing_tests
//!
//! Without the feature only the zero-overhead check runs:
//!   cargo test -p checkpick --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use checkpick::{CheckPicker, Item, Origin, PickerConfig};

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

/// Layer recording span creations and event messages.
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone)]
struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<String>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

/// Visitor that extracts fields as strings.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
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
        if let Some((_, message)) = visitor.0.into_iter().find(|(name, _)| name == "message") {
            self.events.lock().unwrap().push(message);
        }
    }
}

fn with_captured<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let handle = CaptureHandle {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(Capture { spans, events });
    tracing::subscriber::with_default(subscriber, f);
    handle
}

fn fruit_picker() -> CheckPicker {
    CheckPicker::new(
        PickerConfig::new()
            .data(vec![
                Item::new(1, "Apple"),
                Item::new(2, "Banana"),
                Item::new(3, "Cherry"),
            ])
            .locale("en"),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn transitions_create_spans() {
    let handle = with_captured(|| {
        let mut picker = fruit_picker();
        picker.open();
        if let Some(token) = picker.pending_transition() {
            picker.finish_transition(token);
        }
        picker.close();
    });

    let spans = handle.spans();
    let ops: Vec<_> = spans
        .iter()
        .filter(|s| s.name == "picker_transition")
        .filter_map(|s| s.fields.get("op").cloned())
        .collect();
    assert_eq!(ops, ["open", "finish", "close"]);

    let nested_refresh = spans
        .iter()
        .any(|s| s.name == "picker_refresh" && s.parent_name.as_deref() == Some("picker_transition"));
    assert!(nested_refresh, "refresh should run inside the finish span: {spans:?}");
}

#[test]
#[cfg(feature = "tracing")]
fn search_span_wraps_refresh() {
    let handle = with_captured(|| {
        let mut picker = fruit_picker();
        picker.set_keyword("an", Origin::Input);
    });
    let spans = handle.spans();
    assert!(spans.iter().any(|s| s.name == "picker_search"));
    assert!(
        spans
            .iter()
            .any(|s| s.name == "picker_refresh" && s.parent_name.as_deref() == Some("picker_search"))
    );
}

#[test]
#[cfg(feature = "tracing")]
fn stale_tokens_and_selection_changes_are_logged() {
    let handle = with_captured(|| {
        let mut picker = fruit_picker();
        picker.open();
        let stale = picker.pending_transition();
        picker.close();
        if let Some(token) = stale {
            picker.finish_transition(token);
        }
        picker.toggle(&2.into(), Origin::Programmatic);
    });
    let events = handle.events();
    assert!(events.iter().any(|m| m.contains("stale transition token")), "{events:?}");
    assert!(events.iter().any(|m| m.contains("selection toggled")), "{events:?}");
}

#[test]
#[cfg(feature = "tracing")]
fn mode_switch_logs_a_warning() {
    let handle = with_captured(|| {
        let mut picker = fruit_picker();
        let _ = picker.sync_controlled([1]);
    });
    assert!(
        handle
            .events()
            .iter()
            .any(|m| m.contains("controlled value supplied"))
    );
}

#[test]
#[cfg(all(feature = "tracing", feature = "serde"))]
fn skipped_records_are_logged() {
    use checkpick::{Dataset, FieldKeys};

    let handle = with_captured(|| {
        let records = serde_json::json!([
            {"value": 1, "label": "Apple"},
            {"label": "No value"},
        ]);
        let data = Dataset::from_json(&records, &FieldKeys::default());
        assert_eq!(data.len(), 1);
    });
    let events = handle.events();
    assert_eq!(
        events.iter().filter(|m| m.contains("skipping record")).count(),
        1,
        "{events:?}"
    );
}

/// Without the feature the engine emits nothing.
#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_without_feature() {
    let handle = with_captured(|| {
        let mut picker = fruit_picker();
        picker.open();
        picker.set_keyword("an", Origin::Input);
        picker.toggle(&2.into(), Origin::Programmatic);
    });
    assert!(handle.spans().is_empty());
    assert!(handle.events().is_empty());
}
