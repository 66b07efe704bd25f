#![forbid(unsafe_code)]

//! Structured log events emitted by the reorder component.
//!
//! Run:
//!   cargo test -p relist-widgets --test tracing_capture

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use relist_core::event::{KeyCode, RowEvent};
use relist_widgets::{Item, ReorderList};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Default)]
struct Captured {
    events: Vec<HashMap<String, String>>,
    spans: Vec<String>,
    recorded_durations: Vec<String>,
}

impl Captured {
    fn with_message(&self, message: &str) -> Vec<&HashMap<String, String>> {
        self.events
            .iter()
            .filter(|e| e.get("message").map(String::as_str) == Some(message))
            .collect()
    }
}

struct CaptureLayer {
    state: Arc<Mutex<Captured>>,
}

#[derive(Default)]
struct FieldVisitor {
    fields: HashMap<String, String>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.insert(field.name().to_owned(), value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields.insert(
            field.name().to_owned(),
            format!("{value:?}").trim_matches('"').to_owned(),
        );
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        self.state
            .lock()
            .expect("capture lock")
            .spans
            .push(attrs.metadata().name().to_owned());
    }

    fn on_record(&self, id: &tracing::Id, values: &tracing::span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::default();
        values.record(&mut visitor);
        if visitor.fields.contains_key("duration_us") {
            self.state
                .lock()
                .expect("capture lock")
                .recorded_durations
                .push(span.metadata().name().to_owned());
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.state
            .lock()
            .expect("capture lock")
            .events
            .push(visitor.fields);
    }
}

fn capture(run: impl FnOnce()) -> Captured {
    let state = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        state: Arc::clone(&state),
    });
    tracing::subscriber::with_default(subscriber, run);
    let mut guard = state.lock().expect("capture lock");
    std::mem::take(&mut *guard)
}

fn list() -> ReorderList {
    ReorderList::new((1..=4).map(|i| Item::new(i, format!("Task {i}")))).expect("unique ids")
}

#[test]
fn transitions_are_logged_with_fields() {
    let captured = capture(|| {
        let mut l = list();
        l.handle_event(RowEvent::key(KeyCode::SPACE));
        l.handle_event(RowEvent::key(KeyCode::Down));
        l.handle_event(RowEvent::key(KeyCode::SPACE));
    });

    let transitions = captured.with_message("relist.transition");
    let kinds: Vec<&str> = transitions
        .iter()
        .filter_map(|e| e.get("kind").map(String::as_str))
        .collect();
    assert_eq!(kinds, ["grabbed", "moved", "dropped"]);

    let moved = transitions[1];
    assert_eq!(moved.get("source").map(String::as_str), Some("0"));
    assert_eq!(moved.get("target").map(String::as_str), Some("1"));
    assert_eq!(moved.get("len").map(String::as_str), Some("4"));
    assert_eq!(moved.get("mode").map(String::as_str), Some("keyboard"));

    let actions: Vec<&str> = transitions
        .iter()
        .filter_map(|e| e.get("action").map(String::as_str))
        .collect();
    assert_eq!(actions, ["toggle_grab", "move_down", "toggle_grab"]);
}

#[test]
fn pointer_transitions_carry_no_key_action() {
    let captured = capture(|| {
        let mut l = list();
        l.handle_event(RowEvent::DragStart { index: 0 });
    });

    let transitions = captured.with_message("relist.transition");
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].get("action").map(String::as_str), Some("none"));
}

#[test]
fn ignored_events_carry_reason() {
    let captured = capture(|| {
        let mut l = list();
        l.handle_event(RowEvent::DragStart { index: 0 });
        l.handle_event(RowEvent::drop_with_id(3));
        l.handle_event(RowEvent::DragStart { index: 9 });
    });

    let reasons: Vec<&str> = captured
        .with_message("relist.ignored")
        .iter()
        .filter_map(|e| e.get("reason").map(String::as_str))
        .collect();
    assert_eq!(reasons, ["payload_mismatch", "already_active"]);
}

#[test]
fn projection_and_commit_spans() {
    let captured = capture(|| {
        let mut l = list();
        l.handle_event(RowEvent::DragStart { index: 0 });
        l.handle_event(RowEvent::drag_over(2, 30.0, 40.0));
        let _ = l.preview();
        l.handle_event(RowEvent::drop_with_id(1));
    });

    assert!(captured.spans.iter().any(|s| s == "relist.project"));
    assert!(captured.spans.iter().any(|s| s == "relist.commit"));
    assert!(
        captured
            .recorded_durations
            .iter()
            .any(|s| s == "relist.project")
    );
}
