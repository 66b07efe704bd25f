#![forbid(unsafe_code)]

//! Handler-turn flush logging and notification ordering.
//!
//! Run:
//!   cargo test -p relist-runtime --test turn_tracing

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use relist_runtime::{HandlerTurn, Memo, Signal};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

struct SpanNames {
    names: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for SpanNames
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        self.names
            .lock()
            .expect("span names lock")
            .push(attrs.metadata().name().to_owned());
    }
}

fn spans_of(run: impl FnOnce()) -> Vec<String> {
    let names = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(SpanNames {
        names: Arc::clone(&names),
    });
    tracing::subscriber::with_default(subscriber, run);
    let out = names.lock().expect("span names lock").clone();
    out
}

#[test]
fn flush_span_only_when_notifications_pending() {
    let spans = spans_of(|| {
        let sig = Signal::new(0u32);
        let _sub = sig.subscribe(|_| {});
        {
            let _turn = HandlerTurn::begin("empty");
        }
        {
            let _turn = HandlerTurn::begin("busy");
            sig.replace(1);
        }
    });
    assert_eq!(
        spans.iter().filter(|s| *s == "relist.turn.flush").count(),
        1
    );
}

#[test]
fn immediate_notify_outside_turn_has_span() {
    let spans = spans_of(|| {
        let sig = Signal::new(0u32);
        let _sub = sig.subscribe(|_| {});
        sig.replace(1);
    });
    assert!(spans.iter().any(|s| s == "relist.notify"));
}

#[test]
fn subscribers_see_consistent_state_after_turn() {
    let a = Signal::new(0);
    let b = Signal::new(0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let b_reader = b.clone();
    let _sub = a.subscribe(move |v| s.borrow_mut().push((*v, b_reader.get())));

    {
        let _turn = HandlerTurn::begin("pair");
        a.replace(1);
        b.replace(10);
    }
    assert_eq!(*seen.borrow(), vec![(1, 10)]);
}

#[test]
fn memo_guards_derived_value_across_turns() {
    let source = Signal::new(vec![1, 2, 3]);
    let mut memo: Memo<u64, usize> = Memo::new();
    let derive = |memo: &mut Memo<u64, usize>| {
        memo.get_or_compute(source.version(), || source.with(Vec::len))
    };

    assert_eq!(derive(&mut memo), 3);
    assert_eq!(derive(&mut memo), 3);
    {
        let _turn = HandlerTurn::begin("grow");
        source.replace(vec![1, 2, 3, 4]);
    }
    assert_eq!(derive(&mut memo), 4);
    assert_eq!(memo.computations(), 2);
    assert_eq!(memo.hits(), 1);
}
