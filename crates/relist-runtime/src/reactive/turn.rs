#![forbid(unsafe_code)]

//! Handler turns: one synchronous input handler, one flush.
//!
//! An input handler may change several pieces of state (the committed
//! sequence, the cursor, the gesture). Subscribers must never observe the
//! component half-way through such a change, so signal notifications raised
//! while a [`HandlerTurn`] is alive are queued and delivered once, after the
//! outermost turn ends.
//!
//! # Invariants
//!
//! 1. Nested turns are supported: only the outermost one flushes.
//! 2. Values are updated immediately; only notifications are deferred.
//! 3. Keyed callbacks are coalesced: a subscriber is called at most once per
//!    turn, with the latest value, in the order it was first queued.
//!
//! # Failure Modes
//!
//! - **Callback panics during flush**: the remaining callbacks still run and
//!   the first panic is re-raised afterwards.

use std::cell::RefCell;
use tracing::{debug, debug_span};
use web_time::Instant;

type Deferred = Box<dyn FnOnce()>;

struct DeferredEntry {
    key: usize,
    notify: Deferred,
}

struct TurnContext {
    depth: u32,
    label: &'static str,
    deferred: Vec<DeferredEntry>,
    changes: u64,
}

thread_local! {
    static TURN_CTX: RefCell<Option<TurnContext>> = const { RefCell::new(None) };
}

/// Returns true while a handler turn is active on this thread.
pub fn in_turn() -> bool {
    TURN_CTX.with(|ctx| ctx.borrow().is_some())
}

/// Queue `f` under `key`, or run it immediately outside a turn.
///
/// A second callback with the same key replaces the first one but keeps its
/// queue position. Returns `true` if the callback was deferred.
pub fn defer_keyed(key: usize, f: impl FnOnce() + 'static) -> bool {
    TURN_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        if let Some(ref mut turn) = *guard {
            if let Some(entry) = turn.deferred.iter_mut().find(|e| e.key == key) {
                entry.notify = Box::new(f);
            } else {
                turn.deferred.push(DeferredEntry {
                    key,
                    notify: Box::new(f),
                });
            }
            true
        } else {
            drop(guard);
            f();
            false
        }
    })
}

/// Count one state change against the active turn.
pub fn record_change() {
    TURN_CTX.with(|ctx| {
        if let Some(ref mut turn) = *ctx.borrow_mut() {
            turn.changes = turn.changes.saturating_add(1);
        }
    });
}

fn flush() {
    let (label, changes, deferred): (&'static str, u64, Vec<Deferred>) = TURN_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        match guard.take() {
            Some(turn) => (
                turn.label,
                turn.changes,
                turn.deferred.into_iter().map(|e| e.notify).collect(),
            ),
            None => ("", 0, Vec::new()),
        }
    });

    if deferred.is_empty() {
        return;
    }

    let notifications = deferred.len() as u64;
    let start = Instant::now();
    let _span = debug_span!(
        "relist.turn.flush",
        turn = label,
        changes,
        notifications,
        duration_us = tracing::field::Empty
    )
    .entered();

    let mut first_panic: Option<Box<dyn std::any::Any + Send>> = None;
    for notify in deferred {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(notify));
        if let Err(payload) = result
            && first_panic.is_none()
        {
            first_panic = Some(payload);
        }
    }

    let duration_us = start.elapsed().as_micros() as u64;
    tracing::Span::current().record("duration_us", duration_us);
    debug!(message = "relist.turn.flushed", turn = label, notifications, duration_us);

    if let Some(payload) = first_panic {
        std::panic::resume_unwind(payload);
    }
}

/// RAII guard for one input-handler turn.
///
/// ```
/// use relist_runtime::{HandlerTurn, Signal};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let sig = Signal::new(0);
/// let calls = Rc::new(Cell::new(0));
/// let c = Rc::clone(&calls);
/// let _sub = sig.subscribe(move |_| c.set(c.get() + 1));
///
/// {
///     let _turn = HandlerTurn::begin("example");
///     sig.replace(1);
///     sig.replace(2);
///     assert_eq!(calls.get(), 0);
/// }
/// assert_eq!(calls.get(), 1);
/// ```
pub struct HandlerTurn {
    is_root: bool,
}

impl HandlerTurn {
    /// Begin a turn. Inside an active turn this only increases the nesting
    /// depth; `label` of the outermost turn is used in logs.
    #[must_use]
    pub fn begin(label: &'static str) -> Self {
        let is_root = TURN_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match *guard {
                Some(ref mut turn) => {
                    turn.depth += 1;
                    false
                }
                None => {
                    *guard = Some(TurnContext {
                        depth: 1,
                        label,
                        deferred: Vec::new(),
                        changes: 0,
                    });
                    true
                }
            }
        });
        Self { is_root }
    }

    /// Whether this guard is the outermost turn.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Number of notifications queued in the active turn.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        TURN_CTX.with(|ctx| ctx.borrow().as_ref().map_or(0, |t| t.deferred.len()))
    }
}

impl Drop for HandlerTurn {
    fn drop(&mut self) {
        let should_flush = TURN_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            if let Some(ref mut turn) = *guard {
                turn.depth -= 1;
                turn.depth == 0
            } else {
                false
            }
        });

        if should_flush {
            flush();
        }
    }
}

impl std::fmt::Debug for HandlerTurn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTurn")
            .field("is_root", &self.is_root)
            .field("pending", &self.pending_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RenderRequest
// ---------------------------------------------------------------------------

/// Coalescing re-render request.
///
/// State changes call [`request`](Self::request); the view adapter calls
/// [`take`](Self::take) once per frame. However many changes happened in
/// between, the adapter renders once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    pending: bool,
    coalesced: u64,
}

impl RenderRequest {
    /// Mark the view as needing a render.
    pub fn request(&mut self) {
        self.pending = true;
        self.coalesced = self.coalesced.saturating_add(1);
    }

    /// Whether a render is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of requests folded into the pending render.
    #[must_use]
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Consume the pending request. Returns `true` if a render is due.
    pub fn take(&mut self) -> bool {
        let due = self.pending;
        self.pending = false;
        self.coalesced = 0;
        due
    }
}
