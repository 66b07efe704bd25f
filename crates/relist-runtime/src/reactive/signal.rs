#![forbid(unsafe_code)]

//! Version-tracked value with replacement notification.
//!
//! # Design
//!
//! [`Signal<T>`] keeps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Every [`replace`](Signal::replace) bumps the
//! version and notifies live subscribers in registration order, even when the
//! new value compares equal to the old one: a replacement is an event in its
//! own right (a commit that happens to keep the order is still a commit).
//!
//! Inside a [`HandlerTurn`](super::HandlerTurn) notifications are deferred
//! until the outermost turn ends; each subscriber then sees only the latest
//! value.
//!
//! # Failure Modes
//!
//! - **Re-entrant replace from a subscriber**: allowed; the borrow is released
//!   before callbacks run.
//! - **Subscriber leak**: callbacks live as long as their [`Subscription`]
//!   guard. Dead weak references are pruned during notification.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, info_span};
use web_time::Instant;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct SignalInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning a `Signal` creates a new handle to the **same** value and
/// subscriber list.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each replacement.
/// 2. Readers observe either the previous or the new value, never a mix:
///    the value is swapped as a whole.
/// 3. Subscribers are notified in registration order.
pub struct Signal<T> {
    inner: Rc<RefCell<SignalInner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Signal")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Create a signal at version 0 with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, returning the previous one, and notify subscribers.
    pub fn replace(&self, value: T) -> T {
        let old = {
            let mut inner = self.inner.borrow_mut();
            inner.version += 1;
            std::mem::replace(&mut inner.value, value)
        };
        self.notify();
        old
    }

    /// Subscribe to replacements.
    ///
    /// Dropping the returned [`Subscription`] unsubscribes the callback.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Current version number.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let callbacks: Vec<CallbackRc<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };

        if callbacks.is_empty() {
            return;
        }

        if super::turn::in_turn() {
            super::turn::record_change();
            for cb in callbacks {
                // Keyed by callback identity: the last replacement in a turn wins.
                let key = Rc::as_ptr(&cb) as *const () as usize;
                let source = self.clone();
                super::turn::defer_keyed(key, move || {
                    let latest = source.get();
                    cb(&latest);
                });
            }
            return;
        }

        let value = self.get();
        let subscribers = callbacks.len() as u64;
        let start = Instant::now();
        let _span = info_span!(
            "relist.notify",
            subscribers,
            duration_us = tracing::field::Empty
        )
        .entered();

        for cb in &callbacks {
            cb(&value);
        }

        let duration_us = start.elapsed().as_micros() as u64;
        tracing::Span::current().record("duration_us", duration_us);
        debug!(message = "relist.notify.done", subscribers, duration_us);
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping it makes the callback unreachable; the signal prunes the dead
/// entry on its next notification.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
