use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embedded_hal::digital::PinState;

use crate::callback_table::Handler;
use crate::classifier::{ButtonEventClassifier, Events};
use crate::event_kind::EventKind;
use crate::hold_timer::HoldTimer;

/// Monotonic millisecond clock. Wraps at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// A [`ButtonEventClassifier`] that edge and timer interrupts can share.
///
/// Every read-modify-write of the classifier happens inside a critical section.
/// Handlers are collected there and called after it ends, so they run with interrupts
/// enabled and may call [`register_callback`](Self::register_callback) themselves.
///
/// `new` is `const`, so the usual home for one of these is a `static`.
pub struct SharedClassifier<T, C> {
    classifier: Mutex<CriticalSectionRawMutex, RefCell<ButtonEventClassifier<T>>>,
    clock: C,
}

impl<T, C> SharedClassifier<T, C> {
    #[must_use]
    pub const fn new(hold_timer: T, clock: C) -> Self {
        Self {
            classifier: Mutex::new(RefCell::new(ButtonEventClassifier::new(hold_timer))),
            clock,
        }
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Replace the handler for `kind`; `None` disables it. Safe from any context,
    /// including from inside a handler.
    pub fn register_callback(&self, kind: EventKind, handler: Option<Handler>) {
        self.classifier.lock(|classifier| {
            classifier.borrow_mut().register_callback(kind, handler);
        });
    }

    /// Run `f` against the hold timer, e.g. to learn whether it was restarted.
    pub fn with_timer<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.classifier
            .lock(|classifier| f(classifier.borrow().hold_timer()))
    }

    /// Run `f` against a consistent view of the whole classifier.
    pub fn inspect<R>(&self, f: impl FnOnce(&ButtonEventClassifier<T>) -> R) -> R {
        self.classifier.lock(|classifier| f(&classifier.borrow()))
    }
}

impl<T: HoldTimer, C: Clock> SharedClassifier<T, C> {
    /// Edge interrupt entry point: classify `level`, then call the matching handlers.
    pub fn on_edge(&self, level: PinState) -> Events {
        let (events, dispatch) = self.classifier.lock(|classifier| {
            let mut classifier = classifier.borrow_mut();
            let events = classifier.on_edge(level, self.clock.now_ms());
            let dispatch = classifier.dispatch_for(&events);
            (events, dispatch)
        });
        dispatch.run();
        events
    }

    /// Hold timer entry point: classify the expiry, then call the matching handlers.
    pub fn on_timer_expiry(&self) -> Events {
        let (events, dispatch) = self.classifier.lock(|classifier| {
            let mut classifier = classifier.borrow_mut();
            let events = classifier.on_timer_expiry(self.clock.now_ms());
            let dispatch = classifier.dispatch_for(&events);
            (events, dispatch)
        });
        dispatch.run();
        events
    }
}
