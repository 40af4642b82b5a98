use heapless::Vec;

use crate::classifier::{Events, MAX_EVENTS};
use crate::event_kind::EventKind;

/// A button callback. Plain function pointers keep the table `Copy` and allocation free.
pub type Handler = fn();

/// One optional handler per [`EventKind`]. Registering replaces whatever was there.
#[derive(Clone, Copy, Debug, Default)]
pub struct CallbackTable {
    slots: [Option<Handler>; EventKind::COUNT],
}

impl CallbackTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [None; EventKind::COUNT],
        }
    }

    /// Replace the handler for `kind`. `None` turns dispatch for that kind off.
    pub fn set(&mut self, kind: EventKind, handler: Option<Handler>) {
        if let Some(slot) = self.slots.get_mut(kind.index()) {
            *slot = handler;
        }
    }

    #[must_use]
    pub fn get(&self, kind: EventKind) -> Option<Handler> {
        self.slots.get(kind.index()).copied().flatten()
    }

    /// Snapshot the handlers for `events`, in order, skipping kinds with no handler.
    ///
    /// The snapshot is taken while the classifier is locked and run after the lock is
    /// released, so a handler may re-register callbacks.
    pub fn dispatch_for(&self, events: &Events) -> Dispatch {
        let mut handlers = Vec::new();
        for handler in events.iter().filter_map(|kind| self.get(*kind)) {
            // Capacity matches `Events`, so this cannot overflow.
            if handlers.push(handler).is_err() {
                break;
            }
        }
        Dispatch { handlers }
    }
}

/// Handlers waiting to be called, in classification order.
#[derive(Debug, Default)]
#[must_use = "handlers only run when `run` is called"]
pub struct Dispatch {
    handlers: Vec<Handler, MAX_EVENTS>,
}

impl Dispatch {
    pub fn run(self) {
        for handler in self.handlers {
            handler();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
