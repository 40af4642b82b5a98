//! Debounce one push button and classify it into press, release, double-click, short-press
//! and long-press events.
#![cfg_attr(not(test), no_std)]

mod callback_table;
mod classifier;
mod event_kind;
mod hold_timer;
mod shared_classifier;

#[cfg(all(feature = "pico1", not(feature = "host")))]
mod button_events;
#[cfg(all(feature = "pico1", not(feature = "host")))]
mod error;

// Re-export commonly used items
pub use callback_table::{CallbackTable, Dispatch, Handler};
pub use classifier::{
    ButtonEventClassifier, DOUBLE_CLICK_COUNT, DOUBLE_CLICK_WINDOW_MS, Events, LONG_PRESS_MS,
    LineState, MAX_EVENTS, PressSession, SHORT_PRESS_MS,
};
pub use event_kind::EventKind;
pub use hold_timer::{HoldTicker, HoldTimer, TickSchedule};
pub use shared_classifier::{Clock, SharedClassifier};

/// Line levels as reported by the edge interrupt (`Low` = pressed).
pub use embedded_hal::digital::PinState;

#[cfg(all(feature = "pico1", not(feature = "host")))]
pub use button_events::{ButtonEvents, ButtonEventsShared, EmbassyClock};
#[cfg(all(feature = "pico1", not(feature = "host")))]
pub use error::{Error, Result};
