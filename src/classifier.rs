//! Turns a stream of line levels plus hold-timer expiries into button events.
//!
//! The line is pulled up, so `Low` means pressed and `High` means released. Two
//! stimuli drive the state machine:
//!
//! - [`ButtonEventClassifier::on_edge`] on every reported transition, and
//! - [`ButtonEventClassifier::on_timer_expiry`] each time the periodic hold timer fires.
//!
//! Both return the events they classified, in the order their handlers must run.
//! Neither calls handlers itself; see [`SharedClassifier`](crate::SharedClassifier) for
//! the locked wrapper that does.

use embedded_hal::digital::PinState;
use heapless::Vec;

use crate::callback_table::{CallbackTable, Dispatch, Handler};
use crate::event_kind::EventKind;
use crate::hold_timer::HoldTimer;

/// Presses that make a double click.
pub const DOUBLE_CLICK_COUNT: u8 = 2;
/// The second press must land within this many milliseconds of the first.
pub const DOUBLE_CLICK_WINDOW_MS: u32 = 500;
/// Hold time that reports [`EventKind::ShortPress`]. Also the hold timer period.
pub const SHORT_PRESS_MS: u32 = 2_000;
/// Hold time that reports [`EventKind::LongPress`] and stops the hold timer.
pub const LONG_PRESS_MS: u32 = 4_000;

/// Most events one stimulus can produce (`DoubleClick` then `Release`).
pub const MAX_EVENTS: usize = 2;

/// Events classified from a single stimulus, in dispatch order.
pub type Events = Vec<EventKind, MAX_EVENTS>;

/// Last level the line reported.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineState {
    /// Nothing reported yet; the first report is always accepted.
    #[default]
    Unknown,
    High,
    Low,
}

impl From<PinState> for LineState {
    fn from(level: PinState) -> Self {
        match level {
            PinState::High => Self::High,
            PinState::Low => Self::Low,
        }
    }
}

/// Bookkeeping for double-click detection and hold timing.
///
/// `first_press_ms == 0` means no session is active, so a press stamped at exactly
/// millisecond 0 does not open a session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressSession {
    press_count: u8,
    first_press_ms: u32,
}

impl PressSession {
    pub const EMPTY: Self = Self {
        press_count: 0,
        first_press_ms: 0,
    };

    #[must_use]
    pub const fn press_count(&self) -> u8 {
        self.press_count
    }

    /// When the session's first press happened, `None` when no session is active.
    #[must_use]
    pub const fn first_press_ms(&self) -> Option<u32> {
        if self.first_press_ms == 0 {
            None
        } else {
            Some(self.first_press_ms)
        }
    }

    /// Milliseconds since the first press, modulo `u32` wraparound. Zero without a session.
    const fn elapsed_ms(&self, now_ms: u32) -> u32 {
        if self.first_press_ms == 0 {
            0
        } else {
            now_ms.wrapping_sub(self.first_press_ms)
        }
    }

    // A third press still counts (reaching 3) and is only evicted by the edge after it.
    const fn is_stale(&self, elapsed_ms: u32) -> bool {
        self.press_count > DOUBLE_CLICK_COUNT || elapsed_ms >= DOUBLE_CLICK_WINDOW_MS
    }
}

/// Debounce and classification state for one button.
///
/// Owns its callbacks and its hold timer. `T` is whatever starts and stops the periodic
/// timer on this platform; the timer's expiry must be routed back to
/// [`on_timer_expiry`](Self::on_timer_expiry).
#[derive(Debug)]
pub struct ButtonEventClassifier<T> {
    callbacks: CallbackTable,
    line: LineState,
    session: PressSession,
    hold_timer: T,
}

impl<T> ButtonEventClassifier<T> {
    #[must_use]
    pub const fn new(hold_timer: T) -> Self {
        Self {
            callbacks: CallbackTable::new(),
            line: LineState::Unknown,
            session: PressSession::EMPTY,
            hold_timer,
        }
    }

    /// Replace the handler for `kind`; `None` disables it.
    pub fn register_callback(&mut self, kind: EventKind, handler: Option<Handler>) {
        self.callbacks.set(kind, handler);
    }

    /// Handlers for `events`, ready to run once any lock on `self` is released.
    pub fn dispatch_for(&self, events: &Events) -> Dispatch {
        self.callbacks.dispatch_for(events)
    }

    #[must_use]
    pub const fn line_state(&self) -> LineState {
        self.line
    }

    #[must_use]
    pub const fn session(&self) -> PressSession {
        self.session
    }

    #[must_use]
    pub const fn hold_timer(&self) -> &T {
        &self.hold_timer
    }
}

impl<T: HoldTimer> ButtonEventClassifier<T> {
    /// Classify a reported line level observed at `now_ms`.
    ///
    /// A report equal to the previous one is contact bounce and changes nothing.
    pub fn on_edge(&mut self, level: PinState, now_ms: u32) -> Events {
        let mut events = Events::new();

        let line = LineState::from(level);
        if line == self.line {
            #[cfg(feature = "defmt")]
            defmt::trace!("button: repeated {} ignored", line);
            return events;
        }
        self.line = line;

        let elapsed_ms = self.session.elapsed_ms(now_ms);
        if self.session.is_stale(elapsed_ms) {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "button: session reset (presses={}, elapsed={}ms)",
                self.session.press_count,
                elapsed_ms
            );
            self.session = PressSession::EMPTY;
        }

        match level {
            PinState::Low => {
                self.session.press_count = self.session.press_count.saturating_add(1);
                push(&mut events, EventKind::Press);
                if self.session.first_press_ms == 0 {
                    self.session.first_press_ms = now_ms;
                }
                self.hold_timer.stop();
                self.hold_timer.start(SHORT_PRESS_MS);
            }
            PinState::High => {
                // A reset above leaves `press_count` at 0, so only a live session matches.
                if self.session.press_count == DOUBLE_CLICK_COUNT
                    && elapsed_ms < DOUBLE_CLICK_WINDOW_MS
                {
                    push(&mut events, EventKind::DoubleClick);
                }
                push(&mut events, EventKind::Release);
                self.hold_timer.stop();
            }
        }

        #[cfg(feature = "defmt")]
        defmt::info!("button: {} -> {}", line, events.as_slice());
        events
    }

    /// Classify a hold timer expiry at `now_ms`.
    ///
    /// Holding is measured from the session's first press. The first expiry past
    /// [`SHORT_PRESS_MS`] reports a short press; the first past [`LONG_PRESS_MS`] reports a
    /// long press and stops the timer for the rest of this hold.
    pub fn on_timer_expiry(&mut self, now_ms: u32) -> Events {
        let mut events = Events::new();
        let held_ms = now_ms.wrapping_sub(self.session.first_press_ms);

        if (SHORT_PRESS_MS..LONG_PRESS_MS).contains(&held_ms) {
            push(&mut events, EventKind::ShortPress);
        } else if held_ms >= LONG_PRESS_MS {
            push(&mut events, EventKind::LongPress);
            self.hold_timer.stop();
        }

        #[cfg(feature = "defmt")]
        if !events.is_empty() {
            defmt::info!("button: held {}ms -> {}", held_ms, events.as_slice());
        }
        events
    }
}

// `Events` is sized for the longest sequence a single stimulus produces.
fn push(events: &mut Events, kind: EventKind) {
    if events.push(kind).is_err() {
        #[cfg(feature = "defmt")]
        defmt::warn!("button: dropped {}", kind);
    }
}
