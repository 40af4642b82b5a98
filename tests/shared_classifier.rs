//! Host-level tests for handler dispatch through `SharedClassifier`.

use core::sync::atomic::{AtomicU32, Ordering};

use button_events::{Clock, EventKind, HoldTicker, PinState, SharedClassifier};

struct ManualClock(AtomicU32);

impl ManualClock {
    const fn new(now_ms: u32) -> Self {
        Self(AtomicU32::new(now_ms))
    }

    fn set(&self, now_ms: u32) {
        self.0.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

type Shared = SharedClassifier<HoldTicker, ManualClock>;

// Handlers are plain `fn()`, so each test gets its own static log.
macro_rules! recorder {
    ($name:ident) => {
        mod $name {
            use std::sync::Mutex;

            use button_events::{EventKind, Handler};

            static LOG: Mutex<Vec<EventKind>> = Mutex::new(Vec::new());

            fn record(kind: EventKind) {
                LOG.lock().unwrap().push(kind);
            }

            fn press() {
                record(EventKind::Press);
            }

            fn release() {
                record(EventKind::Release);
            }

            fn double_click() {
                record(EventKind::DoubleClick);
            }

            fn short_press() {
                record(EventKind::ShortPress);
            }

            fn long_press() {
                record(EventKind::LongPress);
            }

            pub fn handler(kind: EventKind) -> Handler {
                match kind {
                    EventKind::Press => press,
                    EventKind::Release => release,
                    EventKind::DoubleClick => double_click,
                    EventKind::ShortPress => short_press,
                    EventKind::LongPress => long_press,
                }
            }

            pub fn register_all(shared: &super::Shared) {
                for kind in EventKind::ALL {
                    shared.register_callback(kind, Some(handler(kind)));
                }
            }

            pub fn take() -> Vec<EventKind> {
                std::mem::take(&mut *LOG.lock().unwrap())
            }
        }
    };
}

recorder!(double_click_log);
recorder!(hold_log);
recorder!(cleared_log);
recorder!(twice_log);
recorder!(reentrant_log);
recorder!(bounce_log);

fn edge(shared: &Shared, level: PinState, at: u32) {
    shared.clock().set(at);
    shared.on_edge(level);
}

fn expire(shared: &Shared, at: u32) {
    shared.clock().set(at);
    shared.on_timer_expiry();
}

#[test]
fn double_click_dispatches_before_release() {
    let shared = Shared::new(HoldTicker::new(), ManualClock::new(0));
    double_click_log::register_all(&shared);

    edge(&shared, PinState::Low, 1_000);
    edge(&shared, PinState::High, 1_090);
    edge(&shared, PinState::Low, 1_250);
    edge(&shared, PinState::High, 1_330);

    assert_eq!(
        double_click_log::take(),
        [
            EventKind::Press,
            EventKind::Release,
            EventKind::Press,
            EventKind::DoubleClick,
            EventKind::Release,
        ]
    );
}

#[test]
fn held_button_dispatches_short_then_long() {
    let shared = Shared::new(HoldTicker::new(), ManualClock::new(0));
    hold_log::register_all(&shared);

    edge(&shared, PinState::Low, 1_000);
    expire(&shared, 3_000);
    expire(&shared, 5_000);
    assert!(shared.with_timer(|ticker| !ticker.is_running()));
    edge(&shared, PinState::High, 7_200);

    assert_eq!(
        hold_log::take(),
        [
            EventKind::Press,
            EventKind::ShortPress,
            EventKind::LongPress,
            EventKind::Release,
        ]
    );
}

#[test]
fn cleared_handlers_are_skipped() {
    let shared = Shared::new(HoldTicker::new(), ManualClock::new(0));
    cleared_log::register_all(&shared);
    shared.register_callback(EventKind::Press, None);
    shared.register_callback(EventKind::DoubleClick, None);

    edge(&shared, PinState::Low, 1_000);
    edge(&shared, PinState::High, 1_100);
    edge(&shared, PinState::Low, 1_200);
    let events = shared.on_edge(PinState::High);

    assert_eq!(events.as_slice(), [EventKind::DoubleClick, EventKind::Release]);
    assert_eq!(cleared_log::take(), [EventKind::Release, EventKind::Release]);
}

#[test]
fn no_handlers_at_all_is_silent() {
    let shared = Shared::new(HoldTicker::new(), ManualClock::new(0));

    edge(&shared, PinState::Low, 1_000);
    expire(&shared, 3_000);
    expire(&shared, 5_000);
    edge(&shared, PinState::High, 5_500);

    assert_eq!(shared.inspect(|classifier| classifier.session().press_count()), 0);
}

#[test]
fn registering_same_handler_twice_dispatches_once() {
    let shared = Shared::new(HoldTicker::new(), ManualClock::new(0));
    twice_log::register_all(&shared);
    shared.register_callback(EventKind::Press, Some(twice_log::handler(EventKind::Press)));

    edge(&shared, PinState::Low, 1_000);

    assert_eq!(twice_log::take(), [EventKind::Press]);
}

#[test]
fn repeated_level_dispatches_nothing() {
    let shared = Shared::new(HoldTicker::new(), ManualClock::new(0));
    bounce_log::register_all(&shared);

    edge(&shared, PinState::Low, 1_000);
    edge(&shared, PinState::Low, 1_001);
    edge(&shared, PinState::Low, 1_003);
    edge(&shared, PinState::High, 1_200);
    edge(&shared, PinState::High, 1_202);

    assert_eq!(bounce_log::take(), [EventKind::Press, EventKind::Release]);
}

static REENTRANT: Shared = Shared::new(HoldTicker::new(), ManualClock::new(0));

fn install_release_handler() {
    REENTRANT.register_callback(
        EventKind::Release,
        Some(reentrant_log::handler(EventKind::Release)),
    );
}

#[test]
fn handler_may_register_callbacks() {
    REENTRANT.register_callback(EventKind::Press, Some(install_release_handler));

    edge(&REENTRANT, PinState::Low, 1_000);
    edge(&REENTRANT, PinState::High, 1_100);

    assert_eq!(reentrant_log::take(), [EventKind::Release]);
}
