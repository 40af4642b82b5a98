//! Embassy driver for a single pull-up button on an RP2040 GPIO.
//!
//! The driver task stands in for both interrupt sources: it waits on any edge of the
//! pin and on the hold timer deadline, and feeds whichever comes first to the shared
//! classifier.

#![cfg(not(feature = "host"))]

use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_rp::Peri;
use embassy_rp::gpio::{AnyPin, Input, Pin, Pull};
use embassy_time::{Instant, Timer};
use embedded_hal::digital::PinState;

use crate::{
    Clock, Error, EventKind, Handler, HoldTicker, Result, SharedClassifier, TickSchedule,
};

/// Milliseconds since boot from the Embassy time driver, truncated to `u32`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the classifier works in wrapping u32 milliseconds"
    )]
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}

/// Classifier state shared between the driver task and whoever registers callbacks.
pub type ButtonEventsShared = SharedClassifier<HoldTicker, EmbassyClock>;

/// Handle to a running button driver.
///
/// ```rust,ignore
/// static BUTTON: ButtonEventsShared = ButtonEvents::shared();
///
/// let button = ButtonEvents::new(p.PIN_0, &BUTTON, spawner)?;
/// button.register_callback(EventKind::DoubleClick, Some(on_double_click));
/// ```
pub struct ButtonEvents {
    shared: &'static ButtonEventsShared,
}

impl ButtonEvents {
    /// State for a `static`, to be handed to [`ButtonEvents::new`].
    #[must_use]
    pub const fn shared() -> ButtonEventsShared {
        SharedClassifier::new(HoldTicker::new(), EmbassyClock)
    }

    /// Configure `pin` as a pulled-up input and spawn the task that watches it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskSpawn`] if the driver task is already running.
    pub fn new<P: Pin>(
        pin: Peri<'static, P>,
        shared: &'static ButtonEventsShared,
        spawner: Spawner,
    ) -> Result<Self> {
        let any: Peri<'static, AnyPin> = pin.into();
        spawner
            .spawn(button_events_task(Input::new(any, Pull::Up), shared))
            .map_err(Error::TaskSpawn)?;
        Ok(Self { shared })
    }

    pub fn register_callback(&self, kind: EventKind, handler: Option<Handler>) {
        self.shared.register_callback(kind, handler);
    }
}

#[embassy_executor::task]
async fn button_events_task(mut input: Input<'static>, shared: &'static ButtonEventsShared) -> ! {
    let mut schedule = TickSchedule::new();

    #[cfg(feature = "defmt")]
    defmt::info!("button events task started");
    loop {
        let stimulus = match schedule.deadline() {
            Some(deadline) => select(input.wait_for_any_edge(), Timer::at(deadline)).await,
            None => {
                input.wait_for_any_edge().await;
                Either::First(())
            }
        };

        match stimulus {
            Either::First(()) => {
                let level = if input.is_low() {
                    PinState::Low
                } else {
                    PinState::High
                };
                shared.on_edge(level);
            }
            Either::Second(()) => {
                schedule.advance();
                shared.on_timer_expiry();
            }
        }

        let now = Instant::now();
        shared.with_timer(|ticker| schedule.sync(ticker, now));
    }
}
