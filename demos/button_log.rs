//! Logs every button event from a pull-up button on GPIO0.
//!
//! Build via: `cargo xtask demo button_log`
#![no_std]
#![no_main]

use button_events::{ButtonEvents, ButtonEventsShared, EventKind, Result};
use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::Timer;
use panic_probe as _;

static BUTTON: ButtonEventsShared = ButtonEvents::shared();

fn on_press() {
    info!("key press");
}

fn on_release() {
    info!("key release");
}

fn on_double_click() {
    info!("key double click");
}

fn on_short_press() {
    info!("key short press");
}

fn on_long_press() {
    info!("key long press");
}

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    core::panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<core::convert::Infallible> {
    let p = embassy_rp::init(Default::default());

    let button = ButtonEvents::new(p.PIN_0, &BUTTON, spawner)?;
    button.register_callback(EventKind::Press, Some(on_press));
    button.register_callback(EventKind::Release, Some(on_release));
    button.register_callback(EventKind::DoubleClick, Some(on_double_click));
    button.register_callback(EventKind::ShortPress, Some(on_short_press));
    button.register_callback(EventKind::LongPress, Some(on_long_press));
    info!("button_log ready on GPIO0");

    loop {
        Timer::after_secs(60).await;
    }
}
