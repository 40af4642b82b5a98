//! The hold timer seam and its software implementation.
//!
//! The classifier only needs "start a periodic timer" and "stop it". On bare interrupt
//! setups that is a hardware timer; under Embassy it is [`HoldTicker`] plus a
//! [`TickSchedule`] owned by the driver task.

use embassy_time::{Duration, Instant};

/// A single periodic timer owned by the classifier.
pub trait HoldTimer {
    /// Start firing every `period_ms`. A timer that is already running is replaced.
    fn start(&mut self, period_ms: u32);

    /// Stop firing. Stopping an idle timer does nothing.
    fn stop(&mut self);
}

/// Software [`HoldTimer`]: remembers what was asked of it and never fires by itself.
///
/// Every `start` bumps `generation`, which is how a [`TickSchedule`] notices that the
/// timer was restarted even when the period did not change.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HoldTicker {
    period_ms: Option<u32>,
    generation: u32,
}

impl HoldTicker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            period_ms: None,
            generation: 0,
        }
    }

    /// Period of the running timer, `None` when stopped.
    #[must_use]
    pub const fn period_ms(&self) -> Option<u32> {
        self.period_ms
    }

    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.period_ms.is_some()
    }
}

impl HoldTimer for HoldTicker {
    fn start(&mut self, period_ms: u32) {
        self.period_ms = Some(period_ms);
        self.generation = self.generation.wrapping_add(1);
    }

    fn stop(&mut self) {
        self.period_ms = None;
    }
}

/// Absolute deadline for the next [`HoldTicker`] expiry.
///
/// Call [`sync`](Self::sync) after anything that may have touched the ticker and
/// [`advance`](Self::advance) when the deadline is reached. Advancing adds exactly one
/// period to the previous deadline, so the cadence does not drift with task latency.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TickSchedule {
    deadline: Option<Instant>,
    period: Duration,
    generation: u32,
}

impl TickSchedule {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            deadline: None,
            period: Duration::from_ticks(0),
            generation: 0,
        }
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Follow the ticker: stopped clears the deadline, a restart schedules `now + period`,
    /// anything else keeps the current deadline.
    pub fn sync(&mut self, ticker: &HoldTicker, now: Instant) {
        match ticker.period_ms() {
            None => self.deadline = None,
            Some(period_ms) if ticker.generation() != self.generation => {
                self.generation = ticker.generation();
                self.period = Duration::from_millis(u64::from(period_ms));
                self.deadline = now.checked_add(self.period);
            }
            Some(_) => {}
        }
    }

    /// The deadline was reached; move it one period ahead.
    pub fn advance(&mut self) {
        self.deadline = self
            .deadline
            .and_then(|deadline| deadline.checked_add(self.period));
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use embassy_time::Instant;

    use super::{HoldTicker, HoldTimer, TickSchedule};

    #[test]
    fn ticker_tracks_start_and_stop() {
        let mut ticker = HoldTicker::new();
        assert!(!ticker.is_running());

        ticker.start(2_000);
        assert_eq!(ticker.period_ms(), Some(2_000));
        assert_eq!(ticker.generation(), 1);

        ticker.stop();
        assert!(!ticker.is_running());
        assert_eq!(ticker.generation(), 1);
    }

    #[test]
    fn schedule_is_periodic_from_start() {
        let mut ticker = HoldTicker::new();
        let mut schedule = TickSchedule::new();

        ticker.start(2_000);
        schedule.sync(&ticker, Instant::from_millis(100));
        assert_eq!(schedule.deadline(), Some(Instant::from_millis(2_100)));

        schedule.advance();
        schedule.sync(&ticker, Instant::from_millis(2_103));
        assert_eq!(schedule.deadline(), Some(Instant::from_millis(4_100)));
    }

    #[test]
    fn restart_with_same_period_reschedules() {
        let mut ticker = HoldTicker::new();
        let mut schedule = TickSchedule::new();

        ticker.start(2_000);
        schedule.sync(&ticker, Instant::from_millis(0));
        ticker.stop();
        ticker.start(2_000);
        schedule.sync(&ticker, Instant::from_millis(300));

        assert_eq!(schedule.deadline(), Some(Instant::from_millis(2_300)));
    }

    #[test]
    fn stop_clears_deadline() {
        let mut ticker = HoldTicker::new();
        let mut schedule = TickSchedule::new();

        ticker.start(2_000);
        schedule.sync(&ticker, Instant::from_millis(0));
        ticker.stop();
        schedule.sync(&ticker, Instant::from_millis(50));

        assert_eq!(schedule.deadline(), None);
        schedule.advance();
        assert_eq!(schedule.deadline(), None);
    }
}
