// Countdown clock for DotMerge sessions
//
// The session owns its clock and stops it before every start and on every
// exit from `Playing`. A stopped clock must never fire again.

use gloo_timers::callback::Interval;
use std::rc::Rc;

/// Period of one countdown tick
pub const TICK_PERIOD_MS: u32 = 1000;

/// Cancellable recurring timer driving `Session::tick`
pub trait Clock {
    /// Arm the timer. An already running timer is replaced.
    fn start(&mut self, period_ms: u32);

    /// Cancel the timer; no tick may fire afterwards
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// Clock driven by hand (tests, headless drivers)
///
/// Counts arm/cancel calls so callers can check that every session exit
/// cancelled the timer.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    running: bool,
    period_ms: Option<u32>,
    starts: u32,
    stops: u32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period_ms(&self) -> Option<u32> {
        self.period_ms
    }

    pub fn starts(&self) -> u32 {
        self.starts
    }

    pub fn stops(&self) -> u32 {
        self.stops
    }
}

impl Clock for ManualClock {
    fn start(&mut self, period_ms: u32) {
        self.running = true;
        self.period_ms = Some(period_ms);
        self.starts += 1;
    }

    fn stop(&mut self) {
        if self.running {
            self.stops += 1;
        }
        self.running = false;
        self.period_ms = None;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Browser clock backed by `setInterval`
///
/// Dropping the `Interval` clears it, so `stop` and `Drop` both cancel.
pub struct IntervalClock {
    on_tick: Rc<dyn Fn()>,
    interval: Option<Interval>,
}

impl IntervalClock {
    pub fn new(on_tick: impl Fn() + 'static) -> Self {
        IntervalClock {
            on_tick: Rc::new(on_tick),
            interval: None,
        }
    }
}

impl Clock for IntervalClock {
    fn start(&mut self, period_ms: u32) {
        self.stop();
        let on_tick = Rc::clone(&self.on_tick);
        self.interval = Some(Interval::new(period_ms, move || on_tick()));
    }

    fn stop(&mut self) {
        if let Some(interval) = self.interval.take() {
            drop(interval);
        }
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_counts() {
        let mut clock = ManualClock::new();
        assert!(!clock.is_running());

        clock.start(TICK_PERIOD_MS);
        assert!(clock.is_running());
        assert_eq!(clock.period_ms(), Some(1000));

        clock.stop();
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.starts(), 1);
        // stopping an idle clock is not counted
        assert_eq!(clock.stops(), 1);
        assert_eq!(clock.period_ms(), None);
    }

    #[test]
    fn test_idle_interval_clock_is_not_running() {
        let mut clock = IntervalClock::new(|| {});
        assert!(!clock.is_running());
        clock.stop();
        assert!(!clock.is_running());
    }
}
