//! Frame scheduling for turn animations.
//!
//! Nothing here sleeps or spawns timers. [`Ticker`] turns elapsed wall-clock
//! time into a count of due ticks, and [`FrameClock`] hands out the frames of
//! one animation, one per tick.

use std::time::Duration;

/// Maximum number of ticks released by a single [`Ticker::advance()`] call.
const MAX_CATCH_UP_TICKS: u32 = 4;

/// One step of a [`FrameClock`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Regular frame `index` out of `total`.
    Step { index: u32, total: u32 },
    /// Last frame, delivered exactly once after every step.
    Final,
}

impl Tick {
    /// Linear progress of this tick in the range `[0, 1]`.
    pub fn progress(self) -> f32 {
        match self {
            Tick::Step { index, total } => index as f32 / total as f32,
            Tick::Final => 1.0,
        }
    }
}

/// Frame budget for a single animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameClock {
    frame: u32,
    total: u32,
    finished: bool,
}

impl FrameClock {
    /// Constructs a clock that yields `total` steps followed by one final
    /// tick.
    pub fn new(total: u32) -> Self {
        Self {
            frame: 0,
            total,
            finished: false,
        }
    }

    /// Returns the next tick, or `None` once the final tick has been
    /// delivered.
    pub fn advance(&mut self) -> Option<Tick> {
        if self.finished {
            return None;
        }
        if self.frame < self.total {
            let index = self.frame;
            self.frame += 1;
            Some(Tick::Step {
                index,
                total: self.total,
            })
        } else {
            self.finished = true;
            Some(Tick::Final)
        }
    }

    /// Number of steps delivered so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Number of steps before the final tick.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Whether the final tick has been delivered.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Fixed-cadence tick source driven by elapsed time.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    accumulated: Duration,
}

impl Ticker {
    /// Constructs a ticker that releases one tick every `period`. A zero
    /// period releases one tick per call.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            accumulated: Duration::ZERO,
        }
    }

    /// Adds `elapsed` time and returns how many ticks are now due.
    ///
    /// A long stall releases at most a few ticks; the remainder is dropped
    /// so that an animation slows down instead of jumping.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.period.is_zero() {
            return 1;
        }
        self.accumulated += elapsed;
        let mut due = 0;
        while self.accumulated >= self.period && due < MAX_CATCH_UP_TICKS {
            self.accumulated -= self.period;
            due += 1;
        }
        if due == MAX_CATCH_UP_TICKS {
            self.accumulated = Duration::ZERO;
        }
        due
    }

    /// Discards accumulated time.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_frame_clock_sequence() {
        let mut clock = FrameClock::new(3);
        assert_eq!(Some(Tick::Step { index: 0, total: 3 }), clock.advance());
        assert_eq!(Some(Tick::Step { index: 1, total: 3 }), clock.advance());
        assert_eq!(Some(Tick::Step { index: 2, total: 3 }), clock.advance());
        assert!(!clock.is_finished());
        assert_eq!(Some(Tick::Final), clock.advance());
        assert!(clock.is_finished());
        assert_eq!(None, clock.advance());
        assert_eq!(None, clock.advance());
    }

    #[test]
    fn test_frame_clock_budget() {
        let mut clock = FrameClock::new(50);
        let ticks = std::iter::from_fn(|| clock.advance()).collect::<Vec<_>>();
        assert_eq!(51, ticks.len());
        assert_eq!(Some(&Tick::Final), ticks.last());
        assert_eq!(0.0, ticks[0].progress());
        assert_eq!(0.5, ticks[25].progress());
    }

    #[test]
    fn test_empty_frame_clock() {
        let mut clock = FrameClock::new(0);
        assert_eq!(Some(Tick::Final), clock.advance());
        assert_eq!(None, clock.advance());
    }

    #[test]
    fn test_ticker_cadence() {
        let mut ticker = Ticker::new(Duration::from_millis(16));
        assert_eq!(0, ticker.advance(Duration::from_millis(10)));
        assert_eq!(1, ticker.advance(Duration::from_millis(10)));
        assert_eq!(2, ticker.advance(Duration::from_millis(30)));
        ticker.reset();
        assert_eq!(0, ticker.advance(Duration::from_millis(15)));
    }

    #[test]
    fn test_ticker_caps_catch_up() {
        let mut ticker = Ticker::new(Duration::from_millis(16));
        assert_eq!(MAX_CATCH_UP_TICKS, ticker.advance(Duration::from_secs(5)));
        assert_eq!(0, ticker.advance(Duration::from_millis(1)));
    }
}
