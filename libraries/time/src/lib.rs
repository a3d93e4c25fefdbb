#![allow(missing_docs, reason = "TODO add later")]

use std::time::Duration;

use web_time::Instant;

/// Wall-clock driven animation time.
///
/// The clock value is the number of animation seconds elapsed since creation,
/// multiplied by the speed-up factor in effect over each span.
#[derive(Clone, Debug)]
pub struct Clock {
    /// animation seconds accumulated up to `since`
    banked: f64,
    since: Instant,
    speed_up: f64,
}

impl Clock {
    #[must_use]
    pub fn start() -> Self {
        Self {
            banked: 0.0,
            since: Instant::now(),
            speed_up: 1.0,
        }
    }

    #[must_use]
    pub fn with_speed_up(mut self, speed_up: f64) -> Self {
        self.set_speed_up(speed_up);
        self
    }

    /// Changes the rate at which animation time passes without making it jump.
    /// Negative factors are treated as zero.
    pub fn set_speed_up(&mut self, speed_up: f64) {
        self.bank(Instant::now());
        self.speed_up = speed_up.max(0.0);
    }

    /// Current animation time in seconds.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.seconds_at(Instant::now())
    }

    fn seconds_at(&self, now: Instant) -> f64 {
        self.banked + elapsed_between(self.since, now).as_secs_f64() * self.speed_up
    }

    fn bank(&mut self, now: Instant) {
        self.banked = self.seconds_at(now);
        self.since = now;
    }
}

fn elapsed_between(earlier: Instant, later: Instant) -> Duration {
    later.checked_duration_since(earlier).unwrap_or_default()
}
