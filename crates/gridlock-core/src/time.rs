//! Battle clock
//!
//! Battle time is driven entirely by the host: every `tick` supplies the
//! wall-clock delta in milliseconds. Nothing here reads a system clock.

use serde::{Deserialize, Serialize};

/// Accumulated battle time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleClock {
    /// Time since battle start in milliseconds
    pub elapsed_ms: f64,
    /// Delta supplied for the most recent tick
    pub delta_ms: f32,
    /// Number of ticks processed
    pub frame_count: u64,
}

impl BattleClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by the host-supplied delta. Negative deltas are treated as zero.
    pub fn advance(&mut self, delta_ms: f32) {
        self.delta_ms = delta_ms.max(0.0);
        self.elapsed_ms += self.delta_ms as f64;
        self.frame_count += 1;
    }

    /// Battle time in whole seconds, for logging
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }
}

/// Fixed-interval schedule on battle time.
///
/// Fires on the marks `interval, 2 * interval, ...` regardless of how the
/// host slices time, so a long frame catches up on every mark it crossed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cadence {
    pub interval_ms: f64,
    last_fired_ms: f64,
}

impl Cadence {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: 0.0,
        }
    }

    /// Number of marks reached since the last poll, up to `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        if self.interval_ms <= 0.0 {
            return 0;
        }
        let mut fired = 0;
        while now_ms - self.last_fired_ms >= self.interval_ms {
            self.last_fired_ms += self.interval_ms;
            fired += 1;
        }
        fired
    }

    /// Battle time of the most recent mark
    pub fn last_fired_ms(&self) -> f64 {
        self.last_fired_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_accumulates() {
        let mut clock = BattleClock::new();
        clock.advance(16.0);
        clock.advance(16.0);
        assert_eq!(clock.elapsed_ms, 32.0);
        assert_eq!(clock.frame_count, 2);

        clock.advance(-5.0);
        assert_eq!(clock.elapsed_ms, 32.0);
        assert_eq!(clock.delta_ms, 0.0);
    }

    #[test]
    fn test_cadence_fires_on_interval() {
        let mut cadence = Cadence::new(500.0);
        assert_eq!(cadence.poll(100.0), 0);
        assert_eq!(cadence.poll(499.0), 0);
        assert_eq!(cadence.poll(500.0), 1);
        assert_eq!(cadence.poll(900.0), 0);
        assert_eq!(cadence.poll(1000.0), 1);
        assert_eq!(cadence.last_fired_ms(), 1000.0);
    }

    #[test]
    fn test_cadence_stays_on_marks() {
        // 16 ms frames overshoot every mark; the next mark must not slide
        let mut cadence = Cadence::new(500.0);
        assert_eq!(cadence.poll(496.0), 0);
        assert_eq!(cadence.poll(512.0), 1);
        assert_eq!(cadence.last_fired_ms(), 500.0);
        assert_eq!(cadence.poll(1008.0), 1);
        assert_eq!(cadence.last_fired_ms(), 1000.0);
    }

    #[test]
    fn test_cadence_catches_up_on_large_step() {
        let mut cadence = Cadence::new(500.0);
        assert_eq!(cadence.poll(2100.0), 4);
        assert_eq!(cadence.poll(2100.0), 0);
        assert_eq!(cadence.last_fired_ms(), 2000.0);
    }

    #[test]
    fn test_zero_interval_never_fires() {
        let mut cadence = Cadence::new(0.0);
        assert_eq!(cadence.poll(1000.0), 0);
    }
}
