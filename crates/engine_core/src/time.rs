//! Game time: the logical clock that drives orbit phases, and a
//! wall-clock pacer for drivers that want real-time ticking.
//!
//! Orbit positions depend on *game* time (ticks), never wall time, so
//! replaying the same inputs always lands bodies in the same places.

use std::time::{Duration, Instant};

/// Interplanetary view tick rate, Hz.
pub const IP_TICK_RATE: u32 = 30;
/// Planetside (lander) tick rate, Hz.
pub const PLANET_SIDE_RATE: u32 = 35;
/// Game days per second of interplanetary flight.
pub const DAYS_PER_SECOND: u32 = 1;

const TICKS_PER_DAY: f64 = (IP_TICK_RATE / DAYS_PER_SECOND) as f64;

/// Logical game clock, advanced once per interplanetary tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameClock {
    ticks: u64,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a clock from a saved tick count.
    pub fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    pub fn tick(&mut self) {
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Elapsed game days, fractional. Drives orbit phase and sphere
    /// rotation.
    pub fn days_elapsed(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_DAY
    }
}

/// Fixed-rate pacer for external drivers. The sim itself never sleeps;
/// a real-time front end calls `wait_for_next` between ticks.
#[derive(Debug)]
pub struct TickTimer {
    period: Duration,
    next: Instant,
}

impl TickTimer {
    pub fn new(rate_hz: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / rate_hz as f64);
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    /// Sleep until the next tick boundary. Rate is not stabilized: a
    /// late frame shifts the schedule rather than bursting to catch up.
    pub fn wait_for_next(&mut self) {
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        }
        self.next = Instant::now() + self.period;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_days_track_ticks() {
        let mut clock = GameClock::new();
        for _ in 0..IP_TICK_RATE {
            clock.tick();
        }
        assert!((clock.days_elapsed() - 1.0).abs() < 1e-9);
    }
}
