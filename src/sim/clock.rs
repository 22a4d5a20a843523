//! Clock and timestep source
//!
//! The host hands us monotonic timestamps from its render loop; `FrameClock`
//! turns them into frame deltas and `FixedTimestep` slices those deltas into
//! whole simulation steps.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Converts host timestamps (seconds) into per-frame deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Delta since the previous call, clamped to `[0, MAX_FRAME_DT]`.
    /// The first call after construction or `resync` yields 0.
    pub fn advance(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) if now > last => ((now - last) as f32).min(MAX_FRAME_DT),
            Some(last) if now < last => {
                log::warn!("Clock went backwards ({last} -> {now}), treating as zero delta");
                0.0
            }
            _ => 0.0,
        };
        if self.last.is_none_or(|last| now > last) {
            self.last = Some(now);
        }
        dt
    }

    /// Forget the previous timestamp (after a pause, so the gap isn't replayed)
    pub fn resync(&mut self) {
        self.last = None;
    }
}

/// Accumulates frame time and releases it in `SIM_DT` steps
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedTimestep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        debug_assert!(step > 0.0);
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add `dt` and return how many whole steps to run now.
    /// Backlog beyond `max_substeps` is dropped to avoid a spiral of death.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_substeps && self.accumulator >= self.step {
            self.accumulator %= self.step;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_advance_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(100.0), 0.0);
        let dt = clock.advance(100.05);
        assert!((dt - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        assert_eq!(clock.advance(3.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new();
        clock.advance(5.0);
        assert_eq!(clock.advance(4.0), 0.0);
        // Still measured from the latest forward timestamp
        let dt = clock.advance(5.02);
        assert!((dt - 0.02).abs() < 1e-4);
    }

    #[test]
    fn test_resync_skips_gap() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        clock.resync();
        assert_eq!(clock.advance(60.0), 0.0);
    }

    #[test]
    fn test_fixed_timestep_steps() {
        let mut stepper = FixedTimestep::new(0.25, 8);
        assert_eq!(stepper.accumulate(0.1), 0);
        assert_eq!(stepper.accumulate(0.2), 1);
        assert_eq!(stepper.accumulate(0.5), 2);
    }

    #[test]
    fn test_fixed_timestep_caps_substeps() {
        let mut stepper = FixedTimestep::new(0.25, 2);
        assert_eq!(stepper.accumulate(10.0), 2);
        // Backlog dropped
        assert_eq!(stepper.accumulate(0.0), 0);
    }
}
