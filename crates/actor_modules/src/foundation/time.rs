//! Frame timing utilities

use std::time::Instant;

/// Timing information handed to module hooks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds covered by this pass (the fixed step for physics passes)
    pub delta: f32,
    /// Seconds of simulated time since the driver started
    pub elapsed: f32,
    /// Frame index, starting at 1 for the first frame
    pub frame: u64,
}

impl FrameTime {
    /// Create frame timing
    pub fn new(delta: f32, elapsed: f32, frame: u64) -> Self {
        Self { delta, elapsed, frame }
    }
}

/// Wall clock for real-time drivers: measures the delta to feed
/// [`Stage::tick`](crate::runtime::Stage::tick)
pub struct FrameClock {
    last_frame: Instant,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            frame_count: 0,
        }
    }

    /// Seconds since the previous tick (or since creation)
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;
        delta
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed-step accumulator for the physics pass
#[derive(Debug, Clone)]
pub struct FixedStep {
    timestep: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedStep {
    /// Create an accumulator running `timestep`-second steps, at most
    /// `max_steps` per frame
    pub fn new(timestep: f32, max_steps: u32) -> Self {
        Self {
            timestep,
            max_steps,
            accumulator: 0.0,
        }
    }

    /// Step length in seconds
    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    /// Add `delta` seconds and return how many steps to run this frame.
    ///
    /// Time beyond `max_steps` is dropped so a long stall does not snowball.
    pub fn advance(&mut self, delta: f32) -> u32 {
        self.accumulator += delta.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.timestep && steps < self.max_steps {
            self.accumulator -= self.timestep;
            steps += 1;
        }

        if self.accumulator >= self.timestep {
            log::warn!(
                "Physics fell behind by {:.3}s, dropping it",
                self.accumulator - self.accumulator % self.timestep
            );
            self.accumulator %= self.timestep;
        }

        steps
    }

    /// Fraction of a step left in the accumulator, for interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.timestep
    }

    /// Forget accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_accumulates() {
        let mut step = FixedStep::new(0.25, 8);
        assert_eq!(step.advance(0.125), 0);
        assert_eq!(step.advance(0.125), 1);
        assert_eq!(step.advance(0.5), 2);
        assert_eq!(step.alpha(), 0.0);
    }

    #[test]
    fn test_fixed_step_drops_excess() {
        let mut step = FixedStep::new(0.25, 2);
        assert_eq!(step.advance(2.0), 2);
        assert!(step.alpha() < 1.0);
        assert_eq!(step.advance(0.0), 0);
    }

    #[test]
    fn test_fixed_step_ignores_negative_delta() {
        let mut step = FixedStep::new(0.5, 4);
        assert_eq!(step.advance(-1.0), 0);
        assert_eq!(step.advance(0.5), 1);
    }

    #[test]
    fn test_frame_clock_counts_ticks() {
        let mut clock = FrameClock::new();
        let first = clock.tick();
        let second = clock.tick();
        assert_eq!(clock.frame_count(), 2);
        assert!(first >= 0.0 && second >= 0.0);
    }
}
