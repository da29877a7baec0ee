//! Linear parameter smoothing for zipper-free control changes.
//!
//! Every continuously varying engine control (feedback, damping, dry and
//! wet gains) is driven through a [`LinearSmoother`] so that automation or
//! UI changes ramp in over a fixed time instead of stepping audibly.

use libm::floor;

/// A value that ramps linearly from its current position to each new target.
///
/// The ramp length is a fixed step budget derived from a smoothing time and
/// the sample rate by [`reset`](Self::reset); every retarget spends the full
/// budget, starting from wherever the previous ramp had reached. This keeps
/// transition time constant regardless of how often the control moves.
///
/// # Example
///
/// ```rust
/// use switchverb_core::LinearSmoother;
///
/// let mut gain = LinearSmoother::new();
/// gain.reset(48000.0, 0.01); // 10ms ramps
/// gain.set_target(1.0);
///
/// // 480 samples later the ramp has landed exactly
/// let mut v = 0.0;
/// for _ in 0..480 {
///     v = gain.advance();
/// }
/// assert_eq!(v, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearSmoother {
    current: f32,
    target: f32,
    step: f32,
    countdown: u32,
    steps_to_target: u32,
}

impl LinearSmoother {
    /// Create a smoother resting at zero with no step budget.
    ///
    /// Until [`reset`](Self::reset) is called, every retarget snaps
    /// immediately.
    pub fn new() -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            step: 0.0,
            countdown: 0,
            steps_to_target: 0,
        }
    }

    /// Recompute the step budget for a new sample rate.
    ///
    /// The budget is `floor(ramp_seconds * sample_rate)` samples. The
    /// current value snaps to the target and any in-flight ramp is
    /// abandoned; this is only called on sample-rate changes, never on
    /// ordinary retargets.
    pub fn reset(&mut self, sample_rate: f64, ramp_seconds: f64) {
        self.steps_to_target = floor(ramp_seconds * sample_rate) as u32;
        self.current = self.target;
        self.countdown = 0;
    }

    /// Set a new target, arming a fresh ramp from the current value.
    ///
    /// A no-op when `value` equals the stored target exactly, so repeated
    /// identical updates never restart the ramp. With a zero step budget
    /// the value snaps immediately.
    pub fn set_target(&mut self, value: f32) {
        if self.target == value {
            return;
        }
        self.target = value;
        self.countdown = self.steps_to_target;
        if self.countdown == 0 {
            self.current = self.target;
        } else {
            self.step = (self.target - self.current) / self.countdown as f32;
        }
    }

    /// Advance one sample and return the smoothed value.
    ///
    /// The final step of a ramp lands on the target exactly (accumulated
    /// float error is discarded), and the target is returned on every call
    /// once the countdown is exhausted.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.countdown == 0 {
            return self.target;
        }
        self.countdown -= 1;
        self.current += self.step;
        if self.countdown == 0 {
            self.current = self.target;
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn current(&self) -> f32 {
        if self.countdown == 0 {
            self.target
        } else {
            self.current
        }
    }

    /// The value this smoother is ramping toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once the ramp has landed.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.countdown == 0
    }
}

impl Default for LinearSmoother {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_target_after_budget() {
        let mut smoother = LinearSmoother::new();
        smoother.reset(44100.0, 0.01);
        smoother.set_target(1.0);

        // floor(0.01 * 44100) = 441 steps, landing exactly on the target
        let mut v = 0.0;
        for _ in 0..441 {
            v = smoother.advance();
        }
        assert_eq!(v, 1.0);
        assert!(smoother.is_settled());
        // Exact target on every subsequent call
        assert_eq!(smoother.advance(), 1.0);
        assert_eq!(smoother.advance(), 1.0);
    }

    #[test]
    fn test_ramp_is_linear() {
        let mut smoother = LinearSmoother::new();
        smoother.reset(1000.0, 0.1); // 100 steps
        smoother.set_target(100.0);

        for i in 1..=100 {
            let v = smoother.advance();
            assert!((v - i as f32).abs() < 1e-3, "step {i}: got {v}");
        }
    }

    #[test]
    fn test_redundant_retarget_is_noop() {
        let mut smoother = LinearSmoother::new();
        smoother.reset(1000.0, 0.1);
        smoother.set_target(1.0);

        for _ in 0..50 {
            smoother.advance();
        }
        let midpoint = smoother.current();

        // Same target again must not restart the ramp
        smoother.set_target(1.0);
        assert_eq!(smoother.current(), midpoint);
        assert!(!smoother.is_settled());
    }

    #[test]
    fn test_retarget_mid_ramp_uses_full_budget() {
        let mut smoother = LinearSmoother::new();
        smoother.reset(1000.0, 0.1); // 100 steps
        smoother.set_target(1.0);

        for _ in 0..50 {
            smoother.advance();
        }

        // Retarget from ~0.5 down to 0.0 over a fresh 100 steps
        smoother.set_target(0.0);
        let mut v = smoother.current();
        for _ in 0..100 {
            v = smoother.advance();
        }
        assert_eq!(v, 0.0);
        assert_eq!(smoother.advance(), 0.0);
    }

    #[test]
    fn test_zero_budget_snaps() {
        let mut smoother = LinearSmoother::new();
        smoother.set_target(0.7);
        assert_eq!(smoother.advance(), 0.7);
    }

    #[test]
    fn test_reset_snaps_current_to_target() {
        let mut smoother = LinearSmoother::new();
        smoother.reset(1000.0, 0.1);
        smoother.set_target(1.0);
        for _ in 0..10 {
            smoother.advance();
        }

        // Sample-rate change mid-ramp: current jumps to target
        smoother.reset(48000.0, 0.1);
        assert_eq!(smoother.advance(), 1.0);
    }
}
