//! Feedback comb filter with damping and enable crossfade.
//!
//! A comb filter produces a decaying series of echoes at its delay period.
//! Banks of these, run in parallel with mutually detuned delay lengths,
//! build the echo density of a reverb tail. The feedback path includes a
//! one-pole lowpass (damping) simulating the absorption of high frequencies
//! in real acoustic spaces.

use crate::DelayBuffer;
use crate::GainFade;
use crate::flush_denormal;

/// Comb filter with damped feedback and per-voice output crossfade.
///
/// Damping and feedback are supplied per sample rather than stored, so a
/// whole bank can follow one pair of smoothed control values. The output
/// is scaled by the voice's [`GainFade`], letting the engine switch voices
/// in and out without clicks.
///
/// # Example
///
/// ```rust
/// use switchverb_core::CombFilter;
///
/// let mut comb = CombFilter::new(1000);
/// let output = comb.process(1.0, 0.2, 0.84);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: DelayBuffer,
    last: f32,
    fade: GainFade,
}

impl CombFilter {
    /// Create a comb filter with the given delay length in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: DelayBuffer::new(delay_samples),
            last: 0.0,
            fade: GainFade::new(),
        }
    }

    /// Process a single sample.
    ///
    /// Reads the oldest buffered sample as the output, updates the damped
    /// feedback state `last = output*(1-damp) + last*damp`, writes
    /// `input + last*feedback` back into the delay line, and returns the
    /// output scaled by the crossfade gain.
    ///
    /// The feedback recursion decays toward zero on quiet input, so both
    /// the damping state and the written sample are flushed of subnormals;
    /// skipping this stalls the audio thread on real hardware.
    #[inline]
    pub fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let gain = self.fade.next_gain();

        let output = self.buffer.oldest();
        self.last = flush_denormal(output * (1.0 - damp) + self.last * damp);
        self.buffer.push(flush_denormal(input + self.last * feedback));

        output * gain
    }

    /// Begin a crossfade toward enabled (gain 1.0) or disabled (gain 0.0).
    pub fn start_fade(&mut self, enable: bool, fade_samples: u32) {
        self.fade.start(enable, fade_samples);
    }

    /// Snap the crossfade gain directly to enabled or disabled.
    pub fn snap_fade(&mut self, enable: bool) {
        self.fade.snap(enable);
    }

    /// True when the voice is fully faded out and can be skipped.
    #[inline]
    pub fn is_silent(&self) -> bool {
        self.fade.is_silent()
    }

    /// Current crossfade gain.
    #[inline]
    pub fn fade_gain(&self) -> f32 {
        self.fade.gain()
    }

    /// Resize the delay line (sample-rate change only). Clears all state.
    pub fn set_size(&mut self, delay_samples: usize) {
        self.buffer.set_size(delay_samples);
        self.last = 0.0;
    }

    /// Clear buffered history and the damping state without reallocating.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last = 0.0;
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; the delay length is never zero.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_echo_lands_at_delay_length() {
        let mut comb = CombFilter::new(100);

        assert_eq!(comb.process(1.0, 0.2, 0.8), 0.0);
        for _ in 0..99 {
            assert_eq!(comb.process(0.0, 0.2, 0.8), 0.0);
        }

        // Exactly 100 samples after the impulse was written it comes back
        let echo = comb.process(0.0, 0.2, 0.8);
        assert_eq!(echo, 1.0);
    }

    #[test]
    fn test_feedback_decay() {
        let mut comb = CombFilter::new(10);

        comb.process(1.0, 0.0, 0.5);
        let mut last_peak = f32::MAX;
        for _ in 0..10 {
            let mut peak = 0.0f32;
            for _ in 0..10 {
                peak = peak.max(comb.process(0.0, 0.0, 0.5).abs());
            }
            assert!(peak < last_peak, "echoes must decay");
            last_peak = peak;
        }
    }

    #[test]
    fn test_damping_reduces_energy() {
        let mut bright = CombFilter::new(20);
        let mut dark = CombFilter::new(20);

        bright.process(1.0, 0.0, 0.8);
        dark.process(1.0, 0.8, 0.8);

        let mut bright_sum = 0.0f32;
        let mut dark_sum = 0.0f32;
        for _ in 0..400 {
            bright_sum += bright.process(0.0, 0.0, 0.8).abs();
            dark_sum += dark.process(0.0, 0.8, 0.8).abs();
        }
        assert!(dark_sum < bright_sum);
    }

    #[test]
    fn test_fade_scales_output_only() {
        let mut faded = CombFilter::new(5);
        let mut reference = CombFilter::new(5);
        faded.snap_fade(false);

        // The faded voice must keep its internal state in sync with the
        // reference even while its output is silent.
        for i in 0..50 {
            let input = if i == 0 { 1.0 } else { 0.0 };
            let out = faded.process(input, 0.1, 0.7);
            reference.process(input, 0.1, 0.7);
            assert_eq!(out, 0.0);
        }

        faded.snap_fade(true);
        for _ in 0..50 {
            let a = faded.process(0.0, 0.1, 0.7);
            let b = reference.process(0.0, 0.1, 0.7);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_fade_converges_exactly() {
        let mut comb = CombFilter::new(4);
        // Ring the filter so the output is nonzero
        for _ in 0..8 {
            comb.process(1.0, 0.0, 0.5);
        }

        comb.start_fade(false, 32);
        let mut out = 1.0;
        for _ in 0..32 {
            out = comb.process(1.0, 0.0, 0.5);
        }
        assert_eq!(out, 0.0);
        assert!(comb.is_silent());
    }

    #[test]
    fn test_clear_silences() {
        let mut comb = CombFilter::new(8);
        for _ in 0..32 {
            comb.process(1.0, 0.3, 0.8);
        }
        comb.clear();
        for _ in 0..32 {
            assert_eq!(comb.process(0.0, 0.3, 0.8), 0.0);
        }
    }

    #[test]
    fn test_no_denormals_after_silence() {
        let mut comb = CombFilter::new(100);

        for _ in 0..1000 {
            comb.process(0.5, 0.3, 0.9);
        }

        // Feed silence; the tail must decay to hard zero without ever
        // passing through the IEEE 754 subnormal range.
        for i in 0..100_000 {
            let out = comb.process(0.0, 0.3, 0.9);
            assert!(
                out == 0.0 || out.abs() > f32::MIN_POSITIVE,
                "denormal at sample {i}: {out:.2e}"
            );
        }
    }
}
