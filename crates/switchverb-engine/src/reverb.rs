//! The reverb engine: signal path, parameter application, and the glue
//! between the randomizer, the crossfade clock, and the filter voices.
//!
//! The topology is Freeverb-shaped: per channel, 8 comb filters in
//! parallel feed 4 allpass diffusers in series. Each voice can be switched
//! in or out at runtime; switches ride a tempo-synced gain crossfade so
//! the texture changes stay click-free.

use switchverb_core::{AllPassFilter, CombFilter, LinearSmoother, wet_dry_mix};

use crate::crossfade::CrossfadeClock;
use crate::params::Parameters;
use crate::randomizer::TempoSyncedRandomizer;
use crate::{NUM_ALL_PASSES, NUM_COMBS};

/// Comb delay lengths in samples at the 44.1 kHz reference rate.
///
/// Octave-spaced rather than mutually prime: the resulting strong
/// periodicity is the instrument's signature sound, and the allpass chain
/// smears it as needed.
const COMB_TUNINGS_44K: [usize; NUM_COMBS] = [8092, 4096, 2048, 1024, 512, 256, 128, 64];

/// Allpass delay lengths in samples at the 44.1 kHz reference rate.
const ALLPASS_TUNINGS_44K: [usize; NUM_ALL_PASSES] = [556, 441, 341, 225];

/// Extra delay on the right channel to decorrelate the stereo image.
const STEREO_SPREAD: usize = 23;

/// Reference rate the tuning tables are defined at.
const REFERENCE_RATE: usize = 44100;

/// Fixed input attenuation keeping the feedback network numerically stable.
const INPUT_GAIN: f32 = 0.015;

/// Wet-level parameter to linear gain scale.
const WET_SCALE: f32 = 6.0;

/// Dry-level parameter to linear gain scale.
const DRY_SCALE: f32 = 2.0;

/// Room-size to feedback mapping: `feedback = room * SCALE + OFFSET`.
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;

/// Damping parameter to one-pole coefficient scale.
const DAMP_SCALE: f32 = 0.4;

/// Control-smoothing ramp length in seconds.
const SMOOTH_SECONDS: f64 = 0.01;

/// Comb voices enabled at construction.
const DEFAULT_COMBS: [bool; NUM_COMBS] = [false, false, false, true, true, true, false, false];

/// Allpass voices enabled at construction.
const DEFAULT_ALL_PASSES: [bool; NUM_ALL_PASSES] = [true, true, false, false];

/// Scale a reference-rate delay length to the target sample rate.
///
/// Integer arithmetic, truncating, matching the tuning tables' definition;
/// never less than one sample.
fn scale_tuning(samples: usize, sample_rate: f64) -> usize {
    ((sample_rate as usize) * samples / REFERENCE_RATE).max(1)
}

/// Freeverb-style reverb with per-voice switching and tempo-synced fades.
///
/// # Example
///
/// ```rust
/// use switchverb_engine::{Parameters, Reverb};
///
/// let mut verb = Reverb::new(44100.0);
/// let mut params = Parameters::default();
/// params.freeze_mode = 1.0;
/// verb.set_parameters(params);
/// assert_eq!(verb.input_gain(), 0.0);
/// ```
///
/// # Real-time contract
///
/// `process_stereo` and `process_mono` never allocate, lock, or block.
/// `set_sample_rate` reallocates delay lines and must only be called from
/// a non-realtime context (host prepare/reconfigure).
#[derive(Debug, Clone)]
pub struct Reverb {
    parameters: Parameters,
    gain: f32,

    enabled_combs: [bool; NUM_COMBS],
    enabled_all_passes: [bool; NUM_ALL_PASSES],
    all_pass_gains: [f32; NUM_ALL_PASSES],

    combs: [[CombFilter; NUM_COMBS]; 2],
    all_passes: [[AllPassFilter; NUM_ALL_PASSES]; 2],

    damping: LinearSmoother,
    feedback: LinearSmoother,
    dry_gain: LinearSmoother,
    wet_gain1: LinearSmoother,
    wet_gain2: LinearSmoother,

    randomizer: TempoSyncedRandomizer,
    crossfade: CrossfadeClock,

    sample_rate: f64,
}

impl Reverb {
    /// Create an engine at the given sample rate with the default voice
    /// pattern (combs 3-5, allpasses 0-1) and default [`Parameters`].
    pub fn new(sample_rate: f64) -> Self {
        let combs = core::array::from_fn(|ch| {
            core::array::from_fn(|i| {
                CombFilter::new(scale_tuning(
                    COMB_TUNINGS_44K[i] + ch * STEREO_SPREAD,
                    sample_rate,
                ))
            })
        });
        let all_passes = core::array::from_fn(|ch| {
            core::array::from_fn(|i| {
                AllPassFilter::new(scale_tuning(
                    ALLPASS_TUNINGS_44K[i] + ch * STEREO_SPREAD,
                    sample_rate,
                ))
            })
        });

        let mut crossfade = CrossfadeClock::new();
        crossfade.set_sample_rate(sample_rate);

        let mut verb = Self {
            parameters: Parameters::default(),
            gain: INPUT_GAIN,
            enabled_combs: DEFAULT_COMBS,
            enabled_all_passes: DEFAULT_ALL_PASSES,
            all_pass_gains: [1.0; NUM_ALL_PASSES],
            combs,
            all_passes,
            damping: LinearSmoother::new(),
            feedback: LinearSmoother::new(),
            dry_gain: LinearSmoother::new(),
            wet_gain1: LinearSmoother::new(),
            wet_gain2: LinearSmoother::new(),
            randomizer: TempoSyncedRandomizer::new(),
            crossfade,
            sample_rate,
        };

        // Disabled comb voices start silent; allpass fade gains stay at
        // unity because the per-voice blend gain is their control path.
        for ch in 0..2 {
            for i in 0..NUM_COMBS {
                verb.combs[ch][i].snap_fade(verb.enabled_combs[i]);
            }
        }

        // Apply defaults before the smoothers get a step budget, so the
        // engine comes up settled instead of ramping in from silence.
        verb.set_parameters(Parameters::default());
        for smoother in [
            &mut verb.damping,
            &mut verb.feedback,
            &mut verb.dry_gain,
            &mut verb.wet_gain1,
            &mut verb.wet_gain2,
        ] {
            smoother.reset(sample_rate, SMOOTH_SECONDS);
        }

        verb
    }

    /// Apply a full parameter snapshot.
    ///
    /// Derived gains (dry, the width-split wet pair, damping and feedback)
    /// become new smoother targets and ramp in over 10 ms; the input gain
    /// and the allpass blend gains take effect on the next sample. Allpass
    /// gains are clamped to \[0, 1\]; they need no smoothing of their own
    /// because toggles arrive through the crossfade path.
    pub fn set_parameters(&mut self, params: Parameters) {
        let wet = params.wet_level * WET_SCALE;
        self.dry_gain.set_target(params.dry_level * DRY_SCALE);
        self.wet_gain1.set_target(0.5 * wet * (1.0 + params.width));
        self.wet_gain2.set_target(0.5 * wet * (1.0 - params.width));

        self.gain = if params.is_frozen() { 0.0 } else { INPUT_GAIN };

        for (gain, param) in self.all_pass_gains.iter_mut().zip(params.all_pass_gain) {
            *gain = param.clamp(0.0, 1.0);
        }

        self.parameters = params;
        self.update_damping();
    }

    /// The parameter snapshot currently applied.
    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// Recompute the damping and feedback smoother targets.
    ///
    /// Freeze mode pins feedback at unity with no damping, sustaining the
    /// tail indefinitely.
    fn update_damping(&mut self) {
        if self.parameters.is_frozen() {
            self.set_damping_targets(0.0, 1.0);
        } else {
            self.set_damping_targets(
                self.parameters.damping * DAMP_SCALE,
                self.parameters.room_size * ROOM_SCALE + ROOM_OFFSET,
            );
        }
    }

    fn set_damping_targets(&mut self, damping: f32, feedback: f32) {
        self.damping.set_target(damping);
        self.feedback.set_target(feedback);
    }

    /// Resize every delay line for a new sample rate and reset the control
    /// smoothers' step budgets. Clears all buffered history.
    ///
    /// Must not be called from the audio thread.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;

        for ch in 0..2 {
            let spread = ch * STEREO_SPREAD;
            for i in 0..NUM_COMBS {
                self.combs[ch][i].set_size(scale_tuning(COMB_TUNINGS_44K[i] + spread, sample_rate));
            }
            for i in 0..NUM_ALL_PASSES {
                self.all_passes[ch][i]
                    .set_size(scale_tuning(ALLPASS_TUNINGS_44K[i] + spread, sample_rate));
            }
        }

        for smoother in [
            &mut self.damping,
            &mut self.feedback,
            &mut self.dry_gain,
            &mut self.wet_gain1,
            &mut self.wet_gain2,
        ] {
            smoother.reset(sample_rate, SMOOTH_SECONDS);
        }

        self.crossfade.set_sample_rate(sample_rate);

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "reverb delay lines resized");
    }

    /// Sample rate the delay lines are currently tuned for.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Clear all delay-line contents without reallocating.
    ///
    /// Smoother targets and enablement state are untouched.
    pub fn reset(&mut self) {
        for ch in 0..2 {
            for comb in &mut self.combs[ch] {
                comb.clear();
            }
            for all_pass in &mut self.all_passes[ch] {
                all_pass.clear();
            }
        }
    }

    /// Whether the engine is currently frozen.
    pub fn is_frozen(&self) -> bool {
        self.parameters.is_frozen()
    }

    /// Current input gain (0.0 while frozen).
    pub fn input_gain(&self) -> f32 {
        self.gain
    }

    /// Whether a comb voice is enabled.
    pub fn comb_enabled(&self, index: usize) -> bool {
        self.enabled_combs[index]
    }

    /// Switch a comb voice instantly, without a crossfade.
    ///
    /// Host toggle events that should fade go through
    /// [`update_all_filters`](Self::update_all_filters) instead.
    pub fn set_comb_enabled(&mut self, index: usize, enabled: bool) {
        self.enabled_combs[index] = enabled;
        for ch in 0..2 {
            self.combs[ch][index].snap_fade(enabled);
        }
    }

    /// Whether an allpass voice is enabled.
    pub fn all_pass_enabled(&self, index: usize) -> bool {
        self.enabled_all_passes[index]
    }

    /// Switch an allpass voice instantly, without a crossfade.
    pub fn set_all_pass_enabled(&mut self, index: usize, enabled: bool) {
        self.enabled_all_passes[index] = enabled;
        for ch in 0..2 {
            self.all_passes[ch][index].snap_fade(enabled);
        }
    }

    /// Per-voice allpass blend gain.
    pub fn all_pass_gain(&self, index: usize) -> f32 {
        self.all_pass_gains[index]
    }

    /// Set a per-voice allpass blend gain, clamped to \[0, 1\].
    ///
    /// Takes effect on the next processed sample; gradual changes are the
    /// caller's responsibility (host automation already is gradual).
    pub fn set_all_pass_gain(&mut self, index: usize, gain: f32) {
        self.all_pass_gains[index] = gain.clamp(0.0, 1.0);
    }

    /// Snapshot of both enablement arrays.
    pub fn enablement(&self) -> ([bool; NUM_COMBS], [bool; NUM_ALL_PASSES]) {
        (self.enabled_combs, self.enabled_all_passes)
    }

    /// Apply a batch of voice states, crossfading every voice that changed.
    ///
    /// The fade length is read from the crossfade clock once for the whole
    /// batch, and both channel instances of each changed voice start their
    /// fade with the same length, keeping the transition centered in the
    /// stereo image.
    pub fn update_all_filters(
        &mut self,
        new_combs: &[bool; NUM_COMBS],
        new_all_passes: &[bool; NUM_ALL_PASSES],
    ) {
        let fade_samples = self.crossfade.fade_samples();

        for i in 0..NUM_COMBS {
            if self.enabled_combs[i] != new_combs[i] {
                for ch in 0..2 {
                    self.combs[ch][i].start_fade(new_combs[i], fade_samples);
                }
                self.enabled_combs[i] = new_combs[i];
            }
        }

        for i in 0..NUM_ALL_PASSES {
            if self.enabled_all_passes[i] != new_all_passes[i] {
                for ch in 0..2 {
                    self.all_passes[ch][i].start_fade(new_all_passes[i], fade_samples);
                }
                self.enabled_all_passes[i] = new_all_passes[i];
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(fade_samples, "filter state batch applied");
    }

    /// Feed host transport info for the current block.
    ///
    /// Updates the crossfade clock's tempo and runs the randomizer; any
    /// switches it requests are applied through
    /// [`update_all_filters`](Self::update_all_filters) so they crossfade.
    /// Returns true when voice states changed, so a host can refresh its
    /// toggle displays.
    pub fn process_tempo(&mut self, bpm: f64, ppq_position: f64) -> bool {
        self.crossfade.update_tempo(bpm, self.sample_rate);

        let mut combs = self.enabled_combs;
        let mut all_passes = self.enabled_all_passes;
        if self
            .randomizer
            .process_tempo(ppq_position, &mut combs, &mut all_passes)
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(ppq_position, "randomizer trigger fired");

            self.update_all_filters(&combs, &all_passes);
            true
        } else {
            false
        }
    }

    /// The tempo-synced randomizer.
    pub fn randomizer(&self) -> &TempoSyncedRandomizer {
        &self.randomizer
    }

    /// Mutable access for routing host/UI events to the randomizer.
    pub fn randomizer_mut(&mut self) -> &mut TempoSyncedRandomizer {
        &mut self.randomizer
    }

    /// The crossfade clock.
    pub fn crossfade(&self) -> &CrossfadeClock {
        &self.crossfade
    }

    /// Mutable access for routing host/UI events to the crossfade clock.
    pub fn crossfade_mut(&mut self) -> &mut CrossfadeClock {
        &mut self.crossfade
    }

    /// Process a stereo buffer pair in place.
    ///
    /// Buffers must be the same length; in release builds a mismatch
    /// processes the common prefix.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(
            left.len(),
            right.len(),
            "stereo buffers must be the same length"
        );

        let frames = left.len().min(right.len());
        for i in 0..frames {
            let input = (left[i] + right[i]) * self.gain;

            let damp = self.damping.advance();
            let feedback = self.feedback.advance();

            let mut out_l = 0.0;
            let mut out_r = 0.0;

            // Accumulate the comb bank in parallel. A disabled voice keeps
            // processing until its fade-out has fully rendered; only then
            // is it skipped.
            for j in 0..NUM_COMBS {
                if !self.enabled_combs[j] && self.combs[0][j].is_silent() {
                    continue;
                }
                out_l += self.combs[0][j].process(input, damp, feedback);
                out_r += self.combs[1][j].process(input, damp, feedback);
            }

            // Run the allpass chain in series, blending each voice by its
            // gain rather than hard-bypassing.
            for j in 0..NUM_ALL_PASSES {
                let mix = self.all_pass_gains[j];
                if mix > 0.0 {
                    let processed_l = self.all_passes[0][j].process(out_l);
                    let processed_r = self.all_passes[1][j].process(out_r);
                    out_l = wet_dry_mix(out_l, processed_l, mix);
                    out_r = wet_dry_mix(out_r, processed_r, mix);
                }
            }

            let dry = self.dry_gain.advance();
            let wet1 = self.wet_gain1.advance();
            let wet2 = self.wet_gain2.advance();

            left[i] = out_l * wet1 + out_r * wet2 + left[i] * dry;
            right[i] = out_r * wet1 + out_l * wet2 + right[i] * dry;
        }
    }

    /// Process a mono buffer in place.
    ///
    /// The same pipeline collapsed to one channel, using the left filter
    /// instances and only the direct wet gain.
    pub fn process_mono(&mut self, samples: &mut [f32]) {
        for i in 0..samples.len() {
            let input = samples[i] * self.gain;

            let damp = self.damping.advance();
            let feedback = self.feedback.advance();

            let mut output = 0.0;
            for j in 0..NUM_COMBS {
                if !self.enabled_combs[j] && self.combs[0][j].is_silent() {
                    continue;
                }
                output += self.combs[0][j].process(input, damp, feedback);
            }

            for j in 0..NUM_ALL_PASSES {
                let mix = self.all_pass_gains[j];
                if mix > 0.0 {
                    let processed = self.all_passes[0][j].process(output);
                    output = wet_dry_mix(output, processed, mix);
                }
            }

            let dry = self.dry_gain.advance();
            let wet1 = self.wet_gain1.advance();

            samples[i] = output * wet1 + samples[i] * dry;
        }
    }
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FadeTiming;

    fn settle(verb: &mut Reverb, samples: usize) {
        let mut buf = vec![0.0f32; samples];
        verb.process_mono(&mut buf);
    }

    #[test]
    fn test_default_voice_pattern() {
        let verb = Reverb::new(44100.0);
        let (combs, all_passes) = verb.enablement();
        assert_eq!(combs, DEFAULT_COMBS);
        assert_eq!(all_passes, DEFAULT_ALL_PASSES);
    }

    #[test]
    fn test_impulse_produces_tail() {
        let mut verb = Reverb::new(44100.0);

        let mut left = vec![0.0f32; 4096];
        let mut right = vec![0.0f32; 4096];
        left[0] = 1.0;
        right[0] = 1.0;
        verb.process_stereo(&mut left, &mut right);

        let tail_energy: f32 = left[1..].iter().map(|x| x * x).sum();
        assert!(tail_energy > 0.0, "reverb must produce a tail");
        assert!(left.iter().all(|x| x.is_finite()));
        assert!(right.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_freeze_zeroes_input_gain() {
        let mut verb = Reverb::new(44100.0);
        assert_eq!(verb.input_gain(), INPUT_GAIN);

        let mut params = verb.parameters();
        params.freeze_mode = 1.0;
        // Room and damping values must be irrelevant while frozen
        params.room_size = 0.1;
        params.damping = 0.9;
        verb.set_parameters(params);

        assert!(verb.is_frozen());
        assert_eq!(verb.input_gain(), 0.0);

        params.freeze_mode = 0.0;
        verb.set_parameters(params);
        assert_eq!(verb.input_gain(), INPUT_GAIN);
    }

    #[test]
    fn test_frozen_tail_sustains() {
        let mut verb = Reverb::new(44100.0);

        // Isolate a single comb voice and disable the allpass chain so the
        // loop's energy is exactly measurable.
        for i in 0..NUM_COMBS {
            verb.set_comb_enabled(i, i == 3);
        }
        let mut params = verb.parameters();
        params.all_pass_gain = [0.0; NUM_ALL_PASSES];
        params.dry_level = 0.0;
        verb.set_parameters(params);

        // Seed the loop, then freeze
        let mut buf = vec![0.0f32; 2048];
        buf[0] = 1.0;
        verb.process_mono(&mut buf);

        params.freeze_mode = 1.0;
        verb.set_parameters(params);
        settle(&mut verb, 2048); // let the smoothers land on 1.0 / 0.0

        // Comb 3 is 1024 samples long at 44.1k: with feedback pinned at
        // unity and no damping, consecutive periods carry equal energy
        let period = 1024;
        let mut a = vec![0.0f32; period];
        let mut b = vec![0.0f32; period];
        verb.process_mono(&mut a);
        verb.process_mono(&mut b);

        let energy_a: f32 = a.iter().map(|x| x * x).sum();
        let energy_b: f32 = b.iter().map(|x| x * x).sum();
        assert!(energy_a > 0.0, "frozen loop must be ringing");
        assert!(
            (energy_a - energy_b).abs() < energy_a * 1e-3,
            "frozen tail must not decay: {energy_a} vs {energy_b}"
        );
    }

    #[test]
    fn test_parameter_round_trip_is_idempotent() {
        let mut verb = Reverb::new(48000.0);
        let mut params = verb.parameters();
        params.room_size = 0.8;
        params.wet_level = 0.5;
        params.width = 0.3;
        verb.set_parameters(params);

        // Let all ramps land, then verify re-applying the same snapshot
        // does not disturb the output
        settle(&mut verb, 48000);

        let mut twin = verb.clone();
        twin.set_parameters(twin.parameters());

        let mut buf_a = vec![0.25f32; 512];
        let mut buf_b = buf_a.clone();
        verb.process_mono(&mut buf_a);
        twin.process_mono(&mut buf_b);
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn test_all_pass_gain_zero_is_pass_through() {
        // With every allpass blend at zero, the wet path is the raw comb
        // sum: the first wet sample of an impulse arrives exactly at the
        // shortest enabled comb's delay, unsmeared.
        let mut verb = Reverb::new(44100.0);
        for i in 0..NUM_COMBS {
            verb.set_comb_enabled(i, i == 5); // 256 samples at 44.1k
        }
        let mut params = verb.parameters();
        params.all_pass_gain = [0.0; NUM_ALL_PASSES];
        params.dry_level = 0.0;
        verb.set_parameters(params);
        settle(&mut verb, 44100);

        let mut buf = vec![0.0f32; 512];
        buf[0] = 1.0;
        verb.process_mono(&mut buf);

        let first_nonzero = buf.iter().position(|x| *x != 0.0);
        assert_eq!(first_nonzero, Some(256));

        // Amplitude: input * INPUT_GAIN echoes back once, scaled by wet1
        let wet1 = 0.5 * (0.33 * WET_SCALE) * 2.0;
        let expected = INPUT_GAIN * wet1;
        assert!((buf[256] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_all_pass_gain_changes_response() {
        let mut verb_dry = Reverb::new(44100.0);
        let mut verb_wet = Reverb::new(44100.0);
        let mut params = verb_wet.parameters();
        params.all_pass_gain = [0.0; NUM_ALL_PASSES];
        verb_dry.set_parameters(params);
        settle(&mut verb_dry, 44100);
        settle(&mut verb_wet, 44100);

        let mut a = vec![0.0f32; 2048];
        a[0] = 1.0;
        let mut b = a.clone();
        verb_dry.process_mono(&mut a);
        verb_wet.process_mono(&mut b);
        assert_ne!(a, b, "allpass chain must shape the response");
    }

    #[test]
    fn test_sample_rate_scales_delay_lengths() {
        let mut verb = Reverb::new(44100.0);
        for i in 0..NUM_COMBS {
            verb.set_comb_enabled(i, i == 4); // 512 at 44.1k
        }
        let mut params = verb.parameters();
        params.all_pass_gain = [0.0; NUM_ALL_PASSES];
        params.dry_level = 0.0;
        verb.set_parameters(params);

        verb.set_sample_rate(88200.0);
        settle(&mut verb, 88200);

        let mut buf = vec![0.0f32; 2048];
        buf[0] = 1.0;
        verb.process_mono(&mut buf);

        // 512 * 88200 / 44100 = 1024
        assert_eq!(buf.iter().position(|x| *x != 0.0), Some(1024));
    }

    #[test]
    fn test_reset_clears_tail_but_not_targets() {
        let mut verb = Reverb::new(44100.0);
        let mut params = verb.parameters();
        params.dry_level = 0.0;
        verb.set_parameters(params);
        settle(&mut verb, 44100);

        let mut buf = vec![1.0f32; 1024];
        verb.process_mono(&mut buf);
        verb.reset();

        let mut silence = vec![0.0f32; 4096];
        verb.process_mono(&mut silence);
        assert!(
            silence.iter().all(|x| *x == 0.0),
            "reset must clear all buffered history"
        );
        // Parameters survive the reset
        assert_eq!(verb.parameters(), params);
    }

    #[test]
    fn test_update_all_filters_diffs_state() {
        let mut verb = Reverb::new(44100.0);
        let (mut combs, all_passes) = verb.enablement();
        combs[0] = true; // was disabled
        combs[3] = false; // was enabled

        verb.update_all_filters(&combs, &all_passes);
        let (now_combs, now_aps) = verb.enablement();
        assert_eq!(now_combs, combs);
        assert_eq!(now_aps, all_passes);
    }

    #[test]
    fn test_randomized_switches_crossfade() {
        let mut verb = Reverb::new(44100.0);
        *verb.randomizer_mut() = TempoSyncedRandomizer::with_seed(21);
        verb.randomizer_mut().set_enabled(true);
        verb.randomizer_mut().set_amount(1.0);
        verb.crossfade_mut().set_timing(FadeTiming::Quarter);

        let before = verb.enablement();
        assert!(verb.process_tempo(120.0, 4.0));
        let after = verb.enablement();
        assert_ne!(before, after, "amount 1.0 must flip every voice");

        // A quarter-note fade at 120 bpm / 44.1kHz is 22050 samples; right
        // after the trigger the fades are still in flight, so a voice that
        // just disabled is still audible
        let fade = verb.crossfade().fade_samples();
        assert_eq!(fade, 22050);
    }

    #[test]
    fn test_mono_and_stereo_share_topology() {
        let mut stereo = Reverb::new(44100.0);
        let mut mono = stereo.clone();

        let mut left = vec![0.0f32; 1024];
        left[0] = 0.5;
        let mut right = left.clone();
        let mut center = left.clone();

        stereo.process_stereo(&mut left, &mut right);
        mono.process_mono(&mut center);

        // Identical content on both channels reaches the same comb input
        // ((L+R)*gain vs mono*gain differs by 2x), so outputs correlate
        // but are not equal; both must be finite and nonzero
        assert!(left.iter().any(|x| *x != 0.0));
        assert!(center.iter().any(|x| *x != 0.0));
    }
}
