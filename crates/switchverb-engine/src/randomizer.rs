//! Tempo-synced stochastic filter switching.
//!
//! Once per musical subdivision the randomizer visits each filter voice in
//! its selected target set and flips the voice's enabled state with
//! independent probability `amount`. Triggering is driven by the host's
//! PPQ transport position, not wall-clock time, so the switching stays
//! locked to playback.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::{NUM_ALL_PASSES, NUM_COMBS};

/// Musical subdivision between randomizer triggers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RandomRate {
    /// Every sixteenth note (0.25 beats).
    SixteenthNote,
    /// Every eighth note (0.5 beats).
    EighthNote,
    /// Every quarter note (1 beat).
    #[default]
    QuarterNote,
    /// Every half note (2 beats).
    HalfNote,
    /// Every whole note (4 beats).
    WholeNote,
    /// Every two bars (8 beats, assuming 4/4).
    TwoBars,
    /// Every four bars (16 beats).
    FourBars,
    /// Every eight bars (32 beats).
    EightBars,
}

impl RandomRate {
    /// Trigger interval in quarter notes.
    pub fn quarter_notes(self) -> f64 {
        match self {
            RandomRate::SixteenthNote => 0.25,
            RandomRate::EighthNote => 0.5,
            RandomRate::QuarterNote => 1.0,
            RandomRate::HalfNote => 2.0,
            RandomRate::WholeNote => 4.0,
            RandomRate::TwoBars => 8.0,
            RandomRate::FourBars => 16.0,
            RandomRate::EightBars => 32.0,
        }
    }

    /// Decode from the float parameter encoding, clamping out-of-range
    /// values to the nearest valid selector.
    pub fn from_param(value: f32) -> Self {
        match value.max(0.0) as usize {
            0 => RandomRate::SixteenthNote,
            1 => RandomRate::EighthNote,
            2 => RandomRate::QuarterNote,
            3 => RandomRate::HalfNote,
            4 => RandomRate::WholeNote,
            5 => RandomRate::TwoBars,
            6 => RandomRate::FourBars,
            _ => RandomRate::EightBars,
        }
    }

    /// Encode as the float parameter representation.
    pub fn as_param(self) -> f32 {
        self as u8 as f32
    }
}

/// Which filter voices the randomizer is allowed to flip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterTarget {
    /// Only the 8 comb voices.
    CombsOnly,
    /// Only the 4 allpass voices.
    AllPassOnly,
    /// Both banks.
    #[default]
    Both,
}

impl FilterTarget {
    /// Decode from the float parameter encoding, clamping out-of-range
    /// values to the nearest valid selector.
    pub fn from_param(value: f32) -> Self {
        match value.max(0.0) as usize {
            0 => FilterTarget::CombsOnly,
            1 => FilterTarget::AllPassOnly,
            _ => FilterTarget::Both,
        }
    }

    /// Encode as the float parameter representation.
    pub fn as_param(self) -> f32 {
        self as u8 as f32
    }
}

/// Flips filter voices on musical-subdivision boundaries.
///
/// The randomizer owns a private [`SmallRng`] seeded from OS entropy at
/// construction; [`with_seed`](Self::with_seed) builds a deterministic
/// instance for tests. It holds no reference to the engine - the engine
/// hands it the current enablement arrays and applies whatever comes back
/// through its crossfade path.
///
/// Changing the rate, the target set, or re-enabling resets the last
/// trigger position to zero, so the next transport check may fire
/// immediately. That makes control changes feel responsive at the cost of
/// one non-interval-aligned trigger.
#[derive(Debug, Clone)]
pub struct TempoSyncedRandomizer {
    enabled: bool,
    rate: RandomRate,
    target: FilterTarget,
    amount: f32,
    last_trigger_ppq: f64,
    rng: SmallRng,
}

impl TempoSyncedRandomizer {
    /// Create a randomizer seeded from OS entropy, disabled, at the
    /// default quarter-note rate.
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_os_rng())
    }

    /// Create a deterministic randomizer for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        Self {
            enabled: false,
            rate: RandomRate::QuarterNote,
            target: FilterTarget::Both,
            amount: 0.5,
            last_trigger_ppq: 0.0,
            rng,
        }
    }

    /// Enable or disable triggering. Enabling resets the trigger position
    /// so the next check can fire immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.last_trigger_ppq = 0.0;
        }
    }

    /// Set the trigger subdivision. Resets the trigger position.
    pub fn set_rate(&mut self, rate: RandomRate) {
        self.rate = rate;
        self.last_trigger_ppq = 0.0;
    }

    /// Set which filter banks get randomized. Resets the trigger position.
    pub fn set_target(&mut self, target: FilterTarget) {
        self.target = target;
        self.last_trigger_ppq = 0.0;
    }

    /// Set the per-voice flip probability, clamped to \[0, 1\].
    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount.clamp(0.0, 1.0);
    }

    /// Whether triggering is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current trigger subdivision.
    pub fn rate(&self) -> RandomRate {
        self.rate
    }

    /// Current filter-bank target.
    pub fn target(&self) -> FilterTarget {
        self.target
    }

    /// Current per-voice flip probability.
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Transport position (in quarter notes) of the last trigger.
    pub fn last_trigger_ppq(&self) -> f64 {
        self.last_trigger_ppq
    }

    /// Check the transport position and fire at most one trigger.
    ///
    /// Called once per audio block with the host's PPQ position. When the
    /// position has advanced a full subdivision past the last trigger, each
    /// voice in the target set is flipped with probability `amount`
    /// (independent Bernoulli trial per voice) directly in the supplied
    /// arrays. The trigger position advances even when `amount` is zero -
    /// the beat is consumed either way.
    ///
    /// Returns true when any voice actually changed state.
    pub fn process_tempo(
        &mut self,
        ppq: f64,
        combs: &mut [bool; NUM_COMBS],
        all_passes: &mut [bool; NUM_ALL_PASSES],
    ) -> bool {
        if !self.enabled {
            return false;
        }

        let interval = self.rate.quarter_notes();
        if ppq - self.last_trigger_ppq < interval {
            return false;
        }
        self.last_trigger_ppq = ppq;

        self.randomize(combs, all_passes)
    }

    /// Flip voices in the target set, returning whether anything changed.
    fn randomize(
        &mut self,
        combs: &mut [bool; NUM_COMBS],
        all_passes: &mut [bool; NUM_ALL_PASSES],
    ) -> bool {
        if self.amount <= 0.0 {
            return false;
        }

        let mut changed = false;

        if matches!(self.target, FilterTarget::CombsOnly | FilterTarget::Both) {
            for state in combs.iter_mut() {
                if self.rng.random::<f32>() < self.amount {
                    *state = !*state;
                    changed = true;
                }
            }
        }

        if matches!(self.target, FilterTarget::AllPassOnly | FilterTarget::Both) {
            for state in all_passes.iter_mut() {
                if self.rng.random::<f32>() < self.amount {
                    *state = !*state;
                    changed = true;
                }
            }
        }

        changed
    }
}

impl Default for TempoSyncedRandomizer {
    fn default() -> Self {
        Self::new()
    }
}
