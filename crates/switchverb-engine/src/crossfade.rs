//! Tempo-synced crossfade timing.
//!
//! When filter voices switch state, the engine fades their gain over a
//! musical interval instead of cutting instantly. [`CrossfadeClock`] maps
//! the selected subdivision plus the most recently observed tempo and
//! sample rate to a fade length in samples. It holds no audio state of its
//! own - it is a pure function of those three values.

/// Musical length of a filter-switch crossfade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FadeTiming {
    /// ~1 ms, a click-suppression floor rather than a musical value.
    Immediate,
    /// 1/64 note (0.0625 beats).
    SixtyFourth,
    /// 1/32 note (0.125 beats).
    #[default]
    ThirtySecond,
    /// 1/16 note (0.25 beats).
    Sixteenth,
    /// 1/8 note (0.5 beats).
    Eighth,
    /// 1/4 note (1 beat).
    Quarter,
}

impl FadeTiming {
    /// Fade length in quarter notes. Zero for [`Immediate`](Self::Immediate),
    /// which is defined in milliseconds, not beats.
    pub fn beats(self) -> f64 {
        match self {
            FadeTiming::Immediate => 0.0,
            FadeTiming::SixtyFourth => 0.0625,
            FadeTiming::ThirtySecond => 0.125,
            FadeTiming::Sixteenth => 0.25,
            FadeTiming::Eighth => 0.5,
            FadeTiming::Quarter => 1.0,
        }
    }

    /// Decode from the float parameter encoding, clamping out-of-range
    /// values to the nearest valid selector.
    pub fn from_param(value: f32) -> Self {
        match value.max(0.0) as usize {
            0 => FadeTiming::Immediate,
            1 => FadeTiming::SixtyFourth,
            2 => FadeTiming::ThirtySecond,
            3 => FadeTiming::Sixteenth,
            4 => FadeTiming::Eighth,
            _ => FadeTiming::Quarter,
        }
    }

    /// Encode as the float parameter representation.
    pub fn as_param(self) -> f32 {
        self as u8 as f32
    }
}

/// Converts musical fade timing to a sample count at the current tempo.
///
/// The host-integration layer calls [`update_tempo`](Self::update_tempo)
/// once per audio block; the engine reads
/// [`fade_samples`](Self::fade_samples) immediately before starting a batch
/// of voice crossfades.
#[derive(Debug, Clone)]
pub struct CrossfadeClock {
    timing: FadeTiming,
    bpm: f64,
    sample_rate: f64,
}

impl CrossfadeClock {
    /// Create a clock at the default 1/32-note timing, 150 bpm, 44.1 kHz.
    pub fn new() -> Self {
        Self {
            timing: FadeTiming::ThirtySecond,
            bpm: 150.0,
            sample_rate: 44100.0,
        }
    }

    /// Record the tempo and sample rate observed for the current block.
    pub fn update_tempo(&mut self, bpm: f64, sample_rate: f64) {
        self.bpm = bpm.max(1.0);
        self.sample_rate = sample_rate;
    }

    /// Update only the sample rate (engine sample-rate changes).
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Select the musical fade length.
    pub fn set_timing(&mut self, timing: FadeTiming) {
        self.timing = timing;
    }

    /// Current musical fade length.
    pub fn timing(&self) -> FadeTiming {
        self.timing
    }

    /// Most recently observed tempo in beats per minute.
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Most recently observed sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Fade length in samples at the current tempo and sample rate.
    ///
    /// `Immediate` maps to 1 ms regardless of tempo; everything else is
    /// `round(beats / beats_per_sample)`.
    pub fn fade_samples(&self) -> u32 {
        if self.timing == FadeTiming::Immediate {
            return (self.sample_rate * 0.001) as u32;
        }

        let beats_per_sample = self.bpm / (60.0 * self.sample_rate);
        (self.timing.beats() / beats_per_sample).round() as u32
    }
}

impl Default for CrossfadeClock {
    fn default() -> Self {
        Self::new()
    }
}
