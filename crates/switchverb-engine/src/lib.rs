//! Switchverb Engine - a Freeverb-style reverb with tempo-synced filter switching
//!
//! The engine is a bank of 8 parallel comb filters feeding 4 series allpass
//! diffusers per channel, with three control layers on top:
//!
//! - [`Parameters`] - the full control snapshot (room, damping, wet/dry,
//!   width, freeze, randomizer and crossfade settings), applied atomically
//!   and smoothed into the signal path over 10 ms ramps
//! - [`TempoSyncedRandomizer`] - flips individual filter voices on and off
//!   in time with host playback, once per selected musical subdivision
//! - [`CrossfadeClock`] - converts a musical subdivision and the current
//!   tempo into a fade length in samples, so every switch rides a gain ramp
//!   instead of clicking
//!
//! # Example
//!
//! ```rust
//! use switchverb_engine::{Parameters, Reverb};
//!
//! let mut verb = Reverb::new(48000.0);
//! verb.set_parameters(Parameters {
//!     room_size: 0.8,
//!     wet_level: 0.4,
//!     ..Parameters::default()
//! });
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! left[0] = 1.0;
//! right[0] = 1.0;
//! verb.process_stereo(&mut left, &mut right);
//! ```
//!
//! # Threading
//!
//! All processing entry points run on a single real-time audio thread and
//! never allocate, lock, or block. A control thread hands full parameter
//! snapshots to the audio thread through [`ParamSlot`]; the audio thread
//! drains it at block boundaries with a non-blocking `try_lock`.
//!
//! # Features
//!
//! - `tracing`: emit `tracing` debug events for sample-rate changes,
//!   randomizer firings, and filter-state batches.

pub mod crossfade;
pub mod params;
pub mod randomizer;
pub mod reverb;
pub mod shared;

/// Number of comb voices per channel.
pub const NUM_COMBS: usize = 8;

/// Number of allpass voices per channel.
pub const NUM_ALL_PASSES: usize = 4;

// Re-export main types at crate root
pub use crossfade::{CrossfadeClock, FadeTiming};
pub use params::Parameters;
pub use randomizer::{FilterTarget, RandomRate, TempoSyncedRandomizer};
pub use reverb::Reverb;
pub use shared::ParamSlot;
