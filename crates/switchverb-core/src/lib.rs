//! Switchverb Core - DSP primitives for the switchverb reverb engine
//!
//! This crate provides the delay-line filters and control-smoothing blocks
//! the reverb engine is assembled from, designed for real-time audio
//! processing with zero allocation in the audio path.
//!
//! # Building Blocks
//!
//! ## Delay-Line Filters
//!
//! - [`DelayBuffer`] - Fixed-length circular sample buffer
//! - [`CombFilter`] - Feedback comb with one-pole damping and gain crossfade
//! - [`AllPassFilter`] - Schroeder allpass diffuser with gain crossfade
//!
//! ## Control Smoothing
//!
//! Click-free parameter and enablement changes:
//!
//! - [`LinearSmoother`] - Linear ramp over a fixed step budget
//! - [`GainFade`] - Per-voice enable/disable crossfade state
//!
//! ## Utilities
//!
//! - [`flush_denormal`] - Subnormal-float guard for feedback loops
//! - [`wet_dry_mix`] - Single-multiply dry/wet blend
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! switchverb-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths; buffer
//!   (re)allocation happens only in `set_size`, outside the audio callback
//! - **Denormal-safe**: Feedback recursions flush subnormals to zero
//! - **Exact transitions**: Fades and ramps land on their target exactly
//!   when their countdown expires, never asymptotically

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod delay;
pub mod fade;
pub mod math;
pub mod smooth;

// Re-export main types at crate root
pub use allpass::AllPassFilter;
pub use comb::CombFilter;
pub use delay::DelayBuffer;
pub use fade::GainFade;
pub use math::{flush_denormal, wet_dry_mix};
pub use smooth::LinearSmoother;
