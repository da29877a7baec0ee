//! Cross-thread parameter handoff.
//!
//! The audio thread must never observe a half-written [`Parameters`]
//! bundle, and must never block waiting for one. [`ParamSlot`] is a
//! single-producer/single-consumer slot: the control thread publishes
//! whole snapshots under a short exclusive section, and the audio thread
//! drains the slot at block boundaries with a non-blocking `try_lock` -
//! if the lock happens to be contended, the snapshot is simply picked up
//! on the next block.

use parking_lot::Mutex;

use crate::params::Parameters;

/// Last-writer-wins handoff slot for parameter snapshots.
///
/// # Example
///
/// ```rust
/// use switchverb_engine::{ParamSlot, Parameters, Reverb};
///
/// let slot = ParamSlot::new();
///
/// // Control thread:
/// slot.publish(Parameters { room_size: 0.9, ..Parameters::default() });
///
/// // Audio thread, at the top of each block:
/// let mut verb = Reverb::new(48000.0);
/// if let Some(params) = slot.take() {
///     verb.set_parameters(params);
/// }
/// ```
#[derive(Debug, Default)]
pub struct ParamSlot {
    pending: Mutex<Option<Parameters>>,
}

impl ParamSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }

    /// Publish a snapshot from the control thread.
    ///
    /// Overwrites any snapshot the audio thread has not collected yet;
    /// intermediate values of a fast-moving control are dropped, which is
    /// exactly what smoothed parameters want. The critical section is the
    /// duration of one `Option` store.
    pub fn publish(&self, params: Parameters) {
        *self.pending.lock() = Some(params);
    }

    /// Collect the pending snapshot, if any, without ever blocking.
    ///
    /// Called from the audio thread at block boundaries. Returns `None`
    /// both when nothing is pending and when the control thread happens to
    /// hold the lock this instant.
    pub fn take(&self) -> Option<Parameters> {
        self.pending.try_lock()?.take()
    }
}
