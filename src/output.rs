//! Audio output collaborators.
//!
//! A generator hands an `AudioOutput` a sample source when playback starts and gives the
//! returned session back when it stops. Sessions are plain owned values; dropping one
//! must release whatever it holds.

use crate::errors::Result;
use crate::synthesizer::SamplesIter;

#[cfg(feature = "playback")]
mod device;
#[cfg(feature = "playback")]
pub use device::{CpalOutput, CpalSession};

/// Something that can play an endless sample stream.
pub trait AudioOutput: Send + Sync + 'static {
    /// Handle for one active playback. Owned by the generator while playing.
    type Session: Send + 'static;

    /// Starts pulling samples from `source` and returns once playback is under way.
    fn begin_continuous_playback(&self, source: SamplesIter) -> Result<Self::Session>;

    /// Stops the playback behind `session`. Must not block on the generator that owns it.
    fn end_playback(&self, session: Self::Session);
}

/// Accepts every session and discards the audio. For hosts without a sound device.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

/// Session returned by `NullOutput`
#[derive(Debug)]
pub struct NullSession {
    sample_rate: u32,
}

impl NullSession {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl AudioOutput for NullOutput {
    type Session = NullSession;

    fn begin_continuous_playback(&self, source: SamplesIter) -> Result<NullSession> {
        Ok(NullSession {
            sample_rate: source.sample_rate(),
        })
    }

    fn end_playback(&self, _session: NullSession) {}
}
