//! The tone playback engine.
//!
//! A `ToneGenerator` owns one `FrequencyPair` and plays it through an `AudioOutput`,
//! either until `stop` or for a fixed time measured by a `Timer`. Every method takes
//! `&self`, so a generator can be shared between the thread that starts a tone and the one
//! that stops it.
//!
//! ```
//! use dtmfrs::generator::{PlaybackState, SilentToneGenerator};
//!
//! let generator = SilentToneGenerator::from_key('5').unwrap();
//! generator.play().unwrap();
//! assert_eq!(generator.state(), PlaybackState::Playing);
//!
//! generator.stop();
//! generator.stop(); // stopping twice is fine
//! assert_eq!(generator.state(), PlaybackState::Idle);
//! ```

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::ToneConfig;
use crate::errors::{DtmfError, Result};
use crate::keypad::{resolve, FrequencyPair};
use crate::output::{AudioOutput, NullOutput};
use crate::synthesizer::{make_samples, tone_samples};
use crate::timer::{ThreadTimer, Timer};
use crate::wave::dual_tone;

#[cfg(feature = "playback")]
use crate::output::CpalOutput;

/// Generator that plays on the default sound card
#[cfg(feature = "playback")]
pub type DtmfToneGenerator = ToneGenerator<CpalOutput, ThreadTimer>;

/// Generator that goes through the motions without making a sound
pub type SilentToneGenerator = ToneGenerator<NullOutput, ThreadTimer>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

pub struct ToneGenerator<O: AudioOutput, T: Timer> {
    inner: Arc<Inner<O, T>>,
}

struct Inner<O: AudioOutput, T: Timer> {
    pair: FrequencyPair,
    config: ToneConfig,
    output: O,
    timer: T,
    playback: Mutex<Playback<O::Session, T::Handle>>,
}

struct Playback<S, H> {
    // Bumped on every start and every armed deadline
    next_token: u64,
    active: Option<Active<S, H>>,
}

struct Active<S, H> {
    session: S,
    deadline: Option<Deadline<H>>,
}

struct Deadline<H> {
    token: u64,
    handle: H,
}

impl<S, H> Playback<S, H> {
    fn take_token(&mut self) -> u64 {
        self.next_token = self.next_token.wrapping_add(1);
        self.next_token
    }
}

impl<O: AudioOutput, T: Timer> Inner<O, T> {
    fn start(&self, playback: &mut Playback<O::Session, T::Handle>) -> Result<()> {
        let source = tone_samples(self.pair, self.config);

        let session = self
            .output
            .begin_continuous_playback(source)
            .map_err(|e| {
                warn!(pair = ?self.pair, "could not start tone: {}", e);
                e
            })?;

        playback.take_token();
        playback.active = Some(Active {
            session,
            deadline: None,
        });
        debug!(pair = ?self.pair, sample_rate = self.config.sample_rate, "tone started");

        Ok(())
    }

    fn release(&self, playback: &mut Playback<O::Session, T::Handle>) {
        let active = match playback.active.take() {
            Some(active) => active,
            None => {
                trace!("stop while idle");
                return;
            }
        };

        if let Some(deadline) = active.deadline {
            self.timer.cancel(deadline.handle);
        }
        self.output.end_playback(active.session);
        debug!(pair = ?self.pair, "tone stopped");
    }

    // Timer path. Only the deadline armed with `token` may stop the tone; anything else
    // is a timer that lost a race with `stop` or with a newer deadline.
    fn expire(&self, token: u64) {
        let mut playback = self.playback.lock();

        let current = playback
            .active
            .as_ref()
            .and_then(|active| active.deadline.as_ref())
            .map_or(false, |deadline| deadline.token == token);

        if current {
            // Already fired, nothing to cancel
            if let Some(active) = playback.active.as_mut() {
                active.deadline = None;
            }
            debug!(pair = ?self.pair, "tone duration elapsed");
            self.release(&mut playback);
        } else {
            trace!(token, "stale deadline ignored");
        }
    }
}

impl<O: AudioOutput, T: Timer> ToneGenerator<O, T> {
    /// A generator for `pair` with the default `ToneConfig`
    pub fn new(pair: FrequencyPair, output: O, timer: T) -> ToneGenerator<O, T> {
        ToneGenerator::build(pair, ToneConfig::default(), output, timer)
    }

    pub fn with_config(
        pair: FrequencyPair,
        config: ToneConfig,
        output: O,
        timer: T,
    ) -> Result<ToneGenerator<O, T>> {
        config.validate()?;
        Ok(ToneGenerator::build(pair, config, output, timer))
    }

    fn build(pair: FrequencyPair, config: ToneConfig, output: O, timer: T) -> ToneGenerator<O, T> {
        ToneGenerator {
            inner: Arc::new(Inner {
                pair,
                config,
                output,
                timer,
                playback: Mutex::new(Playback {
                    next_token: 0,
                    active: None,
                }),
            }),
        }
    }

    pub fn frequency_pair(&self) -> FrequencyPair {
        self.inner.pair
    }

    pub fn config(&self) -> ToneConfig {
        self.inner.config
    }

    pub fn state(&self) -> PlaybackState {
        if self.inner.playback.lock().active.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    /// Starts the tone and returns without waiting for it. A no-op while already playing:
    /// the running tone is neither restarted nor doubled.
    pub fn play(&self) -> Result<()> {
        let mut playback = self.inner.playback.lock();

        if playback.active.is_some() {
            trace!(pair = ?self.inner.pair, "already playing");
            return Ok(());
        }

        self.inner.start(&mut playback)
    }

    /// Plays for `seconds`, then stops as if `stop` had been called.
    ///
    /// Zero, negative and non-finite durations fail with `InvalidDuration`. When already
    /// playing, the tone carries on and the deadline moves to `seconds` from now.
    pub fn play_for_duration(&self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(DtmfError::InvalidDuration(seconds));
        }

        // Saturate beyond `Duration::MAX`, round sub-nanosecond lengths up
        let duration = Duration::try_from_secs_f64(seconds)
            .unwrap_or(Duration::MAX)
            .max(Duration::from_nanos(1));
        self.play_for(duration)
    }

    /// `play_for_duration` taking a `Duration`
    pub fn play_for(&self, duration: Duration) -> Result<()> {
        if duration.is_zero() {
            return Err(DtmfError::InvalidDuration(0.0));
        }

        let mut playback = self.inner.playback.lock();

        let started = playback.active.is_none();
        if started {
            self.inner.start(&mut playback)?;
        }

        let token = playback.take_token();
        let weak: Weak<Inner<O, T>> = Arc::downgrade(&self.inner);
        let callback = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.expire(token);
            }
        });

        let handle = match self.inner.timer.schedule_once(duration, callback) {
            Ok(handle) => handle,
            Err(e) => {
                warn!(pair = ?self.inner.pair, "could not arm tone deadline: {}", e);
                if started {
                    self.inner.release(&mut playback);
                }
                return Err(e);
            }
        };

        if let Some(active) = playback.active.as_mut() {
            let previous = active.deadline.replace(Deadline { token, handle });
            if let Some(previous) = previous {
                self.inner.timer.cancel(previous.handle);
            }
        }
        debug!(pair = ?self.inner.pair, ?duration, "tone deadline armed");

        Ok(())
    }

    /// Stops the tone and disarms any pending deadline. Does nothing when idle.
    pub fn stop(&self) {
        let mut playback = self.inner.playback.lock();
        self.inner.release(&mut playback);
    }

    /// Renders `seconds` of this tone into memory, independently of playback. Negative or
    /// non-finite lengths fail with `InvalidDuration`.
    pub fn render(&self, seconds: f64) -> Result<Vec<f64>> {
        make_samples(
            seconds,
            self.inner.config.sample_rate,
            dual_tone(self.inner.pair, self.inner.config.amplitude),
        )
    }
}

impl<O, T> ToneGenerator<O, T>
where
    O: AudioOutput + Default,
    T: Timer + Default,
{
    /// A generator for a keypad symbol, `0`-`9`, `*`, `#` or `A`-`D`
    pub fn from_key(key: char) -> Result<ToneGenerator<O, T>> {
        Ok(ToneGenerator::new(resolve(key)?, O::default(), T::default()))
    }

    /// A pure tone generator
    pub fn from_frequency(frequency: u32) -> Result<ToneGenerator<O, T>> {
        Ok(ToneGenerator::new(
            FrequencyPair::single(frequency)?,
            O::default(),
            T::default(),
        ))
    }

    /// A dual tone generator. A zero `frequency2` gives a pure tone.
    pub fn from_frequency_pair(frequency1: u32, frequency2: u32) -> Result<ToneGenerator<O, T>> {
        Ok(ToneGenerator::new(
            FrequencyPair::dual(frequency1, frequency2)?,
            O::default(),
            T::default(),
        ))
    }
}

impl<O: AudioOutput, T: Timer> Drop for ToneGenerator<O, T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<O: AudioOutput, T: Timer> fmt::Debug for ToneGenerator<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ToneGenerator")
            .field("pair", &self.inner.pair)
            .field("config", &self.inner.config)
            .field("state", &self.state())
            .finish()
    }
}
