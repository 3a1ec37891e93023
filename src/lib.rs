//! DTMF keypad tones.
//!
//! Resolve a keypad symbol to its frequency pair, synthesize the tone as an endless
//! stream of samples, and play it until stopped or for a fixed duration.
//!
//! ```
//! use dtmfrs::generator::SilentToneGenerator;
//!
//! let generator = SilentToneGenerator::from_key('#').unwrap();
//! generator.play_for_duration(0.1).unwrap();
//! assert!(generator.is_playing());
//! ```
//!
//! With the `playback` feature, `DtmfToneGenerator` plays on the default sound card.
//!
//! See: `demos/keypad.rs`

pub mod config;
pub mod errors;
pub mod generator;
pub mod keypad;
pub mod output;
pub mod synthesizer;
pub mod timer;
pub mod wave;

pub use crate::config::ToneConfig;
pub use crate::errors::{DtmfError, Result};
#[cfg(feature = "playback")]
pub use crate::generator::DtmfToneGenerator;
pub use crate::generator::{PlaybackState, SilentToneGenerator, ToneGenerator};
pub use crate::keypad::{resolve, FrequencyPair};
