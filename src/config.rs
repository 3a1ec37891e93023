//! Tone rendering configuration

use crate::errors::{DtmfError, Result};

/// Sample rate used when none is given, in hertz
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Peak amplitude used when none is given. A dual tone splits this between its two components.
pub const DEFAULT_AMPLITUDE: f64 = 0.5;

/// How a generator renders its waveform: output sample rate and peak amplitude `A`.
///
/// ```
/// use dtmfrs::config::ToneConfig;
///
/// let config = ToneConfig::new(8_000, 0.25).unwrap();
/// assert_eq!(config.sample_rate, 8_000);
///
/// assert!(ToneConfig::new(0, 0.25).is_err());
/// assert!(ToneConfig::new(8_000, 1.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneConfig {
    /// Output sample rate in hertz
    pub sample_rate: u32,
    /// Peak amplitude in `(0.0, 1.0]`
    pub amplitude: f64,
}

impl ToneConfig {
    /// Returns a validated configuration
    pub fn new(sample_rate: u32, amplitude: f64) -> Result<ToneConfig> {
        let config = ToneConfig {
            sample_rate,
            amplitude,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_sample_rate(self, sample_rate: u32) -> Result<ToneConfig> {
        ToneConfig::new(sample_rate, self.amplitude)
    }

    pub fn with_amplitude(self, amplitude: f64) -> Result<ToneConfig> {
        ToneConfig::new(self.sample_rate, amplitude)
    }

    /// Checks the invariants `ToneConfig::new` enforces. Fields are public, so generators
    /// re-check before use.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(DtmfError::InvalidConfig(
                "sample rate must be positive".to_string(),
            ));
        }

        if !self.amplitude.is_finite() || self.amplitude <= 0.0 || self.amplitude > 1.0 {
            return Err(DtmfError::InvalidConfig(format!(
                "amplitude {} outside (0.0, 1.0]",
                self.amplitude
            )));
        }

        Ok(())
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        ToneConfig {
            sample_rate: DEFAULT_SAMPLE_RATE,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }
}
