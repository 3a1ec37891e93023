//! Turn waveforms into samples.
//!
//! Playback pulls from a `SamplesIter`, which produces samples lazily and never ends. The
//! following takes the first 10ms of the `5` key at 8kHz:
//!
//! ```
//! use dtmfrs::config::ToneConfig;
//! use dtmfrs::keypad::resolve;
//! use dtmfrs::synthesizer::tone_samples;
//!
//! let config = ToneConfig::new(8_000, 0.5).unwrap();
//! let samples: Vec<f64> = tone_samples(resolve('5').unwrap(), config).take(80).collect();
//! assert_eq!(samples.len(), 80);
//! ```

use std::mem::size_of;

use num::traits::{Bounded, FromPrimitive, Num, Zero};

use crate::config::ToneConfig;
use crate::errors::{DtmfError, Result};
use crate::keypad::FrequencyPair;
use crate::wave::dual_tone;

/// Quantizes a `f64` sample in [-1.0, 1.0] to signed integer PCM, spanning the full range
/// of `T`. Out-of-range input quantizes to 0.
///
/// ```
/// use dtmfrs::synthesizer::quantize;
///
/// assert_eq!(quantize::<i16>(1.0f64), i16::MAX);
/// assert_eq!(quantize::<i16>(0.0f64), 0i16);
/// ```
pub fn quantize<T>(input: f64) -> T
where
    T: Num + FromPrimitive + Bounded + Zero,
{
    let quantization_levels = 2.0f64.powf(size_of::<T>() as f64 * 8.0) - 1.0;
    T::from_f64(input * (quantization_levels / 2.0)).unwrap_or_else(T::zero)
}

/// Renders `length` seconds of a waveform at `sample_rate`.
///
/// Fails with `InvalidDuration` when `length` is negative or not finite, or when the
/// buffer can't be allocated.
pub fn make_samples<F>(length: f64, sample_rate: u32, waveform: F) -> Result<Vec<f64>>
where
    F: Fn(f64) -> f64,
{
    if !length.is_finite() || length < 0.0 {
        return Err(DtmfError::InvalidDuration(length));
    }

    let num_samples = (f64::from(sample_rate) * length).floor();
    if num_samples >= usize::MAX as f64 {
        return Err(DtmfError::InvalidDuration(length));
    }
    let num_samples = num_samples as usize;

    let mut samples = Vec::new();
    samples
        .try_reserve_exact(num_samples)
        .map_err(|_| DtmfError::InvalidDuration(length))?;
    samples.extend((0..num_samples).map(|i| waveform(i as f64 / f64::from(sample_rate))));

    Ok(samples)
}

/// An iterator that generates samples of a waveform at a given sample rate. It never
/// returns `None`.
///
/// ```
/// use dtmfrs::synthesizer::SamplesIter;
/// use dtmfrs::wave::sine_wave;
///
/// let sine_iter = SamplesIter::new(44_100, Box::new(sine_wave(440.0)));
/// let samples = sine_iter.take(44_100).collect::<Vec<f64>>(); // take 1 second of samples
/// assert_eq!(samples.len(), 44_100);
/// ```
pub struct SamplesIter {
    i: u64,
    period: Option<u64>,
    sample_rate: u32,
    waveform: Box<dyn Fn(f64) -> f64 + Send + 'static>,
}

impl SamplesIter {
    /// Returns an iterator that generates samples for the waveform at the given sample rate
    pub fn new(sample_rate: u32, waveform: Box<dyn Fn(f64) -> f64 + Send + 'static>) -> SamplesIter {
        SamplesIter {
            i: 0,
            period: None,
            sample_rate,
            waveform,
        }
    }

    /// Like `new`, for a waveform that repeats exactly every `period` samples. The sample
    /// index wraps at `period` so `t` stays small however long the iterator runs.
    pub fn periodic(
        sample_rate: u32,
        period: u64,
        waveform: Box<dyn Fn(f64) -> f64 + Send + 'static>,
    ) -> SamplesIter {
        SamplesIter {
            period: Some(period).filter(|&p| p > 0),
            ..SamplesIter::new(sample_rate, waveform)
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Iterator for SamplesIter {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let t = self.i as f64 / f64::from(self.sample_rate);
        self.i += 1;
        if let Some(period) = self.period {
            self.i %= period;
        }
        Some((self.waveform)(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// A fresh sample stream for `pair`, starting at phase zero.
///
/// Whole-hertz tones repeat every second, so the stream wraps once per `sample_rate`
/// samples.
pub fn tone_samples(pair: FrequencyPair, config: ToneConfig) -> SamplesIter {
    SamplesIter::periodic(
        config.sample_rate,
        u64::from(config.sample_rate),
        Box::new(dual_tone(pair, config.amplitude)),
    )
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;
    use rand::Rng;

    use super::*;
    use crate::keypad::resolve;
    use crate::wave::sine_wave;

    #[test]
    fn it_quantizes() {
        assert_eq!(i8::MAX, quantize::<i8>(1.0));
        assert_eq!(i16::MAX, quantize::<i16>(1.0));
        assert_eq!(0i16, quantize::<i16>(0.0));
        assert_eq!(-i16::MAX, quantize::<i16>(-1.0));
        assert_eq!(16383i16, quantize::<i16>(0.5));
        assert_eq!(0i16, quantize::<i16>(2.0));
    }

    #[test]
    fn test_samples_iterator() {
        let mut iter = SamplesIter::new(1, Box::new(sine_wave(3.1415)));
        assert_eq!(iter.next().unwrap(), 0.0);
        assert_abs_diff_eq!(iter.next().unwrap(), 0.7764865126870779, epsilon = 1e-12);
        assert_abs_diff_eq!(iter.next().unwrap(), 0.9785809043254725, epsilon = 1e-12);
    }

    #[test]
    fn test_make_samples() {
        let samples = make_samples(3.0, 1, sine_wave(3.1415)).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], 0.0);
        assert_abs_diff_eq!(samples[1], 0.7764865126870779, epsilon = 1e-12);
        assert_abs_diff_eq!(samples[2], 0.9785809043254725, epsilon = 1e-12);

        assert!(make_samples(0.0, 44_100, sine_wave(440.0)).unwrap().is_empty());
    }

    #[test]
    fn it_refuses_unbounded_lengths() {
        for &length in &[f64::INFINITY, f64::NEG_INFINITY, f64::NAN, -1.0, 1e300] {
            assert!(matches!(
                make_samples(length, 44_100, sine_wave(440.0)),
                Err(DtmfError::InvalidDuration(_))
            ));
        }
    }

    #[test]
    fn it_superposes_dual_tones() {
        let pair = resolve('5').unwrap();
        let config = ToneConfig::new(44_100, 0.8).unwrap();
        let rate = 44_100.0;

        for (n, sample) in tone_samples(pair, config).take(1_000).enumerate() {
            let n = n as f64;
            let expected = 0.4 * (2.0 * PI * 770.0 * n / rate).sin()
                + 0.4 * (2.0 * PI * 1336.0 * n / rate).sin();
            assert_abs_diff_eq!(sample, expected, epsilon = 1e-9);
            assert!(sample.abs() <= 0.8);
        }
    }

    #[test]
    fn it_superposes_random_pairs() {
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let f1 = rng.gen_range(200..4_000);
            let f2 = rng.gen_range(200..4_000);
            let rate = *[8_000u32, 16_000, 44_100, 48_000]
                .iter()
                .nth(rng.gen_range(0..4))
                .unwrap();
            let config = ToneConfig::new(rate, 1.0).unwrap();
            let pair = FrequencyPair::dual(f1, f2).unwrap();

            for (n, sample) in tone_samples(pair, config).take(1_000).enumerate() {
                let t = n as f64 / f64::from(rate);
                let expected = 0.5 * (2.0 * PI * f64::from(f1) * t).sin()
                    + 0.5 * (2.0 * PI * f64::from(f2) * t).sin();
                assert_abs_diff_eq!(sample, expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn it_generates_pure_tones() {
        let config = ToneConfig::new(8_000, 0.5).unwrap();
        let pair = FrequencyPair::single(1_000).unwrap();

        for (n, sample) in tone_samples(pair, config).take(1_000).enumerate() {
            let expected = 0.5 * (2.0 * PI * 1_000.0 * n as f64 / 8_000.0).sin();
            assert_abs_diff_eq!(sample, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn it_stays_phase_continuous_across_the_wrap() {
        let config = ToneConfig::new(8_000, 1.0).unwrap();
        let pair = resolve('#').unwrap();
        let waveform = dual_tone(pair, 1.0);

        // Second second of audio, computed without wrapping
        let samples: Vec<f64> = tone_samples(pair, config).skip(8_000).take(200).collect();
        for (k, sample) in samples.iter().enumerate() {
            let t = (8_000 + k) as f64 / 8_000.0;
            assert_abs_diff_eq!(*sample, waveform(t), epsilon = 1e-9);
        }
    }

    #[test]
    fn it_restarts_from_silence() {
        let config = ToneConfig::default();
        let pair = resolve('1').unwrap();

        let first: Vec<f64> = tone_samples(pair, config).take(64).collect();
        let second: Vec<f64> = tone_samples(pair, config).take(64).collect();
        assert_eq!(first[0], 0.0);
        assert_eq!(first, second);
    }
}
