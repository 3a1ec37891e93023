//! Waveform functions. Each takes a time `t` in seconds and returns an amplitude.
//!
//! ```
//! use dtmfrs::wave::sine_wave;
//!
//! let a4 = sine_wave(440.0);
//! assert_eq!(a4(0.0), 0.0);
//! ```

use std::f64::consts::PI;

use crate::keypad::FrequencyPair;

/// A unit sine at `frequency` hertz
pub fn sine_wave(frequency: f64) -> impl Fn(f64) -> f64 {
    move |t| (t * frequency * 2.0 * PI).sin()
}

/// The tone for `pair` with peak `amplitude`.
///
/// A pure tone is `A·sin(2πf₁t)`. A dual tone weights each component by `A/2` so the sum
/// never exceeds `A`.
pub fn dual_tone(pair: FrequencyPair, amplitude: f64) -> impl Fn(f64) -> f64 {
    let low = sine_wave(f64::from(pair.frequency1()));
    let high = pair.frequency2().map(|f| sine_wave(f64::from(f)));

    move |t| match high {
        Some(ref high) => 0.5 * amplitude * (low(t) + high(t)),
        None => amplitude * low(t),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn it_makes_sine_waves() {
        let sine = sine_wave(1.0);
        assert_abs_diff_eq!(sine(0.0), 0.0);
        assert_abs_diff_eq!(sine(0.25), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sine(0.75), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn it_scales_pure_tones() {
        let tone = dual_tone(FrequencyPair::single(1).unwrap(), 0.8);
        assert_abs_diff_eq!(tone(0.25), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn it_halves_dual_tone_components() {
        let pair = FrequencyPair::dual(697, 1209).unwrap();
        let tone = dual_tone(pair, 1.0);
        let low = sine_wave(697.0);
        let high = sine_wave(1209.0);

        for &t in &[0.0, 0.0001, 0.00123, 0.5, 0.999] {
            assert_abs_diff_eq!(tone(t), 0.5 * low(t) + 0.5 * high(t), epsilon = 1e-12);
        }
    }

    #[test]
    fn it_never_exceeds_peak_amplitude() {
        let tone = dual_tone(FrequencyPair::dual(941, 1633).unwrap(), 0.5);
        for i in 0..8_000 {
            assert!(tone(i as f64 / 8_000.0).abs() <= 0.5 + 1e-12);
        }
    }
}
