//! Keypad symbol to frequency pair resolution.
//!
//! Frequencies follow the ITU-T Q.23 keypad layout: each key is the sum of the
//! tone for its row (low group) and the tone for its column (high group).
//!
//! ```
//! use dtmfrs::keypad::{resolve, FrequencyPair};
//!
//! assert_eq!(resolve('5').unwrap(), FrequencyPair::dual(770, 1336).unwrap());
//! assert!(resolve('E').is_err());
//! ```

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::errors::{DtmfError, Result};

/// Row frequencies, top to bottom
pub const LOW_GROUP: [u32; 4] = [697, 770, 852, 941];

/// Column frequencies, left to right
pub const HIGH_GROUP: [u32; 4] = [1209, 1336, 1477, 1633];

/// The sixteen keypad symbols, row by row
pub const KEYS: [char; 16] = [
    '1', '2', '3', 'A', //
    '4', '5', '6', 'B', //
    '7', '8', '9', 'C', //
    '*', '0', '#', 'D', //
];

lazy_static! {
    static ref KEYPAD: HashMap<char, FrequencyPair> = KEYS
        .iter()
        .enumerate()
        .map(|(i, &key)| {
            let pair = FrequencyPair {
                frequency1: LOW_GROUP[i / 4],
                frequency2: Some(HIGH_GROUP[i % 4]),
            };
            (key, pair)
        })
        .collect();
}

/// One frequency (pure tone) or two (dual tone), in hertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrequencyPair {
    frequency1: u32,
    frequency2: Option<u32>,
}

impl FrequencyPair {
    /// A pure tone. Fails on zero.
    pub fn single(frequency: u32) -> Result<FrequencyPair> {
        if frequency == 0 {
            return Err(DtmfError::InvalidFrequency(frequency));
        }

        Ok(FrequencyPair {
            frequency1: frequency,
            frequency2: None,
        })
    }

    /// A dual tone. Fails when `frequency1` is zero; a zero `frequency2` gives a pure tone.
    pub fn dual(frequency1: u32, frequency2: u32) -> Result<FrequencyPair> {
        let mut pair = FrequencyPair::single(frequency1)?;
        if frequency2 != 0 {
            pair.frequency2 = Some(frequency2);
        }
        Ok(pair)
    }

    pub fn frequency1(&self) -> u32 {
        self.frequency1
    }

    pub fn frequency2(&self) -> Option<u32> {
        self.frequency2
    }

    pub fn is_dual(&self) -> bool {
        self.frequency2.is_some()
    }
}

/// Looks up the frequency pair for a keypad symbol. Matching is exact: `'a'` is not `'A'`.
pub fn resolve(key: char) -> Result<FrequencyPair> {
    KEYPAD.get(&key).copied().ok_or(DtmfError::UnknownKey(key))
}
