//! Error types

use std::io;

use thiserror::Error;

/// Re-exported `Result` for dtmfrs errors
pub type Result<T> = std::result::Result<T, DtmfError>;

#[derive(Debug, Error)]
/// Everything that can go wrong building or driving a tone generator.
pub enum DtmfError {
    /// Symbol is not one of the sixteen keypad symbols
    #[error("unknown keypad symbol {0:?}")]
    UnknownKey(char),
    /// Primary frequency is zero
    #[error("invalid frequency: {0} Hz")]
    InvalidFrequency(u32),
    /// Playback duration is zero, negative or not finite
    #[error("invalid duration: {0}s")]
    InvalidDuration(f64),
    /// Sample rate or amplitude out of range
    #[error("invalid tone configuration: {0}")]
    InvalidConfig(String),
    /// Output device unavailable, or it rejected the session
    #[error("audio session error: {0}")]
    AudioSession(String),
    /// Duration timer could not be armed
    #[error("timer error: {0}")]
    Timer(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_formats_errors() {
        assert_eq!(
            DtmfError::UnknownKey('E').to_string(),
            "unknown keypad symbol 'E'"
        );
        assert_eq!(
            DtmfError::InvalidFrequency(0).to_string(),
            "invalid frequency: 0 Hz"
        );
        assert_eq!(
            DtmfError::InvalidDuration(-0.5).to_string(),
            "invalid duration: -0.5s"
        );
    }

    #[test]
    fn it_wraps_io_errors() {
        let err: DtmfError = io::Error::new(io::ErrorKind::Other, "no threads").into();
        assert!(matches!(err, DtmfError::Timer(_)));
    }
}
