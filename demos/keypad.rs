//! Dial a sequence of keys on the default sound card.
//!
//!     cargo run --features playback --example keypad -- 555-0123#
//!
//! Characters that are not keypad symbols (dashes, spaces) are skipped.

use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dtmfrs::config::ToneConfig;
use dtmfrs::keypad::resolve;
use dtmfrs::output::CpalOutput;
use dtmfrs::timer::ThreadTimer;
use dtmfrs::{DtmfToneGenerator, Result, ToneGenerator};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Keys to dial, e.g. 555-0123#
    keys: String,

    /// Tone length in seconds
    #[clap(long, default_value_t = 0.1)]
    tone: f64,

    /// Silence between tones in seconds
    #[clap(long, default_value_t = 0.07)]
    gap: f64,

    /// Peak amplitude, 0.0 to 1.0
    #[clap(long, default_value_t = 0.5)]
    amplitude: f64,

    /// Output sample rate in hertz
    #[clap(long, default_value_t = 44_100)]
    sample_rate: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();
    let config = ToneConfig::new(args.sample_rate, args.amplitude)?;

    for key in args.keys.chars() {
        let pair = match resolve(key) {
            Ok(pair) => pair,
            Err(_) => continue,
        };

        let generator: DtmfToneGenerator =
            ToneGenerator::with_config(pair, config, CpalOutput::new(), ThreadTimer)?;
        generator.play_for_duration(args.tone)?;

        while generator.is_playing() {
            thread::sleep(Duration::from_millis(5));
        }
        thread::sleep(Duration::from_secs_f64(args.gap.max(0.0)));
    }

    Ok(())
}
