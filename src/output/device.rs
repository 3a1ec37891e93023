//! Sound card output using cpal.
//!
//! `cpal::Stream` can't move between threads on every platform, so each session gets a
//! thread that opens the stream, holds it, and drops it when the session goes away.

use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SizedSample, Stream, StreamConfig};
use crossbeam::channel::{bounded, Sender};
use tracing::{debug, error, warn};

use super::AudioOutput;
use crate::errors::{DtmfError, Result};
use crate::synthesizer::{quantize, SamplesIter};

/// Plays tones on a cpal output device, the host default unless a device name is given.
#[derive(Debug, Default, Clone)]
pub struct CpalOutput {
    device_name: Option<String>,
}

impl CpalOutput {
    pub fn new() -> CpalOutput {
        CpalOutput::default()
    }

    /// Output on the device called `name` instead of the default one.
    pub fn with_device(name: impl Into<String>) -> CpalOutput {
        CpalOutput {
            device_name: Some(name.into()),
        }
    }
}

/// A running output stream. Dropping it stops the stream and joins its thread.
pub struct CpalSession {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Drop for CpalSession {
    fn drop(&mut self) {
        // Disconnecting wakes the output thread
        self.stop.take();

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("tone output thread panicked");
            }
        }
    }
}

impl AudioOutput for CpalOutput {
    type Session = CpalSession;

    fn begin_continuous_playback(&self, source: SamplesIter) -> Result<CpalSession> {
        let (ready_sender, ready_receiver) = bounded::<Result<()>>(1);
        let (stop_sender, stop_receiver) = bounded::<()>(0);
        let device_name = self.device_name.clone();

        let thread = thread::Builder::new()
            .name("dtmf_out".to_string())
            .spawn(move || {
                let stream = match open_stream(device_name.as_deref(), source) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_sender.send(Err(e));
                        return;
                    }
                };
                let _ = ready_sender.send(Ok(()));

                // Blocks until the session is dropped
                let _ = stop_receiver.recv();
                drop(stream);
                debug!("tone output stream closed");
            })
            .map_err(|e| DtmfError::AudioSession(format!("failed to spawn output thread: {}", e)))?;

        let session = CpalSession {
            stop: Some(stop_sender),
            thread: Some(thread),
        };

        match ready_receiver.recv() {
            Ok(Ok(())) => Ok(session),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(DtmfError::AudioSession(
                "output thread exited before the stream started".to_string(),
            )),
        }
    }

    fn end_playback(&self, session: CpalSession) {
        drop(session);
    }
}

fn open_stream(device_name: Option<&str>, source: SamplesIter) -> Result<Stream> {
    let host = cpal::default_host();

    let device = match device_name {
        Some(name) => host
            .output_devices()
            .map_err(|e| DtmfError::AudioSession(format!("failed to list output devices: {}", e)))?
            .find(|device| device.name().map(|n| n == name).unwrap_or(false)),
        None => host.default_output_device(),
    }
    .ok_or_else(|| DtmfError::AudioSession("no output device available".to_string()))?;

    let supported = device
        .default_output_config()
        .map_err(|e| DtmfError::AudioSession(format!("failed to get default output config: {}", e)))?;

    let config = StreamConfig {
        channels: supported.channels(),
        sample_rate: cpal::SampleRate(source.sample_rate()),
        buffer_size: cpal::BufferSize::Default,
    };

    debug!(
        device = %device.name().unwrap_or_default(),
        channels = config.channels,
        sample_rate = source.sample_rate(),
        "opening tone output stream"
    );

    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => build_stream(&device, &config, source, |s| s as f32)?,
        cpal::SampleFormat::I16 => build_stream(&device, &config, source, quantize::<i16>)?,
        cpal::SampleFormat::U16 => {
            build_stream(&device, &config, source, |s| u16::from_sample(s as f32))?
        }
        format => {
            return Err(DtmfError::AudioSession(format!(
                "unsupported sample format: {:?}",
                format
            )))
        }
    };

    stream
        .play()
        .map_err(|e| DtmfError::AudioSession(format!("failed to start stream: {}", e)))?;

    Ok(stream)
}

fn build_stream<T, F>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut source: SamplesIter,
    convert: F,
) -> Result<Stream>
where
    T: SizedSample,
    F: Fn(f64) -> T + Send + 'static,
{
    let channels = usize::from(config.channels.max(1));

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Mono tone, same sample on every channel of a frame
                for frame in data.chunks_mut(channels) {
                    let value = convert(source.next().unwrap_or(0.0));
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            |err| error!("tone output stream error: {}", err),
            None,
        )
        .map_err(|e| DtmfError::AudioSession(format!("failed to build output stream: {}", e)))
}
