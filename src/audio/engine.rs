//! Tone player for Morse playback.
//!
//! Each play request plans the Morse string into tone events and renders
//! them on a dedicated worker thread, so callers are never blocked. The
//! worker owns its [`ToneOutput`] for its whole lifetime: the audio device
//! is opened right before the first tone and released once the sequence
//! ends, whether it completed or failed.

use crate::audio::tone::{plan, synthesize, ToneEvent, ToneSettings, CHANNELS, SAMPLE_RATE};
use rodio::buffer::SamplesBuffer;
use rodio::source::Zero;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// Name given to playback worker threads.
const WORKER_NAME: &str = "morse-playback";

/// Errors that can stop a playback.
///
/// None of these are fatal to the application: the worker logs the error,
/// releases its output, and reports the error through its handle.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The audio output device could not be opened.
    #[error("failed to open audio output: {0}")]
    Device(String),
    /// Samples could not be written to the output.
    #[error("failed to write audio: {0}")]
    Write(String),
    /// The worker thread could not be started.
    #[error("failed to start playback worker: {0}")]
    Spawn(#[from] std::io::Error),
    /// The worker thread panicked before reporting.
    #[error("playback worker panicked")]
    WorkerPanicked,
    /// The result was already taken from the handle.
    #[error("playback result was already collected")]
    AlreadyCollected,
}

/// Summary of a rendered sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Number of tones rendered.
    pub tones: usize,
    /// Number of pauses rendered.
    pub pauses: usize,
    /// Total rendered time, tones and pauses included.
    pub duration: Duration,
}

/// Destination for rendered tones.
///
/// Implemented for the sound card ([`RodioOutput`]) and for WAV files
/// ([`crate::audio::export::WavOutput`]).
pub trait ToneOutput {
    /// Plays (or writes) one tone.
    fn tone(&mut self, samples: Vec<i16>) -> Result<(), PlaybackError>;

    /// Stays silent for the given time.
    fn pause(&mut self, duration: Duration) -> Result<(), PlaybackError>;

    /// Waits for queued audio to finish and releases the underlying device.
    ///
    /// Called exactly once at the end of every sequence, also after errors.
    fn release(&mut self);
}

/// Renders planned events into an output, in order.
///
/// Stops at the first error. The output is released in every case.
pub fn render_sequence<O: ToneOutput + ?Sized>(
    events: &[ToneEvent],
    settings: &ToneSettings,
    output: &mut O,
) -> Result<PlaybackReport, PlaybackError> {
    let result = render_events(events, settings, output);
    output.release();
    result
}

fn render_events<O: ToneOutput + ?Sized>(
    events: &[ToneEvent],
    settings: &ToneSettings,
    output: &mut O,
) -> Result<PlaybackReport, PlaybackError> {
    let mut report = PlaybackReport::default();

    for event in events {
        match *event {
            ToneEvent::Tone(duration) => {
                output.tone(synthesize(duration, settings.frequency_hz))?;
                report.tones += 1;
            }
            ToneEvent::Pause(duration) => {
                output.pause(duration)?;
                report.pauses += 1;
            }
        }
        report.duration += event.duration();
    }

    Ok(report)
}

/// An open audio device.
/// Field order matters: the sink must be dropped before the stream.
struct Device {
    sink: Sink,
    _handle: OutputStreamHandle,
    _stream: OutputStream,
}

impl Device {
    fn open() -> Result<Self, PlaybackError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| PlaybackError::Device(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
        tracing::debug!("Opened audio output");
        Ok(Self {
            sink,
            _handle: handle,
            _stream: stream,
        })
    }
}

/// Sound card output using rodio.
///
/// The device is opened lazily on the first tone. Tones and pauses are
/// queued on a single sink, so they play back to back in order.
///
/// rodio streams cannot always move between threads, so a `RodioOutput`
/// must be created on the thread that uses it (see [`TonePlayer::play_with`]).
#[derive(Default)]
pub struct RodioOutput {
    device: Option<Device>,
}

impl RodioOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn sink(&mut self) -> Result<&Sink, PlaybackError> {
        let device = match self.device.take() {
            Some(device) => device,
            None => Device::open()?,
        };
        Ok(&self.device.insert(device).sink)
    }
}

impl ToneOutput for RodioOutput {
    fn tone(&mut self, samples: Vec<i16>) -> Result<(), PlaybackError> {
        let sink = self.sink()?;
        sink.append(SamplesBuffer::new(CHANNELS, SAMPLE_RATE, samples));
        Ok(())
    }

    fn pause(&mut self, duration: Duration) -> Result<(), PlaybackError> {
        match &self.device {
            Some(device) => device
                .sink
                .append(Zero::<i16>::new(CHANNELS, SAMPLE_RATE).take_duration(duration)),
            // Nothing queued yet, so waiting here keeps the timing.
            None => thread::sleep(duration),
        }
        Ok(())
    }

    fn release(&mut self) {
        if let Some(device) = self.device.take() {
            device.sink.sleep_until_end();
            device.sink.stop();
            tracing::debug!("Released audio output");
        }
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        self.release();
    }
}

/// Plays Morse strings as tones on background workers.
#[derive(Debug, Clone, Default)]
pub struct TonePlayer {
    settings: ToneSettings,
}

impl TonePlayer {
    /// Creates a player with the given tone settings.
    pub fn new(settings: ToneSettings) -> Self {
        Self { settings }
    }

    /// Returns the tone settings.
    pub fn settings(&self) -> &ToneSettings {
        &self.settings
    }

    /// Plays a Morse string on the default audio device.
    ///
    /// Returns as soon as the worker has started.
    ///
    /// # Errors
    ///
    /// Returns error only if the worker thread cannot be spawned. Device
    /// errors happen on the worker and are reported through the handle.
    pub fn play(&self, morse: &str) -> Result<PlaybackHandle, PlaybackError> {
        self.play_with(morse, RodioOutput::new)
    }

    /// Plays a Morse string into an output built by `open` on the worker.
    pub fn play_with<F, O>(&self, morse: &str, open: F) -> Result<PlaybackHandle, PlaybackError>
    where
        F: FnOnce() -> O + Send + 'static,
        O: ToneOutput,
    {
        let events = plan(morse, &self.settings);
        let settings = self.settings.clone();

        let join = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || {
                let mut output = open();
                let result = render_sequence(&events, &settings, &mut output);
                match &result {
                    Ok(report) => tracing::info!(
                        "Playback finished: {} tones in {:?}",
                        report.tones,
                        report.duration
                    ),
                    Err(e) => tracing::error!("Playback stopped: {}", e),
                }
                result
            })?;

        Ok(PlaybackHandle { join: Some(join) })
    }
}

/// Handle to a running playback.
///
/// Dropping the handle lets the playback run to completion unobserved.
#[derive(Debug)]
pub struct PlaybackHandle {
    join: Option<JoinHandle<Result<PlaybackReport, PlaybackError>>>,
}

impl PlaybackHandle {
    /// Returns true once the worker has stopped.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(|join| join.is_finished())
    }

    /// Takes the result if the worker has stopped, without blocking.
    ///
    /// Returns `None` while playback is still running and after the result
    /// has been taken once.
    pub fn try_finish(&mut self) -> Option<Result<PlaybackReport, PlaybackError>> {
        if !self.is_finished() {
            return None;
        }
        self.join.take().map(Self::collect)
    }

    /// Blocks until the worker stops and returns its result.
    pub fn wait(mut self) -> Result<PlaybackReport, PlaybackError> {
        match self.join.take() {
            Some(join) => Self::collect(join),
            None => Err(PlaybackError::AlreadyCollected),
        }
    }

    fn collect(
        join: JoinHandle<Result<PlaybackReport, PlaybackError>>,
    ) -> Result<PlaybackReport, PlaybackError> {
        join.join().unwrap_or(Err(PlaybackError::WorkerPanicked))
    }
}
