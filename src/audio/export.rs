//! Audio export functionality.
//!
//! Renders a Morse string into a WAV file using the same tone plan and
//! sample format as live playback.

use crate::audio::engine::{render_sequence, PlaybackError, PlaybackReport, ToneOutput};
use crate::audio::tone::{
    plan, sample_count, ToneSettings, BITS_PER_SAMPLE, CHANNELS, SAMPLE_RATE,
};
use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use std::time::Duration;

/// WAV format shared by every export: 8 kHz, 16-bit, mono.
pub fn wav_spec() -> WavSpec {
    WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Tone output that writes samples into a WAV stream.
///
/// Pauses are written as silent samples. Call [`WavOutput::finalize`] after
/// rendering to complete the header.
pub struct WavOutput<W: Write + Seek> {
    writer: WavWriter<W>,
}

impl<W: Write + Seek> WavOutput<W> {
    /// Wraps a WAV writer created with [`wav_spec`].
    pub fn new(writer: WavWriter<W>) -> Self {
        Self { writer }
    }

    /// Writes the final header sizes and flushes the stream.
    pub fn finalize(self) -> Result<(), PlaybackError> {
        self.writer
            .finalize()
            .map_err(|e| PlaybackError::Write(e.to_string()))
    }

    fn write_samples(&mut self, samples: impl IntoIterator<Item = i16>) -> Result<(), PlaybackError> {
        for sample in samples {
            self.writer
                .write_sample(sample)
                .map_err(|e| PlaybackError::Write(e.to_string()))?;
        }
        Ok(())
    }
}

impl<W: Write + Seek> ToneOutput for WavOutput<W> {
    fn tone(&mut self, samples: Vec<i16>) -> Result<(), PlaybackError> {
        self.write_samples(samples)
    }

    fn pause(&mut self, duration: Duration) -> Result<(), PlaybackError> {
        self.write_samples(std::iter::repeat_n(0, sample_count(duration)))
    }

    fn release(&mut self) {}
}

/// Exports a Morse string to a WAV file.
///
/// # Arguments
///
/// * `morse` - The Morse string to render (dots, dashes and spaces)
/// * `settings` - Tone timings and frequency
/// * `output_path` - Path for the output WAV file
///
/// # Errors
///
/// Returns error if the output file cannot be created or written. A file
/// that fails part way is removed.
pub fn export_to_wav<P: AsRef<Path>>(
    morse: &str,
    settings: &ToneSettings,
    output_path: P,
) -> Result<PlaybackReport> {
    let output_path = output_path.as_ref();
    let events = plan(morse, settings);
    let report = export_events(output_path, |output| {
        render_sequence(&events, settings, output)
    })?;

    tracing::info!(
        "Exported {} tones ({:?}) to {}",
        report.tones,
        report.duration,
        output_path.display()
    );
    Ok(report)
}

/// Creates the WAV file, lets `render` fill it, and finalizes it.
///
/// On a render or finalize error the incomplete file is deleted.
fn export_events<F>(output_path: &Path, render: F) -> Result<PlaybackReport>
where
    F: FnOnce(&mut WavOutput<BufWriter<File>>) -> Result<PlaybackReport, PlaybackError>,
{
    let writer = WavWriter::create(output_path, wav_spec()).with_context(|| {
        format!(
            "Failed to create output WAV file: {}",
            output_path.display()
        )
    })?;

    let mut output = WavOutput::new(writer);
    let result = match render(&mut output) {
        Ok(report) => output
            .finalize()
            .context("Failed to finalize WAV file")
            .map(|()| report),
        Err(e) => {
            // Close the file before removing it.
            drop(output);
            Err(e).with_context(|| format!("Failed to render Morse to {}", output_path.display()))
        }
    };

    if result.is_err() {
        if let Err(e) = std::fs::remove_file(output_path) {
            tracing::warn!(
                "Failed to remove incomplete export {}: {}",
                output_path.display(),
                e
            );
        }
    }
    result
}
