//! Tone planning and synthesis.
//!
//! A Morse string is first planned into a list of [`ToneEvent`]s, which the
//! player and the WAV exporter then render. Samples are a fixed-frequency
//! sine at [`SAMPLE_RATE`], scaled to the 8-bit amplitude range and carried
//! in 16-bit mono PCM.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;
use std::time::Duration;

/// Output sample rate (8 kHz, 8 samples per millisecond).
pub const SAMPLE_RATE: u32 = 8000;

/// Number of output channels (mono).
pub const CHANNELS: u16 = 1;

/// Bits per output sample.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Peak amplitude of a tone in the 8-bit range.
pub const AMPLITUDE_8BIT: f64 = 127.0;

/// Shift that widens an 8-bit amplitude into the 16-bit sample range.
const WIDEN_SHIFT: u32 = 8;

/// Timing and pitch of the rendered tones.
///
/// Missing fields in a settings file take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneSettings {
    /// Tone frequency in Hz.
    pub frequency_hz: f64,
    /// Length of a dot tone in milliseconds.
    pub dot_ms: u64,
    /// Length of a dash tone in milliseconds.
    pub dash_ms: u64,
    /// Pause for a space character in milliseconds.
    pub space_ms: u64,
    /// Pause inserted after every tone in milliseconds.
    pub symbol_gap_ms: u64,
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            frequency_hz: 440.0,
            dot_ms: 100,
            dash_ms: 300,
            space_ms: 500,
            symbol_gap_ms: 100,
        }
    }
}

impl ToneSettings {
    /// Loads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid JSON, or
    /// describes settings that cannot be rendered.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tone settings: {}", path.display()))?;
        let settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse tone settings: {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("Invalid tone settings: {}", path.display()))?;
        Ok(settings)
    }

    /// Checks that the settings describe audible, renderable tones.
    pub fn validate(&self) -> Result<()> {
        let nyquist = SAMPLE_RATE as f64 / 2.0;
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            bail!("frequency must be positive, got {}", self.frequency_hz);
        }
        if self.frequency_hz >= nyquist {
            bail!(
                "frequency {} Hz is at or above the {} Hz Nyquist limit",
                self.frequency_hz,
                nyquist
            );
        }
        if self.dot_ms == 0 || self.dash_ms == 0 {
            bail!("dot and dash lengths must be non-zero");
        }
        Ok(())
    }

    pub fn dot(&self) -> Duration {
        Duration::from_millis(self.dot_ms)
    }

    pub fn dash(&self) -> Duration {
        Duration::from_millis(self.dash_ms)
    }

    pub fn space(&self) -> Duration {
        Duration::from_millis(self.space_ms)
    }

    pub fn symbol_gap(&self) -> Duration {
        Duration::from_millis(self.symbol_gap_ms)
    }
}

/// One step of a rendered Morse sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneEvent {
    /// Sound the tone for the given time.
    Tone(Duration),
    /// Stay silent for the given time.
    Pause(Duration),
}

impl ToneEvent {
    pub fn duration(&self) -> Duration {
        match self {
            ToneEvent::Tone(d) | ToneEvent::Pause(d) => *d,
        }
    }
}

/// Plans a Morse string into tone and pause events.
///
/// `.` and `-` become a tone followed by the symbol gap; a space becomes a
/// pause. Any other character (for example the unknown marker) is skipped.
pub fn plan(morse: &str, settings: &ToneSettings) -> Vec<ToneEvent> {
    let mut events = Vec::with_capacity(morse.len() * 2);

    for c in morse.chars() {
        match c {
            '.' => {
                events.push(ToneEvent::Tone(settings.dot()));
                events.push(ToneEvent::Pause(settings.symbol_gap()));
            }
            '-' => {
                events.push(ToneEvent::Tone(settings.dash()));
                events.push(ToneEvent::Pause(settings.symbol_gap()));
            }
            ' ' => events.push(ToneEvent::Pause(settings.space())),
            other => tracing::debug!("Skipping non-Morse character {:?}", other),
        }
    }

    events
}

/// Total playing time of a plan.
pub fn total_duration(events: &[ToneEvent]) -> Duration {
    events.iter().map(ToneEvent::duration).sum()
}

/// Number of samples needed to cover a duration at [`SAMPLE_RATE`].
pub fn sample_count(duration: Duration) -> usize {
    (duration.as_micros() * SAMPLE_RATE as u128 / 1_000_000) as usize
}

/// Synthesizes a sine tone of the given length.
///
/// Each sample is `sin(2π·f·i/rate)` scaled to ±127 and then widened into
/// the 16-bit range.
pub fn synthesize(duration: Duration, frequency_hz: f64) -> Vec<i16> {
    let samples_per_cycle = SAMPLE_RATE as f64 / frequency_hz;

    (0..sample_count(duration))
        .map(|i| {
            let phase = i as f64 / samples_per_cycle * 2.0 * PI;
            let level = (phase.sin() * AMPLITUDE_8BIT).round() as i16;
            level << WIDEN_SHIFT
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ToneSettings::default();
        assert_eq!(settings.dot(), Duration::from_millis(100));
        assert_eq!(settings.dash(), Duration::from_millis(300));
        assert_eq!(settings.space(), Duration::from_millis(500));
        assert_eq!(settings.symbol_gap(), Duration::from_millis(100));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_settings_json() {
        let settings: ToneSettings = serde_json::from_str(r#"{ "frequency_hz": 600.0 }"#).unwrap();
        assert_eq!(settings.frequency_hz, 600.0);
        assert_eq!(settings.dot_ms, 100);
        assert_eq!(settings.dash_ms, 300);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut settings = ToneSettings {
            frequency_hz: 0.0,
            ..ToneSettings::default()
        };
        assert!(settings.validate().is_err());

        settings.frequency_hz = 4000.0; // Nyquist at 8 kHz
        assert!(settings.validate().is_err());

        settings.frequency_hz = f64::NAN;
        assert!(settings.validate().is_err());

        settings.frequency_hz = 440.0;
        settings.dot_ms = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_settings_file() {
        let path = std::env::temp_dir().join(format!("morsetui-settings-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "dot_ms": 60, "dash_ms": 180 }"#).unwrap();

        let settings = ToneSettings::load(&path).unwrap();
        assert_eq!(settings.dot_ms, 60);
        assert_eq!(settings.dash_ms, 180);
        assert_eq!(settings.space_ms, 500);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = ToneSettings::load("/nonexistent/morsetui.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read tone settings"));
    }

    #[test]
    fn test_plan_sos() {
        let settings = ToneSettings::default();
        let events = plan("... --- ...", &settings);

        let tones: Vec<Duration> = events
            .iter()
            .filter_map(|e| match e {
                ToneEvent::Tone(d) => Some(*d),
                ToneEvent::Pause(_) => None,
            })
            .collect();
        assert_eq!(tones.len(), 9);
        assert_eq!(tones[0], settings.dot());
        assert_eq!(tones[3], settings.dash());
        assert_eq!(tones[8], settings.dot());

        // 9 tones, 9 symbol gaps, 2 spaces
        assert_eq!(events.len(), 20);
        assert_eq!(events[6], ToneEvent::Pause(settings.space()));
    }

    #[test]
    fn test_plan_skips_other_characters() {
        let settings = ToneSettings::default();
        assert!(plan("", &settings).is_empty());
        assert!(plan("[?]", &settings).is_empty());
        assert_eq!(plan(".x", &settings).len(), 2);
    }

    #[test]
    fn test_total_duration() {
        let settings = ToneSettings::default();
        // dot 100 + gap 100 + space 500 + dash 300 + gap 100
        let events = plan(". -", &settings);
        assert_eq!(total_duration(&events), Duration::from_millis(1100));
    }

    #[test]
    fn test_synthesize_length_and_range() {
        let samples = synthesize(Duration::from_millis(100), 440.0);
        assert_eq!(samples.len(), 800);
        assert_eq!(samples[0], 0);

        let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(peak <= 127 << 8);
        assert!(peak >= 120 << 8);
        assert!(samples.iter().all(|s| s % 256 == 0));
    }

    #[test]
    fn test_synthesize_frequency() {
        // One second at 440 Hz crosses zero upwards about 440 times.
        let samples = synthesize(Duration::from_secs(1), 440.0);
        let rising = samples
            .windows(2)
            .filter(|w| w[0] <= 0 && w[1] > 0)
            .count();
        assert!((438..=442).contains(&rising), "rising edges: {}", rising);
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(sample_count(Duration::from_millis(1)), 8);
        assert_eq!(sample_count(Duration::from_millis(300)), 2400);
        assert_eq!(sample_count(Duration::ZERO), 0);
    }
}
