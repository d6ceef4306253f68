//! Settings for offline rendering of a patch.
//!
//! Every field has a default, so an empty TOML file (or none at all) is a
//! valid configuration:
//!
//! ```toml
//! sample_rate = 48000
//! bpm = 120.0
//! clocks_per_beat = 4
//! steps = 16
//! run_connected = false
//! retrigger_connected = true
//! ```

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How to drive a module when rendering without a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Host sample rate in Hz.
    pub sample_rate: u32,

    /// Tempo of the generated clock.
    pub bpm: f32,

    /// Clock pulses per beat (4 = sixteenth notes).
    pub clocks_per_beat: u32,

    /// Number of clock pulses to render.
    pub steps: usize,

    /// Overrides the patch's clock delay when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_delay: Option<usize>,

    /// Patch a (constant low) cable into the Run jack, which holds gates
    /// open until the next step.
    pub run_connected: bool,

    /// Treat the retrigger output as patched. When false, retriggers show up
    /// as short gaps in the gate.
    pub retrigger_connected: bool,

    /// Start the transport running regardless of the saved state.
    pub start_running: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            bpm: 120.0,
            clocks_per_beat: 4,
            steps: 16,
            clock_delay: None,
            run_connected: false,
            retrigger_connected: true,
            start_running: true,
        }
    }
}

impl RenderConfig {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Override the tempo.
    pub fn with_bpm(mut self, bpm: f32) -> Self {
        self.bpm = bpm;
        self
    }

    /// Override the number of rendered clock pulses.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Length of one clock period in samples (at least 2, so every period
    /// has a high and a low half).
    pub fn clock_period_samples(&self) -> usize {
        let pulses_per_second = self.bpm.max(1.0) / 60.0 * self.clocks_per_beat.max(1) as f32;
        let period = (self.sample_rate as f32 / pulses_per_second) as usize;
        period.max(2)
    }

    /// Total samples needed for [`steps`](Self::steps) clock periods.
    pub fn total_samples(&self) -> usize {
        self.clock_period_samples() * self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = RenderConfig::from_toml("").unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = RenderConfig::from_toml("bpm = 90.0\nclock_delay = 3\n").unwrap();
        assert_eq!(config.bpm, 90.0);
        assert_eq!(config.clock_delay, Some(3));
        assert_eq!(config.sample_rate, 48000);
        assert!(config.retrigger_connected);
    }

    #[test]
    fn wrong_type_is_an_error() {
        let err = RenderConfig::from_toml("steps = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn clock_period_at_default_tempo() {
        // 120 bpm sixteenths = 8 Hz
        assert_eq!(RenderConfig::default().clock_period_samples(), 6000);
        assert_eq!(RenderConfig::default().total_samples(), 96000);
    }

    #[test]
    fn clock_period_never_degenerates() {
        let config = RenderConfig {
            sample_rate: 10,
            bpm: 100_000.0,
            ..RenderConfig::default()
        };
        assert_eq!(config.clock_period_samples(), 2);
    }

    #[test]
    fn builders_override() {
        let config = RenderConfig::default().with_bpm(60.0).with_steps(4);
        assert_eq!(config.clock_period_samples(), 12000);
        assert_eq!(config.total_samples(), 48000);
    }

    #[test]
    fn toml_round_trip() {
        let config = RenderConfig {
            clock_delay: Some(5),
            run_connected: true,
            ..RenderConfig::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(RenderConfig::from_toml(&text).unwrap(), config);
    }
}
