//! Playback position and run/record state.
//!
//! The transport does not own pattern data. Operations that depend on a
//! pattern's length take the [`PatternStore`] as an argument.

use crate::pattern::{NUM_PATTERNS, PatternStore};

/// Step index meaning "reset, waiting for the first clock".
pub const STEP_NOT_STARTED: i32 = -1;

/// Where the transport currently points, resolved against pattern geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPosition {
    /// Pattern index.
    pub pattern: usize,
    /// Measure within the pattern.
    pub measure: usize,
    /// Step within the measure.
    pub step_in_measure: usize,
}

/// Sequencer transport.
///
/// The step index stays within `[-1, steps_in_pattern - 1]`; advancing past
/// the last step loops to 0. Only [`reset`](Self::reset) returns it to -1.
///
/// # Example
///
/// ```rust
/// use pianoroll_core::{PatternStore, Transport};
///
/// let store = PatternStore::new();
/// let mut transport = Transport::new();
/// assert_eq!(transport.current_step_in_pattern(), -1);
///
/// transport.advance_step(&store);
/// assert_eq!(transport.current_step_in_pattern(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transport {
    pattern: usize,
    step: i32,
    running: bool,
    recording: bool,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    /// Stopped, not recording, pattern 0, before the first step.
    pub fn new() -> Self {
        Self {
            pattern: 0,
            step: STEP_NOT_STARTED,
            running: false,
            recording: false,
        }
    }

    /// Back to pattern 0 before the first step, stopped and not recording.
    pub fn reset(&mut self) {
        self.pattern = 0;
        self.step = STEP_NOT_STARTED;
        self.running = false;
        self.recording = false;

        #[cfg(feature = "tracing")]
        tracing::debug!("transport: reset");
    }

    /// Select a pattern. Out-of-range indices clamp to the last pattern.
    pub fn set_pattern(&mut self, pattern: usize) {
        self.pattern = pattern.min(NUM_PATTERNS - 1);
    }

    /// Jump to an absolute step index. Values below -1 clamp to -1.
    pub fn set_step_in_pattern(&mut self, step: i32) {
        self.step = step.max(STEP_NOT_STARTED);
    }

    /// Flip the recording flag.
    pub fn toggle_recording(&mut self) {
        self.recording = !self.recording;

        #[cfg(feature = "tracing")]
        tracing::debug!(recording = self.recording, "transport: record toggled");
    }

    /// Flip the running flag.
    pub fn toggle_run(&mut self) {
        self.running = !self.running;

        #[cfg(feature = "tracing")]
        tracing::debug!(running = self.running, "transport: run toggled");
    }

    /// Set the running flag.
    pub fn set_run(&mut self, running: bool) {
        self.running = running;
    }

    /// Move one step forward, looping to 0 after the pattern's last step.
    pub fn advance_step(&mut self, store: &PatternStore) {
        let total = store.steps_in_pattern(self.pattern) as i32;
        self.step += 1;
        if self.step >= total {
            self.step = 0;
        }
    }

    /// Current pattern index.
    pub fn current_pattern(&self) -> usize {
        self.pattern
    }

    /// Current absolute step index (-1 before the first clock).
    pub fn current_step_in_pattern(&self) -> i32 {
        self.step
    }

    /// Measure containing the current step (`step / steps_per_measure`,
    /// truncating, so -1 maps to measure 0).
    pub fn current_measure(&self, store: &PatternStore) -> i32 {
        self.step / store.steps_per_measure(self.pattern) as i32
    }

    /// Position of the current step within its measure (`step % steps_per_measure`).
    pub fn current_step_in_measure(&self, store: &PatternStore) -> i32 {
        self.step % store.steps_per_measure(self.pattern) as i32
    }

    /// The current step as a store address, or `None` before the first clock
    /// or when the step lies beyond the current pattern (e.g. right after
    /// switching to a shorter pattern).
    pub fn position(&self, store: &PatternStore) -> Option<StepPosition> {
        let (measure, step_in_measure) = store.locate(self.pattern, self.step)?;
        Some(StepPosition {
            pattern: self.pattern,
            measure,
            step_in_measure,
        })
    }

    /// Whether the current step is the last of the pattern.
    pub fn is_last_step_of_pattern(&self, store: &PatternStore) -> bool {
        self.step == store.steps_in_pattern(self.pattern) as i32 - 1
    }

    /// Whether the sequencer is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether incoming notes are being recorded.
    pub fn is_recording(&self) -> bool {
        self.recording
    }
}
