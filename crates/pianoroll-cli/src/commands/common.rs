//! Shared helpers for the patch-editing commands.

use anyhow::{Context, bail};
use pianoroll_config::PatchFile;
use pianoroll_core::{Module, NUM_PATTERNS, PatternStore, PianoRoll, parse_note};
use std::path::Path;

/// Slug of the model the editing commands operate on.
pub const PIANO_ROLL: &str = "piano-roll";

/// A Piano Roll patch loaded for editing.
pub struct LoadedPatch {
    pub patch: PatchFile,
    pub module: PianoRoll,
}

impl LoadedPatch {
    /// Load `path`, which must hold a Piano Roll patch.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let patch = PatchFile::load(path)
            .with_context(|| format!("failed to open patch {}", path.display()))?;
        if patch.model != PIANO_ROLL {
            bail!(
                "{} holds a '{}' module; this command needs a '{PIANO_ROLL}' patch",
                path.display(),
                patch.model
            );
        }

        let mut module = PianoRoll::new();
        module.data_from_json(&patch.data);
        tracing::debug!(path = %path.display(), "loaded patch");
        Ok(Self { patch, module })
    }

    /// Write the module state back to `path`.
    pub fn save(mut self, path: &Path) -> anyhow::Result<()> {
        self.patch.update_from(&self.module);
        self.patch
            .save(path)
            .with_context(|| format!("failed to save patch {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved patch");
        Ok(())
    }
}

/// Reject pattern indices outside the store.
pub fn check_pattern(pattern: usize) -> anyhow::Result<usize> {
    if pattern >= NUM_PATTERNS {
        bail!("pattern {pattern} out of range (0-{})", NUM_PATTERNS - 1);
    }
    Ok(pattern)
}

/// Resolve an absolute step index to `(measure, step_in_measure)`.
pub fn locate_step(
    store: &PatternStore,
    pattern: usize,
    step: usize,
) -> anyhow::Result<(usize, usize)> {
    i32::try_from(step)
        .ok()
        .and_then(|s| store.locate(pattern, s))
        .with_context(|| {
            format!(
                "step {step} out of range: pattern {pattern} has {} steps",
                store.steps_in_pattern(pattern)
            )
        })
}

/// Parse a pitch given as a note name (`C4`, `F#3`) or a semitone index.
pub fn parse_pitch(text: &str) -> anyhow::Result<i32> {
    if let Ok(index) = text.trim().parse::<i32>() {
        return Ok(index);
    }
    parse_note(text).with_context(|| format!("invalid pitch '{text}': expected e.g. C4, F#3 or 48"))
}

/// `yes` / `no`.
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
