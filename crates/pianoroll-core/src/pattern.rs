//! Pattern store: the sequencer's note data.
//!
//! There are always exactly [`NUM_PATTERNS`] patterns. Each pattern is a list
//! of measures, each measure a list of steps. The step count per measure is
//! `beats_per_measure * divisions_per_beat` and may differ between patterns.
//!
//! Addresses are `(pattern, measure, step_in_measure)` triples. Callers derive
//! them from the transport or from [`PatternStore::locate`]; an address outside
//! the pattern's geometry is a programming error and panics.
//!
//! ## Persistence
//!
//! [`PatternStore::data_to_json`] writes one object per pattern:
//!
//! ```json
//! {
//!   "numberOfMeasures": 1,
//!   "beatsPerMeasure": 4,
//!   "divisionsPerBeat": 4,
//!   "measures": [{ "steps": [{ "pitch": 48, "velocity": 0.8, "retrigger": false, "active": true }] }]
//! }
//! ```
//!
//! [`PatternStore::data_from_json`] applies whatever fields are present and
//! leaves the rest alone.

use serde_json::{Value, json};

use crate::quantize::C4_INDEX;

/// Number of patterns in every store.
pub const NUM_PATTERNS: usize = 64;
/// Upper bound for measures per pattern.
pub const MAX_MEASURES: usize = 16;
/// Upper bound for beats per measure.
pub const MAX_BEATS_PER_MEASURE: usize = 16;
/// Upper bound for divisions per beat.
pub const MAX_DIVISIONS_PER_BEAT: usize = 16;

const DEFAULT_MEASURES: usize = 1;
const DEFAULT_BEATS_PER_MEASURE: usize = 4;
const DEFAULT_DIVISIONS_PER_BEAT: usize = 4;

/// One sequencer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Semitone index (48 = 0 V).
    pub pitch: i32,
    /// Velocity in `[0, 1]`.
    pub velocity: f32,
    /// Force a retrigger pulse even when the gate is already high.
    pub retrigger: bool,
    /// Whether the step plays at all.
    pub active: bool,
}

impl Default for Step {
    fn default() -> Self {
        Self {
            pitch: C4_INDEX,
            velocity: 0.0,
            retrigger: false,
            active: false,
        }
    }
}

impl Step {
    fn to_json(self) -> Value {
        json!({
            "pitch": self.pitch,
            "velocity": self.velocity,
            "retrigger": self.retrigger,
            "active": self.active,
        })
    }

    fn apply_json(&mut self, value: &Value) {
        if let Some(pitch) = value
            .get("pitch")
            .and_then(Value::as_i64)
            .and_then(|p| i32::try_from(p).ok())
        {
            self.pitch = pitch;
        }
        if let Some(velocity) = value.get("velocity").and_then(Value::as_f64) {
            self.velocity = (velocity as f32).clamp(0.0, 1.0);
        }
        if let Some(retrigger) = value.get("retrigger").and_then(Value::as_bool) {
            self.retrigger = retrigger;
        }
        if let Some(active) = value.get("active").and_then(Value::as_bool) {
            self.active = active;
        }
    }
}

/// An ordered run of steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    steps: Vec<Step>,
}

impl Measure {
    fn new(steps: usize) -> Self {
        Self {
            steps: vec![Step::default(); steps],
        }
    }

    /// Steps in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// An ordered run of measures with shared geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    measures: Vec<Measure>,
    beats_per_measure: usize,
    divisions_per_beat: usize,
}

impl Default for Pattern {
    fn default() -> Self {
        let steps = DEFAULT_BEATS_PER_MEASURE * DEFAULT_DIVISIONS_PER_BEAT;
        Self {
            measures: vec![Measure::new(steps); DEFAULT_MEASURES],
            beats_per_measure: DEFAULT_BEATS_PER_MEASURE,
            divisions_per_beat: DEFAULT_DIVISIONS_PER_BEAT,
        }
    }
}

impl Pattern {
    /// Measures in order.
    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    /// Beats per measure.
    pub fn beats_per_measure(&self) -> usize {
        self.beats_per_measure
    }

    /// Steps per beat.
    pub fn divisions_per_beat(&self) -> usize {
        self.divisions_per_beat
    }

    /// Steps in each measure.
    pub fn steps_per_measure(&self) -> usize {
        self.beats_per_measure * self.divisions_per_beat
    }

    /// Steps across all measures.
    pub fn steps_in_pattern(&self) -> usize {
        self.measures.len() * self.steps_per_measure()
    }

    /// Whether no step is active.
    pub fn is_empty(&self) -> bool {
        self.measures
            .iter()
            .all(|m| m.steps.iter().all(|s| !s.active))
    }

    /// Iterate `(absolute_step, step)` pairs.
    pub fn iter_steps(&self) -> impl Iterator<Item = (usize, &Step)> {
        self.measures.iter().flat_map(|m| m.steps.iter()).enumerate()
    }

    fn set_measures(&mut self, measures: usize) {
        let steps = self.steps_per_measure();
        self.measures
            .resize(measures.clamp(1, MAX_MEASURES), Measure::new(steps));
    }

    fn set_geometry(&mut self, beats_per_measure: usize, divisions_per_beat: usize) {
        self.beats_per_measure = beats_per_measure.clamp(1, MAX_BEATS_PER_MEASURE);
        self.divisions_per_beat = divisions_per_beat.clamp(1, MAX_DIVISIONS_PER_BEAT);
        let steps = self.steps_per_measure();
        for measure in &mut self.measures {
            measure.steps.resize(steps, Step::default());
        }
    }

    fn to_json(&self) -> Value {
        let measures: Vec<Value> = self
            .measures
            .iter()
            .map(|m| {
                let steps: Vec<Value> = m.steps.iter().map(|s| s.to_json()).collect();
                json!({ "steps": steps })
            })
            .collect();

        json!({
            "numberOfMeasures": self.measures.len(),
            "beatsPerMeasure": self.beats_per_measure,
            "divisionsPerBeat": self.divisions_per_beat,
            "measures": measures,
        })
    }

    fn apply_json(&mut self, value: &Value) {
        let as_count = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok())
        };

        if let Some(measures) = as_count("numberOfMeasures") {
            self.set_measures(measures);
        }
        let beats = as_count("beatsPerMeasure").unwrap_or(self.beats_per_measure);
        let divisions = as_count("divisionsPerBeat").unwrap_or(self.divisions_per_beat);
        self.set_geometry(beats, divisions);

        let Some(measures) = value.get("measures").and_then(Value::as_array) else {
            return;
        };
        for (measure, measure_json) in self.measures.iter_mut().zip(measures) {
            let Some(steps) = measure_json.get("steps").and_then(Value::as_array) else {
                continue;
            };
            for (step, step_json) in measure.steps.iter_mut().zip(steps) {
                step.apply_json(step_json);
            }
        }
    }
}

/// All pattern data of one sequencer instance.
///
/// # Example
///
/// ```rust
/// use pianoroll_core::PatternStore;
///
/// let mut store = PatternStore::new();
/// store.set_step_active(0, 0, 3, true);
/// store.set_step_pitch(0, 0, 3, 60);
/// assert!(store.is_step_active(0, 0, 3));
/// assert_eq!(store.steps_per_measure(0), 16);
/// ```
#[derive(Debug, Clone)]
pub struct PatternStore {
    patterns: Vec<Pattern>,
    module_id: i64,
    pattern_clipboard: Option<Pattern>,
    measure_clipboard: Option<Measure>,
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternStore {
    /// Create a store of [`NUM_PATTERNS`] empty default patterns.
    pub fn new() -> Self {
        Self {
            patterns: vec![Pattern::default(); NUM_PATTERNS],
            module_id: -1,
            pattern_clipboard: None,
            measure_clipboard: None,
        }
    }

    /// Host instance id (`-1` until attached).
    pub fn module_id(&self) -> i64 {
        self.module_id
    }

    /// Record the host instance id.
    pub fn set_module_id(&mut self, module_id: i64) {
        self.module_id = module_id;
    }

    /// All patterns, indexed by pattern number.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// One pattern. Panics if `pattern >= NUM_PATTERNS`.
    pub fn pattern(&self, pattern: usize) -> &Pattern {
        &self.patterns[pattern]
    }

    /// Restore every pattern to default geometry with all steps inactive.
    pub fn reset(&mut self) {
        for pattern in &mut self.patterns {
            *pattern = Pattern::default();
        }
    }

    // --- geometry -------------------------------------------------------

    /// Steps in each measure of `pattern`.
    pub fn steps_per_measure(&self, pattern: usize) -> usize {
        self.patterns[pattern].steps_per_measure()
    }

    /// Steps across all measures of `pattern`.
    pub fn steps_in_pattern(&self, pattern: usize) -> usize {
        self.patterns[pattern].steps_in_pattern()
    }

    /// Number of measures in `pattern`.
    pub fn measures(&self, pattern: usize) -> usize {
        self.patterns[pattern].measures.len()
    }

    /// Beats per measure of `pattern`.
    pub fn beats_per_measure(&self, pattern: usize) -> usize {
        self.patterns[pattern].beats_per_measure
    }

    /// Divisions per beat of `pattern`.
    pub fn divisions_per_beat(&self, pattern: usize) -> usize {
        self.patterns[pattern].divisions_per_beat
    }

    /// Resize `pattern` to `measures` measures (clamped to `1..=MAX_MEASURES`).
    pub fn set_measures(&mut self, pattern: usize, measures: usize) {
        self.patterns[pattern].set_measures(measures);
    }

    /// Change beats per measure (clamped to `1..=MAX_BEATS_PER_MEASURE`).
    pub fn set_beats_per_measure(&mut self, pattern: usize, beats: usize) {
        let p = &mut self.patterns[pattern];
        let divisions = p.divisions_per_beat;
        p.set_geometry(beats, divisions);
    }

    /// Change divisions per beat (clamped to `1..=MAX_DIVISIONS_PER_BEAT`).
    pub fn set_divisions_per_beat(&mut self, pattern: usize, divisions: usize) {
        let p = &mut self.patterns[pattern];
        let beats = p.beats_per_measure;
        p.set_geometry(beats, divisions);
    }

    /// Map an absolute step index to `(measure, step_in_measure)`.
    ///
    /// Returns `None` for negative indices and indices past the pattern's end.
    pub fn locate(&self, pattern: usize, step_in_pattern: i32) -> Option<(usize, usize)> {
        let step = usize::try_from(step_in_pattern).ok()?;
        let p = self.patterns.get(pattern)?;
        if step >= p.steps_in_pattern() {
            return None;
        }
        let per_measure = p.steps_per_measure();
        Some((step / per_measure, step % per_measure))
    }

    // --- step access ----------------------------------------------------

    /// One step. Panics on an address outside the pattern's geometry.
    pub fn step(&self, pattern: usize, measure: usize, step: usize) -> &Step {
        &self.patterns[pattern].measures[measure].steps[step]
    }

    fn step_mut(&mut self, pattern: usize, measure: usize, step: usize) -> &mut Step {
        &mut self.patterns[pattern].measures[measure].steps[step]
    }

    /// Whether the step plays.
    pub fn is_step_active(&self, pattern: usize, measure: usize, step: usize) -> bool {
        self.step(pattern, measure, step).active
    }

    /// Whether the step forces a retrigger.
    pub fn is_step_retriggered(&self, pattern: usize, measure: usize, step: usize) -> bool {
        self.step(pattern, measure, step).retrigger
    }

    /// Semitone index of the step.
    pub fn step_pitch(&self, pattern: usize, measure: usize, step: usize) -> i32 {
        self.step(pattern, measure, step).pitch
    }

    /// Velocity of the step in `[0, 1]`.
    pub fn step_velocity(&self, pattern: usize, measure: usize, step: usize) -> f32 {
        self.step(pattern, measure, step).velocity
    }

    /// Set whether the step plays.
    pub fn set_step_active(&mut self, pattern: usize, measure: usize, step: usize, active: bool) {
        self.step_mut(pattern, measure, step).active = active;
    }

    /// Set whether the step forces a retrigger.
    pub fn set_step_retrigger(
        &mut self,
        pattern: usize,
        measure: usize,
        step: usize,
        retrigger: bool,
    ) {
        self.step_mut(pattern, measure, step).retrigger = retrigger;
    }

    /// Set the step's semitone index.
    pub fn set_step_pitch(&mut self, pattern: usize, measure: usize, step: usize, pitch: i32) {
        self.step_mut(pattern, measure, step).pitch = pitch;
    }

    /// Set the step's velocity.
    pub fn set_step_velocity(
        &mut self,
        pattern: usize,
        measure: usize,
        step: usize,
        velocity: f32,
    ) {
        self.step_mut(pattern, measure, step).velocity = velocity;
    }

    /// Raise the step's velocity to `velocity` if that is higher.
    pub fn increase_step_velocity_to(
        &mut self,
        pattern: usize,
        measure: usize,
        step: usize,
        velocity: f32,
    ) {
        let s = self.step_mut(pattern, measure, step);
        s.velocity = s.velocity.max(velocity);
    }

    /// Add `delta` to the step's velocity, clamped to `[0, 1]`.
    pub fn adjust_step_velocity(&mut self, pattern: usize, measure: usize, step: usize, delta: f32) {
        let s = self.step_mut(pattern, measure, step);
        s.velocity = (s.velocity + delta).clamp(0.0, 1.0);
    }

    /// Flip the step's active flag.
    pub fn toggle_step_active(&mut self, pattern: usize, measure: usize, step: usize) {
        let s = self.step_mut(pattern, measure, step);
        s.active = !s.active;
    }

    /// Flip the step's retrigger flag.
    pub fn toggle_step_retrigger(&mut self, pattern: usize, measure: usize, step: usize) {
        let s = self.step_mut(pattern, measure, step);
        s.retrigger = !s.retrigger;
    }

    /// Whether no step of `pattern` is active.
    pub fn is_pattern_empty(&self, pattern: usize) -> bool {
        self.patterns[pattern].is_empty()
    }

    /// Reset every step of `pattern` to default, keeping its geometry.
    pub fn clear_pattern_steps(&mut self, pattern: usize) {
        for measure in &mut self.patterns[pattern].measures {
            measure.steps.fill(Step::default());
        }
    }

    // --- clipboard ------------------------------------------------------

    /// Copy `pattern` (geometry and steps) to the clipboard.
    pub fn copy_pattern(&mut self, pattern: usize) {
        self.pattern_clipboard = Some(self.patterns[pattern].clone());
    }

    /// Replace `pattern` with the clipboard. Returns `false` if nothing was copied.
    pub fn paste_pattern(&mut self, pattern: usize) -> bool {
        match &self.pattern_clipboard {
            Some(copied) => {
                self.patterns[pattern] = copied.clone();
                true
            }
            None => false,
        }
    }

    /// Copy one measure to the clipboard.
    pub fn copy_measure(&mut self, pattern: usize, measure: usize) {
        self.measure_clipboard = Some(self.patterns[pattern].measures[measure].clone());
    }

    /// Replace one measure with the clipboard, truncating or padding it to the
    /// target's steps per measure. Returns `false` if nothing was copied.
    pub fn paste_measure(&mut self, pattern: usize, measure: usize) -> bool {
        let Some(copied) = &self.measure_clipboard else {
            return false;
        };
        let steps = self.patterns[pattern].steps_per_measure();
        let mut pasted = copied.clone();
        pasted.steps.resize(steps, Step::default());
        self.patterns[pattern].measures[measure] = pasted;
        true
    }

    // --- persistence ----------------------------------------------------

    /// Serialize every pattern.
    pub fn data_to_json(&self) -> Value {
        Value::Array(self.patterns.iter().map(Pattern::to_json).collect())
    }

    /// Apply serialized patterns. Entries beyond [`NUM_PATTERNS`] are ignored;
    /// patterns without an entry keep their current contents.
    pub fn data_from_json(&mut self, value: &Value) {
        let Some(patterns) = value.as_array() else {
            return;
        };
        for (pattern, pattern_json) in self.patterns.iter_mut().zip(patterns) {
            pattern.apply_json(pattern_json);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            module_id = self.module_id,
            "pattern store: loaded {} patterns",
            patterns.len().min(NUM_PATTERNS)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_has_sixty_four_default_patterns() {
        let store = PatternStore::new();
        assert_eq!(store.patterns().len(), NUM_PATTERNS);
        for p in 0..NUM_PATTERNS {
            assert_eq!(store.measures(p), 1);
            assert_eq!(store.steps_per_measure(p), 16);
            assert!(store.is_pattern_empty(p));
        }
    }

    #[test]
    fn step_setters_and_getters() {
        let mut store = PatternStore::new();
        store.set_step_active(5, 0, 7, true);
        store.set_step_retrigger(5, 0, 7, true);
        store.set_step_pitch(5, 0, 7, 62);
        store.set_step_velocity(5, 0, 7, 0.25);

        assert!(store.is_step_active(5, 0, 7));
        assert!(store.is_step_retriggered(5, 0, 7));
        assert_eq!(store.step_pitch(5, 0, 7), 62);
        assert_eq!(store.step_velocity(5, 0, 7), 0.25);
        assert!(!store.is_step_active(5, 0, 6));
        assert!(!store.is_pattern_empty(5));
    }

    #[test]
    fn increase_velocity_never_lowers() {
        let mut store = PatternStore::new();
        store.increase_step_velocity_to(0, 0, 0, 0.6);
        store.increase_step_velocity_to(0, 0, 0, 0.2);
        assert_eq!(store.step_velocity(0, 0, 0), 0.6);
        store.increase_step_velocity_to(0, 0, 0, 0.9);
        assert_eq!(store.step_velocity(0, 0, 0), 0.9);
    }

    #[test]
    fn adjust_velocity_clamps() {
        let mut store = PatternStore::new();
        store.adjust_step_velocity(0, 0, 0, 1.5);
        assert_eq!(store.step_velocity(0, 0, 0), 1.0);
        store.adjust_step_velocity(0, 0, 0, -3.0);
        assert_eq!(store.step_velocity(0, 0, 0), 0.0);
    }

    #[test]
    fn toggles_flip_flags() {
        let mut store = PatternStore::new();
        store.toggle_step_active(1, 0, 2);
        store.toggle_step_retrigger(1, 0, 2);
        assert!(store.is_step_active(1, 0, 2));
        assert!(store.is_step_retriggered(1, 0, 2));
        store.toggle_step_active(1, 0, 2);
        assert!(!store.is_step_active(1, 0, 2));
    }

    #[test]
    fn geometry_changes_preserve_fitting_steps() {
        let mut store = PatternStore::new();
        store.set_step_active(0, 0, 3, true);
        store.set_step_active(0, 0, 12, true);

        store.set_divisions_per_beat(0, 2);
        assert_eq!(store.steps_per_measure(0), 8);
        assert!(store.is_step_active(0, 0, 3));

        store.set_divisions_per_beat(0, 4);
        assert_eq!(store.steps_per_measure(0), 16);
        // Truncated steps come back as defaults.
        assert!(!store.is_step_active(0, 0, 12));

        store.set_measures(0, 3);
        assert_eq!(store.steps_in_pattern(0), 48);
        assert!(store.is_step_active(0, 0, 3));
        assert!(!store.is_step_active(0, 2, 3));
    }

    #[test]
    fn geometry_is_clamped() {
        let mut store = PatternStore::new();
        store.set_measures(0, 0);
        assert_eq!(store.measures(0), 1);
        store.set_measures(0, 1000);
        assert_eq!(store.measures(0), MAX_MEASURES);
        store.set_beats_per_measure(0, 0);
        assert_eq!(store.beats_per_measure(0), 1);
        store.set_divisions_per_beat(0, 99);
        assert_eq!(store.divisions_per_beat(0), MAX_DIVISIONS_PER_BEAT);
    }

    #[test]
    fn locate_maps_absolute_steps() {
        let mut store = PatternStore::new();
        store.set_measures(2, 2);
        assert_eq!(store.locate(2, 0), Some((0, 0)));
        assert_eq!(store.locate(2, 17), Some((1, 1)));
        assert_eq!(store.locate(2, 31), Some((1, 15)));
        assert_eq!(store.locate(2, 32), None);
        assert_eq!(store.locate(2, -1), None);
        assert_eq!(store.locate(NUM_PATTERNS, 0), None);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = PatternStore::new();
        store.set_measures(4, 4);
        store.set_step_active(4, 3, 0, true);
        store.reset();
        assert_eq!(store.measures(4), 1);
        assert!(store.is_pattern_empty(4));
    }

    #[test]
    fn clear_pattern_keeps_geometry() {
        let mut store = PatternStore::new();
        store.set_beats_per_measure(3, 3);
        store.set_step_active(3, 0, 1, true);
        store.clear_pattern_steps(3);
        assert!(store.is_pattern_empty(3));
        assert_eq!(store.steps_per_measure(3), 12);
    }

    #[test]
    fn copy_paste_pattern() {
        let mut store = PatternStore::new();
        assert!(!store.paste_pattern(1));

        store.set_measures(0, 2);
        store.set_step_active(0, 1, 5, true);
        store.copy_pattern(0);
        assert!(store.paste_pattern(9));
        assert_eq!(store.pattern(9), store.pattern(0));
    }

    #[test]
    fn paste_measure_fits_target_geometry() {
        let mut store = PatternStore::new();
        assert!(!store.paste_measure(0, 0));

        store.set_step_active(0, 0, 1, true);
        store.set_step_active(0, 0, 15, true);
        store.copy_measure(0, 0);

        store.set_divisions_per_beat(1, 2);
        assert!(store.paste_measure(1, 0));
        assert_eq!(store.pattern(1).measures()[0].steps().len(), 8);
        assert!(store.is_step_active(1, 0, 1));
    }

    #[test]
    fn json_round_trip() {
        let mut store = PatternStore::new();
        store.set_measures(7, 2);
        store.set_beats_per_measure(7, 3);
        store.set_step_active(7, 1, 11, true);
        store.set_step_retrigger(7, 1, 11, true);
        store.set_step_pitch(7, 1, 11, 71);
        store.set_step_velocity(7, 1, 11, 0.37);

        let json = store.data_to_json();
        let mut loaded = PatternStore::new();
        loaded.data_from_json(&json);
        assert_eq!(loaded.patterns(), store.patterns());
    }

    #[test]
    fn missing_fields_leave_prior_state() {
        let mut store = PatternStore::new();
        store.set_step_active(0, 0, 0, true);
        store.set_step_pitch(0, 0, 0, 55);
        store.set_step_velocity(0, 0, 0, 0.5);

        let partial = json!([
            { "measures": [{ "steps": [{ "velocity": 0.9 }] }] }
        ]);
        store.data_from_json(&partial);

        assert!(store.is_step_active(0, 0, 0));
        assert_eq!(store.step_pitch(0, 0, 0), 55);
        assert_eq!(store.step_velocity(0, 0, 0), 0.9);
        assert_eq!(store.steps_per_measure(0), 16);
    }

    #[test]
    fn malformed_json_is_ignored() {
        let mut store = PatternStore::new();
        store.set_step_active(0, 0, 0, true);
        store.data_from_json(&json!("not an array"));
        store.data_from_json(&json!([{ "beatsPerMeasure": "four", "measures": 3 }]));
        assert!(store.is_step_active(0, 0, 0));
        assert_eq!(store.beats_per_measure(0), 4);
    }
}
