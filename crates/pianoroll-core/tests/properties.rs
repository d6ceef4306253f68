//! Property-based tests for pitch quantization, transport and pattern storage.

use pianoroll_core::{
    Module, NUM_PATTERNS, PatternStore, PianoRoll, Transport, note_name, parse_note,
    pitch_to_voltage, quantize_pitch,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every stored semitone index survives conversion to voltage and back.
    #[test]
    fn quantizer_inverts_pitch_to_voltage(index in 0i32..768) {
        prop_assert_eq!(quantize_pitch(pitch_to_voltage(index)), index);
    }

    /// Within one octave band, a rising voltage never quantizes to a lower
    /// index. The top quarter-tone of each band folds back to its first
    /// semitone, so the offsets stay below it.
    #[test]
    fn quantizer_is_monotonic_within_an_octave(
        octave in -5i32..10,
        a in 0.0f32..0.95,
        b in 0.0f32..0.95,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let base = octave as f32;
        prop_assert!(quantize_pitch(base + lo) <= quantize_pitch(base + hi));
    }

    /// Below the top quarter-tone of a band, the quantized pitch is the
    /// nearest semitone.
    #[test]
    fn quantizer_error_is_at_most_a_quarter_tone(octave in -5i32..10, offset in 0.0f32..0.95) {
        let voct = octave as f32 + offset;
        let error = (pitch_to_voltage(quantize_pitch(voct)) - voct).abs();
        prop_assert!(error <= 0.5 / 12.0 + 1e-4, "voct {} error {}", voct, error);
    }

    /// Note names parse back to the same index.
    #[test]
    fn note_names_round_trip(index in 0i32..768) {
        prop_assert_eq!(parse_note(&note_name(index)), Some(index));
    }

    /// The step index stays within [0, steps_in_pattern) and cycles with the
    /// pattern length, whatever the geometry.
    #[test]
    fn advance_wraps_within_pattern(
        measures in 1usize..=16,
        beats in 1usize..=16,
        divisions in 1usize..=16,
        clocks in 1usize..600,
    ) {
        let mut store = PatternStore::new();
        store.set_measures(0, measures);
        store.set_beats_per_measure(0, beats);
        store.set_divisions_per_beat(0, divisions);
        let total = store.steps_in_pattern(0);

        let mut transport = Transport::new();
        for _ in 0..clocks {
            transport.advance_step(&store);
            let step = transport.current_step_in_pattern();
            prop_assert!(step >= 0 && (step as usize) < total);
            prop_assert!(transport.position(&store).is_some());
        }
        prop_assert_eq!(
            transport.current_step_in_pattern() as usize,
            (clocks - 1) % total
        );
    }

    /// Geometry setters clamp to 1..=16 and keep every measure the same length.
    #[test]
    fn geometry_is_clamped_and_consistent(
        pattern in 0usize..NUM_PATTERNS,
        measures in 0usize..40,
        beats in 0usize..40,
        divisions in 0usize..40,
    ) {
        let mut store = PatternStore::new();
        store.set_measures(pattern, measures);
        store.set_beats_per_measure(pattern, beats);
        store.set_divisions_per_beat(pattern, divisions);

        prop_assert_eq!(store.measures(pattern), measures.clamp(1, 16));
        prop_assert_eq!(store.beats_per_measure(pattern), beats.clamp(1, 16));
        prop_assert_eq!(store.divisions_per_beat(pattern), divisions.clamp(1, 16));

        let spm = store.steps_per_measure(pattern);
        for measure in store.pattern(pattern).measures() {
            prop_assert_eq!(measure.steps().len(), spm);
        }
    }

    /// Saved state restores the same steps in any pattern.
    #[test]
    fn saved_steps_restore(
        pattern in 0usize..NUM_PATTERNS,
        step in 0usize..16,
        pitch in 0i32..120,
        velocity in 0.0f32..=1.0,
        retrigger in any::<bool>(),
    ) {
        let mut module = PianoRoll::new();
        let store = module.patterns_mut();
        store.set_step_active(pattern, 0, step, true);
        store.set_step_pitch(pattern, 0, step, pitch);
        store.set_step_velocity(pattern, 0, step, velocity);
        store.set_step_retrigger(pattern, 0, step, retrigger);

        let mut restored = PianoRoll::new();
        restored.data_from_json(&module.data_to_json());
        prop_assert_eq!(
            restored.patterns().step(pattern, 0, step),
            module.patterns().step(pattern, 0, step)
        );
    }
}
