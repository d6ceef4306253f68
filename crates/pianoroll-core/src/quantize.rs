//! 1 V/oct pitch quantization.
//!
//! Pitches are stored as semitone indices where index 48 is 0 V (C4). The same
//! convention addresses patterns from a CV input: the pattern-select voltage is
//! quantized and offset by [`C4_INDEX`], so 0 V selects pattern 0 and each
//! semitone above selects the next pattern.

use libm::{floorf, roundf};

/// Semitone index of 0 V.
pub const C4_INDEX: i32 = 48;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Quantize a 1 V/oct voltage to a semitone index.
///
/// The index is `(octave + 4) * 12 + semitone`. `octave` is the whole volt
/// below the voltage (`floor`) and `semitone` the rounded semitone count taken
/// modulo 12, mirrored for negative voltages. The octave is not carried when
/// rounding reaches the next volt, so inputs within a quarter-tone below a whole
/// volt fold back to the bottom of their own octave (`0.99 V` is index 48).
///
/// # Example
///
/// ```rust
/// use pianoroll_core::quantize_pitch;
///
/// assert_eq!(quantize_pitch(0.0), 48);
/// assert_eq!(quantize_pitch(1.0 / 12.0), 49);
/// assert_eq!(quantize_pitch(-1.0), 36);
/// ```
pub fn quantize_pitch(voct: f32) -> i32 {
    let octave = floorf(voct) as i32;
    let mut note = (roundf(voct * 12.0) as i32).abs() % 12;
    if voct < 0.0 && note > 0 {
        note = 12 - note;
    }
    (octave + 4) * 12 + note
}

/// Convert a semitone index back to a 1 V/oct voltage.
///
/// Inverse of [`quantize_pitch`] for every index it produces.
pub fn pitch_to_voltage(index: i32) -> f32 {
    let octave = index.div_euclid(12) - 4;
    let semitone = index.rem_euclid(12);
    octave as f32 + semitone as f32 / 12.0
}

/// Human-readable note name, e.g. `48` → `"C4"`, `61` → `"C#5"`.
pub fn note_name(index: i32) -> String {
    let octave = index.div_euclid(12);
    let semitone = index.rem_euclid(12) as usize;
    format!("{}{}", NOTE_NAMES[semitone], octave)
}

/// Parse a note name such as `C4`, `f#3` or `Bb2` into a semitone index.
///
/// Returns `None` for anything that is not a letter, an optional `#`/`b`
/// accidental and a non-negative octave number.
pub fn parse_note(name: &str) -> Option<i32> {
    let mut chars = name.trim().chars();
    let base = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (accidental, octave) = if let Some(octave) = rest.strip_prefix('#') {
        (1, octave)
    } else if let Some(octave) = rest.strip_prefix('b') {
        (-1, octave)
    } else {
        (0, rest)
    };

    let octave: i32 = octave.parse().ok()?;
    if octave < 0 {
        return None;
    }
    Some(octave * 12 + base + accidental)
}
