//! Piano Roll Core - clocked step sequencer for modular synthesizer hosts
//!
//! This crate implements a piano-roll style sequencer module: 64 patterns of
//! pitched steps, played back or recorded against an external clock, with
//! gate, retrigger, velocity and pitch outputs plus chaining outputs for
//! driving further sequencers.
//!
//! # Core Abstractions
//!
//! ## Host Interface
//!
//! - [`Module`] - Object-safe trait every attachable component implements
//! - [`Ports`] - Input and output jacks of one module instance
//! - [`ProcessArgs`] - Per-call sample rate and tick duration
//!
//! ## Sequencer
//!
//! - [`PianoRoll`] - The sequencer module
//! - [`PatternStore`] - 64 patterns with per-pattern geometry and clipboards
//! - [`Transport`] - Playback position and run/record flags
//! - [`Auditioner`] - Single-step preview requested by an editor
//!
//! ## Signal Primitives
//!
//! - [`SchmittTrigger`], [`PulseGenerator`], [`ClockDivider`], [`BoolEdge`]
//! - [`ClockDelayLine`] - Delays the clock by whole processing invocations
//!
//! ## Pitch
//!
//! - [`quantize_pitch`] / [`pitch_to_voltage`] - 1 V/oct to semitone index and back
//! - [`note_name`] / [`parse_note`] - Human-readable note names
//!
//! # Example
//!
//! ```rust
//! use pianoroll_core::{Module, PianoRoll, note_name};
//!
//! let mut module = PianoRoll::new();
//! module.patterns_mut().set_step_active(0, 0, 0, true);
//! module.patterns_mut().set_step_pitch(0, 0, 0, 52);
//! assert_eq!(note_name(module.patterns().step_pitch(0, 0, 0)), "E4");
//!
//! let saved = module.data_to_json();
//! let mut restored = PianoRoll::new();
//! restored.data_from_json(&saved);
//! assert!(restored.patterns().is_step_active(0, 0, 0));
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations or locks in [`Module::process`]
//! - **Host-owned jacks**: Modules read and write [`Ports`] passed in per call
//! - **Tolerant loading**: Missing or malformed saved fields keep defaults

pub mod auditioner;
pub mod dsp;
pub mod module;
pub mod pattern;
pub mod piano_roll;
pub mod quantize;
pub mod transport;

// Re-export main types at crate root
pub use auditioner::{Auditioner, OneShot};
pub use dsp::{
    BoolEdge, ClockDelayLine, ClockDivider, DelayedClock, MAX_CLOCK_DELAY, PulseGenerator,
    SchmittTrigger, TRIGGER_HIGH, TRIGGER_LOW,
};
pub use module::{InputPort, Module, OutputPort, Ports, ProcessArgs};
pub use pattern::{
    MAX_BEATS_PER_MEASURE, MAX_DIVISIONS_PER_BEAT, MAX_MEASURES, Measure, NUM_PATTERNS, Pattern,
    PatternStore, Step,
};
pub use piano_roll::{
    AUDITION_GATE_DURATION, Input, Output, PLUGGED_GATE_DURATION, PROCESS_DIVISION, PianoRoll,
    TRIGGER_DURATION, UNPLUGGED_GATE_DURATION,
};
pub use quantize::{C4_INDEX, note_name, parse_note, pitch_to_voltage, quantize_pitch};
pub use transport::{STEP_NOT_STARTED, StepPosition, Transport};
