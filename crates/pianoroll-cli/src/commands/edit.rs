//! Edit one step of a pattern.

use anyhow::bail;
use clap::Args;
use pianoroll_core::note_name;
use std::path::PathBuf;

use super::common::{LoadedPatch, check_pattern, locate_step, parse_pitch, yes_no};

#[derive(Args)]
pub struct EditArgs {
    /// Patch file
    file: PathBuf,

    /// Pattern index (0-63)
    #[arg(long, short)]
    pattern: usize,

    /// Absolute step index within the pattern
    #[arg(long, short)]
    step: usize,

    /// Pitch as a note name (C4, F#3, Bb2) or semitone index (48 = C4)
    #[arg(long)]
    pitch: Option<String>,

    /// Velocity (0.0-1.0)
    #[arg(long)]
    velocity: Option<f32>,

    /// Whether the step plays
    #[arg(long)]
    active: Option<bool>,

    /// Whether the step forces a retrigger
    #[arg(long)]
    retrigger: Option<bool>,
}

pub fn run(args: EditArgs) -> anyhow::Result<()> {
    let mut loaded = LoadedPatch::load(&args.file)?;
    let pattern = check_pattern(args.pattern)?;
    let store = loaded.module.patterns_mut();
    let (measure, step) = locate_step(store, pattern, args.step)?;

    if let Some(velocity) = args.velocity
        && !(0.0..=1.0).contains(&velocity)
    {
        bail!("velocity {velocity} out of range (0.0-1.0)");
    }
    let pitch = args.pitch.as_deref().map(parse_pitch).transpose()?;

    if let Some(pitch) = pitch {
        store.set_step_pitch(pattern, measure, step, pitch);
    }
    if let Some(velocity) = args.velocity {
        store.set_step_velocity(pattern, measure, step, velocity);
    }
    if let Some(active) = args.active {
        store.set_step_active(pattern, measure, step, active);
    }
    if let Some(retrigger) = args.retrigger {
        store.set_step_retrigger(pattern, measure, step, retrigger);
    }

    let edited = *store.step(pattern, measure, step);
    println!(
        "Pattern {pattern} step {}: {} vel {:.2} active {} retrigger {}",
        args.step,
        note_name(edited.pitch),
        edited.velocity,
        yes_no(edited.active),
        yes_no(edited.retrigger)
    );

    loaded.save(&args.file)
}
