//! Change a pattern's measures, beats per measure or divisions per beat.

use clap::Args;
use pianoroll_core::{MAX_BEATS_PER_MEASURE, MAX_DIVISIONS_PER_BEAT, MAX_MEASURES};
use std::path::PathBuf;

use super::common::{LoadedPatch, check_pattern};

#[derive(Args)]
pub struct GeometryArgs {
    /// Patch file
    file: PathBuf,

    /// Pattern index (0-63)
    #[arg(long, short)]
    pattern: usize,

    /// Number of measures (1-16)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_MEASURES as i64))]
    measures: Option<u8>,

    /// Beats per measure (1-16)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_BEATS_PER_MEASURE as i64))]
    beats: Option<u8>,

    /// Divisions per beat (1-16)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_DIVISIONS_PER_BEAT as i64))]
    divisions: Option<u8>,
}

pub fn run(args: GeometryArgs) -> anyhow::Result<()> {
    let mut loaded = LoadedPatch::load(&args.file)?;
    let pattern = check_pattern(args.pattern)?;
    let store = loaded.module.patterns_mut();

    if let Some(measures) = args.measures {
        store.set_measures(pattern, usize::from(measures));
    }
    if let Some(beats) = args.beats {
        store.set_beats_per_measure(pattern, usize::from(beats));
    }
    if let Some(divisions) = args.divisions {
        store.set_divisions_per_beat(pattern, usize::from(divisions));
    }

    println!(
        "Pattern {pattern}: {} measures x {} beats x {} divisions = {} steps",
        store.measures(pattern),
        store.beats_per_measure(pattern),
        store.divisions_per_beat(pattern),
        store.steps_in_pattern(pattern)
    );

    loaded.save(&args.file)
}
