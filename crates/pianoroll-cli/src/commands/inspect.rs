//! Show a patch's transport state and pattern contents.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use pianoroll_core::{NUM_PATTERNS, PatternStore, note_name};
use std::path::PathBuf;

use super::common::{LoadedPatch, check_pattern, yes_no};

#[derive(Args)]
pub struct InspectArgs {
    /// Patch file
    file: PathBuf,

    /// List every step of this pattern
    #[arg(long, short)]
    pattern: Option<usize>,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let LoadedPatch { module, .. } = LoadedPatch::load(&args.file)?;
    let store = module.patterns();
    let transport = module.transport();

    println!("File:            {}", args.file.display());
    println!("Current pattern: {}", transport.current_pattern());
    println!("Current step:    {}", transport.current_step_in_pattern());
    println!("Running:         {}", yes_no(transport.is_running()));
    println!("Clock delay:     {}", module.clock_delay());
    println!();

    match args.pattern {
        Some(pattern) => print_steps(store, check_pattern(pattern)?),
        None => print_summary(store),
    }

    Ok(())
}

fn geometry(store: &PatternStore, pattern: usize) -> String {
    format!(
        "{} x {} x {}",
        store.measures(pattern),
        store.beats_per_measure(pattern),
        store.divisions_per_beat(pattern)
    )
}

fn print_summary(store: &PatternStore) {
    let used: Vec<usize> = (0..NUM_PATTERNS)
        .filter(|&p| !store.is_pattern_empty(p))
        .collect();

    if used.is_empty() {
        println!("All patterns are empty.");
        return;
    }

    println!("  {:7}  {:22}  {}", "Pattern", "Measures x Beats x Div", "Active");
    println!("  {:7}  {:22}  {}", "-------", "----------------------", "------");
    for pattern in used {
        let active = store
            .pattern(pattern)
            .iter_steps()
            .filter(|(_, step)| step.active)
            .count();
        println!(
            "  {:7}  {:22}  {}/{}",
            pattern,
            geometry(store, pattern),
            active,
            store.steps_in_pattern(pattern)
        );
    }
}

fn print_steps(store: &PatternStore, pattern: usize) {
    println!("Pattern {pattern} ({})", geometry(store, pattern));
    println!();
    println!(
        "  {:4}  {:7}  {:5}  {:8}  {:6}  {}",
        "Step", "Measure", "Note", "Velocity", "Active", "Retrigger"
    );
    println!(
        "  {:4}  {:7}  {:5}  {:8}  {:6}  {}",
        "----", "-------", "----", "--------", "------", "---------"
    );

    let steps_per_measure = store.steps_per_measure(pattern);
    for (index, step) in store.pattern(pattern).iter_steps() {
        println!(
            "  {:4}  {:7}  {:5}  {:8.2}  {:6}  {}",
            index,
            format!("{}.{}", index / steps_per_measure + 1, index % steps_per_measure + 1),
            note_name(step.pitch),
            step.velocity,
            yes_no(step.active),
            yes_no(step.retrigger)
        );
    }
}
