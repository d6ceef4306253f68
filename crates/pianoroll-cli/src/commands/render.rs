//! Offline playback of a patch against a generated clock.

use anyhow::Context;
use clap::Args;
use pianoroll_config::RenderConfig;
use pianoroll_core::{
    Input, Module, Output, PianoRoll, ProcessArgs, STEP_NOT_STARTED, note_name, quantize_pitch,
};
use std::fmt;
use std::path::PathBuf;

use super::common::LoadedPatch;

/// Output level above which a gate or trigger counts as high.
const HIGH: f32 = 5.0;

#[derive(Args)]
pub struct RenderArgs {
    /// Patch file
    file: PathBuf,

    /// Render settings (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Tempo override
    #[arg(long)]
    bpm: Option<f32>,

    /// Number of clock pulses override
    #[arg(long)]
    steps: Option<usize>,

    /// Start from before the first step instead of the saved position
    #[arg(long)]
    rewind: bool,
}

/// Something observable on the output jacks.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    /// Gate rose (or retriggered while high).
    NoteOn {
        /// Host sample index.
        sample: usize,
        /// Transport step that produced the note.
        step: i32,
        /// Semitone index read back from the pitch output.
        pitch: i32,
        /// Velocity output, 0-10 V.
        velocity: f32,
    },
    /// Gate fell.
    NoteOff {
        /// Host sample index.
        sample: usize,
    },
    /// End-of-pattern pulse rose.
    EndOfPattern {
        /// Host sample index.
        sample: usize,
    },
}

struct Timed<'a>(&'a RenderEvent, u32);

impl fmt::Display for Timed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = |sample: usize| sample as f64 / f64::from(self.1);
        match *self.0 {
            RenderEvent::NoteOn {
                sample,
                step,
                pitch,
                velocity,
            } => write!(
                f,
                "{:>9.4}s  step {step:>3}  note on   {:<4} vel {:.2}",
                seconds(sample),
                note_name(pitch),
                velocity / 10.0
            ),
            RenderEvent::NoteOff { sample } => {
                write!(f, "{:>9.4}s             note off", seconds(sample))
            }
            RenderEvent::EndOfPattern { sample } => {
                write!(f, "{:>9.4}s             end of pattern", seconds(sample))
            }
        }
    }
}

/// Drive `module` with a square clock per `config` and collect output events.
///
/// Each clock period starts low, so the first rising edge lands half a period
/// in and every period contributes exactly one edge.
pub fn render(module: &mut PianoRoll, config: &RenderConfig) -> Vec<RenderEvent> {
    if let Some(delay) = config.clock_delay {
        module.set_clock_delay(delay);
    }
    if config.start_running {
        module.transport_mut().set_run(true);
    }

    let mut ports = PianoRoll::ports();
    ports.input_mut(Input::Clock.index()).connect(0.0);
    if config.run_connected {
        ports.input_mut(Input::Run.index()).connect(0.0);
    }
    ports
        .output_mut(Output::Retrigger.index())
        .set_connected(config.retrigger_connected);

    let args = ProcessArgs::new(config.sample_rate as f32);
    let period = config.clock_period_samples();
    let mut events = Vec::new();
    let mut gate_was_high = false;
    let mut retrigger_was_high = false;
    let mut eop_was_high = false;

    for sample in 0..config.total_samples() {
        let clock = if sample % period < period / 2 { 0.0 } else { 10.0 };
        ports.input_mut(Input::Clock.index()).set_voltage(clock);
        module.process(&args, &mut ports);

        let gate_high = ports.output(Output::Gate.index()).voltage() > HIGH;
        let retrigger_high = ports.output(Output::Retrigger.index()).voltage() > HIGH;
        let eop_high = ports.output(Output::EndOfPattern.index()).voltage() > HIGH;

        let retriggered = gate_was_high && retrigger_high && !retrigger_was_high;
        if (gate_high && !gate_was_high) || retriggered {
            events.push(RenderEvent::NoteOn {
                sample,
                step: module.transport().current_step_in_pattern(),
                pitch: quantize_pitch(ports.output(Output::Voct.index()).voltage()),
                velocity: ports.output(Output::Velocity.index()).voltage(),
            });
        } else if !gate_high && gate_was_high && !retrigger_high {
            events.push(RenderEvent::NoteOff { sample });
        }
        if eop_high && !eop_was_high {
            events.push(RenderEvent::EndOfPattern { sample });
        }

        // A gap forced by an unpatched retrigger output is not a note off.
        gate_was_high = gate_high || (gate_was_high && retrigger_high);
        retrigger_was_high = retrigger_high;
        eop_was_high = eop_high;
    }

    events
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("failed to load render settings {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(bpm) = args.bpm {
        config = config.with_bpm(bpm);
    }
    if let Some(steps) = args.steps {
        config = config.with_steps(steps);
    }

    let LoadedPatch { mut module, .. } = LoadedPatch::load(&args.file)?;
    if args.rewind {
        module.transport_mut().set_step_in_pattern(STEP_NOT_STARTED);
    }

    tracing::info!(
        bpm = config.bpm,
        steps = config.steps,
        sample_rate = config.sample_rate,
        "rendering"
    );

    println!(
        "Rendering {} clocks at {} bpm ({} Hz), pattern {}",
        config.steps,
        config.bpm,
        config.sample_rate,
        module.transport().current_pattern()
    );
    println!();

    let events = render(&mut module, &config);
    for event in &events {
        println!("{}", Timed(event, config.sample_rate));
    }

    let notes = events
        .iter()
        .filter(|e| matches!(e, RenderEvent::NoteOn { .. }))
        .count();
    let ends = events
        .iter()
        .filter(|e| matches!(e, RenderEvent::EndOfPattern { .. }))
        .count();
    println!();
    println!("{notes} notes, {ends} pattern ends");

    Ok(())
}
