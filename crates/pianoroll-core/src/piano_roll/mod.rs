//! The Piano Roll module: a clocked pattern recorder and player.
//!
//! Every [`PROCESS_DIVISION`] host ticks the module runs its pipeline once:
//!
//! 1. Delay the clock input by `clock_delay` invocations and detect edges.
//! 2. Handle reset, pattern select, record and run inputs.
//! 3. Advance the transport on a (delayed) clock edge.
//! 4. Keep the gate continuous when a cable is patched into or pulled from Run.
//! 5. Record pitch/gate/retrigger/velocity into the current step.
//! 6. Play an auditioned step, then the sequenced step.
//! 7. Render pulses to the gate, retrigger and end-of-pattern jacks.
//! 8. Let a held live gate override the sequenced outputs.
//! 9. Forward transport inputs to the chain outputs.
//!
//! Pulse timers are advanced by `PROCESS_DIVISION` host ticks' worth of time
//! per invocation so they stay accurate in wall-clock terms.

mod ports;

pub use ports::{Input, Output};

use serde_json::{Value, json};

use crate::auditioner::Auditioner;
use crate::dsp::{
    BoolEdge, ClockDelayLine, ClockDivider, MAX_CLOCK_DELAY, PulseGenerator, SchmittTrigger,
    TRIGGER_HIGH,
};
use crate::module::{Module, Ports, ProcessArgs};
use crate::pattern::{NUM_PATTERNS, PatternStore};
use crate::quantize::{C4_INDEX, pitch_to_voltage, quantize_pitch};
use crate::transport::{STEP_NOT_STARTED, StepPosition, Transport};

/// Host ticks per pipeline invocation.
pub const PROCESS_DIVISION: u32 = 32;

/// Gate length while the Run jack is patched: held until the next step decides.
pub const PLUGGED_GATE_DURATION: f32 = f32::INFINITY;

/// Gate length while previewing a step: held until the preview stops.
pub const AUDITION_GATE_DURATION: f32 = f32::INFINITY;

/// Gate length while the Run jack is unpatched, in seconds.
pub const UNPLUGGED_GATE_DURATION: f32 = 2.0;

/// Length of retrigger and end-of-pattern pulses, in seconds.
pub const TRIGGER_DURATION: f32 = 1e-3;

/// Gate or retrigger level below which a recorded step is switched off.
const RECORD_RELEASE_LEVEL: f32 = 0.1;

/// Output level of a high gate or trigger.
const GATE_VOLTAGE: f32 = 10.0;

/// Full-scale velocity voltage.
const VELOCITY_SCALE: f32 = 10.0;

/// Clocked piano roll sequencer.
///
/// # Example
///
/// ```rust
/// use pianoroll_core::{Input, Module, Output, PianoRoll, ProcessArgs, PROCESS_DIVISION};
///
/// let mut module = PianoRoll::new();
/// module.patterns_mut().set_step_active(0, 0, 0, true);
/// module.transport_mut().set_run(true);
///
/// let mut ports = PianoRoll::ports();
/// ports.output_mut(Output::Retrigger.index()).set_connected(true);
/// let args = ProcessArgs::new(48000.0);
///
/// for clock in [0.0, 10.0] {
///     ports.input_mut(Input::Clock.index()).connect(clock);
///     for _ in 0..PROCESS_DIVISION {
///         module.process(&args, &mut ports);
///     }
/// }
/// assert_eq!(ports.output(Output::Gate.index()).voltage(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct PianoRoll {
    patterns: PatternStore,
    transport: Transport,
    auditioner: Auditioner,
    divider: ClockDivider,
    clock_delay: ClockDelayLine,
    clock_trigger: SchmittTrigger,
    reset_trigger: SchmittTrigger,
    record_trigger: SchmittTrigger,
    run_trigger: SchmittTrigger,
    run_input_active: BoolEdge,
    gate_pulse: PulseGenerator,
    retrigger_pulse: PulseGenerator,
    eop_pulse: PulseGenerator,
}

impl Default for PianoRoll {
    fn default() -> Self {
        Self::new()
    }
}

impl PianoRoll {
    /// A stopped module with empty patterns and no clock delay.
    pub fn new() -> Self {
        Self {
            patterns: PatternStore::new(),
            transport: Transport::new(),
            auditioner: Auditioner::new(),
            divider: ClockDivider::new(PROCESS_DIVISION),
            clock_delay: ClockDelayLine::new(0),
            clock_trigger: SchmittTrigger::new(),
            reset_trigger: SchmittTrigger::new(),
            record_trigger: SchmittTrigger::new(),
            run_trigger: SchmittTrigger::new(),
            run_input_active: BoolEdge::new(false),
            gate_pulse: PulseGenerator::new(),
            retrigger_pulse: PulseGenerator::new(),
            eop_pulse: PulseGenerator::new(),
        }
    }

    /// Unpatched jacks sized for this module.
    pub fn ports() -> Ports {
        Ports::new(Input::COUNT, Output::COUNT)
    }

    /// Pattern data.
    pub fn patterns(&self) -> &PatternStore {
        &self.patterns
    }

    /// Mutable pattern data, for editors.
    pub fn patterns_mut(&mut self) -> &mut PatternStore {
        &mut self.patterns
    }

    /// Transport state.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Mutable transport state, for editors.
    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    /// Step preview state.
    pub fn auditioner(&self) -> &Auditioner {
        &self.auditioner
    }

    /// Mutable step preview state, for editors.
    pub fn auditioner_mut(&mut self) -> &mut Auditioner {
        &mut self.auditioner
    }

    /// Clock delay in pipeline invocations.
    pub fn clock_delay(&self) -> usize {
        self.clock_delay.delay()
    }

    /// Set the clock delay (clamped to [`MAX_CLOCK_DELAY`]).
    pub fn set_clock_delay(&mut self, delay: usize) {
        self.clock_delay.set_delay(delay);
    }

    /// Clock, transport inputs, step advance. Returns the clock tick.
    fn update_transport(&mut self, ports: &Ports) -> bool {
        let clock =
            self.clock_delay
                .process(voltage(ports, Input::Clock), &mut self.clock_trigger);
        let mut clock_tick = clock.tick;

        if self.reset_trigger.process(voltage(ports, Input::Reset)) {
            self.transport.reset();
            self.gate_pulse.reset();
            if clock.level > TRIGGER_HIGH {
                clock_tick = true;
            }
        }

        let pattern_in = ports.input(Input::Pattern.index());
        if pattern_in.is_connected() {
            let pattern = (quantize_pitch(pattern_in.voltage()) - C4_INDEX)
                .clamp(0, NUM_PATTERNS as i32 - 1);
            self.transport.set_pattern(pattern as usize);
        }

        if self.record_trigger.process(voltage(ports, Input::Record)) {
            self.transport.toggle_recording();
        }

        if self.run_trigger.process(voltage(ports, Input::Run)) {
            self.transport.toggle_run();

            if clock.level > TRIGGER_HIGH
                && self.transport.current_step_in_pattern() == STEP_NOT_STARTED
            {
                clock_tick = true;
            }
            if !self.transport.is_running() {
                self.gate_pulse.reset();
            }
        }

        if clock_tick {
            self.transport.advance_step(&self.patterns);
        }

        clock_tick
    }

    /// Keep the gate continuous across Run cable changes.
    fn update_run_connection(&mut self, ports: &Ports) {
        self.run_input_active
            .process(ports.input(Input::Run.index()).is_connected());

        if !self.run_input_active.changed() || !self.transport.is_running() {
            return;
        }

        let gate_high = self.gate_pulse.is_high();
        let remaining = self.gate_pulse.remaining();
        self.gate_pulse.reset();
        if !gate_high {
            return;
        }

        if self.run_input_active.value() {
            // Patched in while a note sounds: hold it until the next step.
            self.gate_pulse.trigger(PLUGGED_GATE_DURATION);
        } else {
            // Pulled out: finish the note, but never hold it open forever.
            self.gate_pulse
                .trigger(remaining.min(UNPLUGGED_GATE_DURATION));
        }
    }

    /// Write live inputs into the current step.
    fn record(&mut self, ports: &Ports, clock_tick: bool) {
        let Some(StepPosition {
            pattern,
            measure,
            step_in_measure: step,
        }) = self.transport.position(&self.patterns)
        else {
            return;
        };

        let voct = ports.input(Input::Voct.index());
        if voct.is_connected() {
            self.patterns
                .set_step_pitch(pattern, measure, step, quantize_pitch(voct.voltage()));
        }

        let gate = ports.input(Input::Gate.index());
        if gate.is_connected() {
            let level = gate.voltage();
            // Only release at a step boundary: letting go early still counts the step.
            if clock_tick && level < RECORD_RELEASE_LEVEL {
                self.patterns.set_step_active(pattern, measure, step, false);
            }
            if level >= TRIGGER_HIGH {
                self.patterns.set_step_active(pattern, measure, step, true);
            }
        }

        let retrigger = ports.input(Input::Retrigger.index());
        if retrigger.is_connected() {
            let level = retrigger.voltage();
            if clock_tick && level < RECORD_RELEASE_LEVEL {
                self.patterns
                    .set_step_retrigger(pattern, measure, step, false);
            }
            if level >= TRIGGER_HIGH {
                self.patterns.set_step_retrigger(pattern, measure, step, true);
            }
        }

        let velocity = ports.input(Input::Velocity.index());
        if velocity.is_connected() {
            if clock_tick {
                self.patterns.set_step_velocity(pattern, measure, step, 0.0);
            }
            let level = velocity.voltage();
            if level > 0.0 {
                let scaled = (level / VELOCITY_SCALE).clamp(0.0, 1.0);
                self.patterns
                    .increase_step_velocity_to(pattern, measure, step, scaled);
            }
        }
    }

    /// Sound the previewed step.
    fn audition(&mut self, ports: &mut Ports) {
        if self.auditioner.is_auditioning() {
            let pattern = self.transport.current_pattern();
            let located = i32::try_from(self.auditioner.step_to_audition())
                .ok()
                .and_then(|step| self.patterns.locate(pattern, step));

            if let Some((measure, step)) = located
                && self.patterns.is_step_active(pattern, measure, step)
            {
                if self.auditioner.consume_retrigger() {
                    self.retrigger_pulse.trigger(TRIGGER_DURATION);
                }
                self.gate_pulse.trigger(AUDITION_GATE_DURATION);
                self.emit_step(ports, pattern, measure, step);
            }
        }

        if self.auditioner.consume_stop_event() {
            self.gate_pulse.reset();
        }
    }

    /// Sound the sequenced step on a clock edge.
    fn play(&mut self, ports: &mut Ports, clock_tick: bool) {
        if !clock_tick || !self.transport.is_running() || self.transport.is_recording() {
            return;
        }

        if self.transport.is_last_step_of_pattern(&self.patterns) {
            self.eop_pulse.trigger(TRIGGER_DURATION);
        }

        let active = self.transport.position(&self.patterns).filter(|p| {
            self.patterns
                .is_step_active(p.pattern, p.measure, p.step_in_measure)
        });
        let Some(StepPosition {
            pattern,
            measure,
            step_in_measure: step,
        }) = active
        else {
            self.gate_pulse.reset();
            return;
        };

        if !self.gate_pulse.is_high() || self.patterns.is_step_retriggered(pattern, measure, step)
        {
            self.retrigger_pulse.trigger(TRIGGER_DURATION);
        }

        self.gate_pulse.trigger(if self.run_input_active.value() {
            PLUGGED_GATE_DURATION
        } else {
            UNPLUGGED_GATE_DURATION
        });

        self.emit_step(ports, pattern, measure, step);
    }

    fn emit_step(&self, ports: &mut Ports, pattern: usize, measure: usize, step: usize) {
        let velocity = self.patterns.step_velocity(pattern, measure, step);
        let pitch = self.patterns.step_pitch(pattern, measure, step);
        set(ports, Output::Velocity, velocity * VELOCITY_SCALE);
        set(ports, Output::Voct, pitch_to_voltage(pitch));
    }

    /// Pulse timers to voltages.
    fn render_pulses(&mut self, ports: &mut Ports, delta: f32) {
        let retrigger_high = self.retrigger_pulse.process(delta);
        let gate_high = self.gate_pulse.process(delta);
        let eop_high = self.eop_pulse.process(delta);

        set(ports, Output::Retrigger, gate_level(retrigger_high));
        set(ports, Output::EndOfPattern, gate_level(eop_high));

        // Without a retrigger cable, show the retrigger as a short gate gap.
        let blip = retrigger_high && !ports.output(Output::Retrigger.index()).is_connected();
        set(ports, Output::Gate, gate_level(gate_high && !blip));
    }

    /// A held live gate overrides the sequence.
    fn pass_through(ports: &mut Ports) {
        let gate = *ports.input(Input::Gate.index());
        if !gate.is_connected() || gate.voltage() <= TRIGGER_HIGH {
            return;
        }

        let voct = *ports.input(Input::Voct.index());
        let retrigger = *ports.input(Input::Retrigger.index());
        let velocity = *ports.input(Input::Velocity.index());

        if voct.is_connected() {
            set(ports, Output::Voct, voct.voltage());
        }

        let retrigger_out_connected = ports.output(Output::Retrigger.index()).is_connected();
        if !retrigger_out_connected && retrigger.is_connected() {
            set(ports, Output::Gate, gate.voltage() - retrigger.voltage());
        } else {
            set(ports, Output::Gate, gate.voltage());
        }

        if retrigger.is_connected() {
            set(ports, Output::Retrigger, retrigger.voltage());
        }
        if velocity.is_connected() {
            set(ports, Output::Velocity, velocity.voltage());
        }
    }

    /// Chain outputs.
    fn forward_chain(&self, ports: &mut Ports) {
        for (input, output) in [
            (Input::Clock, Output::Clock),
            (Input::Reset, Output::Reset),
            (Input::Run, Output::Run),
            (Input::Record, Output::Record),
        ] {
            let v = voltage(ports, input);
            set(ports, output, v);
        }
        let pattern = self.transport.current_pattern() as i32;
        set(ports, Output::Pattern, pitch_to_voltage(C4_INDEX + pattern));
    }
}

#[inline]
fn voltage(ports: &Ports, input: Input) -> f32 {
    ports.input(input.index()).voltage()
}

#[inline]
fn set(ports: &mut Ports, output: Output, voltage: f32) {
    ports.output_mut(output.index()).set_voltage(voltage);
}

#[inline]
fn gate_level(high: bool) -> f32 {
    if high { GATE_VOLTAGE } else { 0.0 }
}

impl Module for PianoRoll {
    fn process(&mut self, args: &ProcessArgs, ports: &mut Ports) {
        if !self.divider.process() {
            return;
        }
        let delta = args.sample_time * self.divider.division() as f32;

        let clock_tick = self.update_transport(ports);
        self.update_run_connection(ports);

        if self.transport.is_recording() && self.transport.is_running() {
            self.record(ports, clock_tick);
        }

        self.audition(ports);
        self.play(ports, clock_tick);
        self.render_pulses(ports, delta);
        Self::pass_through(ports);
        self.forward_chain(ports);
    }

    fn on_reset(&mut self) {
        self.transport.reset();
        self.patterns.reset();
        self.divider.set_division(PROCESS_DIVISION);
        self.divider.reset();
        self.gate_pulse.reset();
        self.retrigger_pulse.reset();
        self.eop_pulse.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(module_id = self.patterns.module_id(), "piano roll: reset");
    }

    fn on_add(&mut self, module_id: i64) {
        self.patterns.set_module_id(module_id);
    }

    fn data_to_json(&self) -> Value {
        json!({
            "patterns": self.patterns.data_to_json(),
            "currentPattern": self.transport.current_pattern(),
            "currentStep": self.transport.current_step_in_pattern(),
            "clockDelay": self.clock_delay.delay(),
            "sequenceRunning": self.transport.is_running(),
        })
    }

    fn data_from_json(&mut self, root: &Value) {
        if let Some(delay) = root.get("clockDelay").and_then(Value::as_u64) {
            self.set_clock_delay(usize::try_from(delay).unwrap_or(MAX_CLOCK_DELAY));
        }

        if let Some(patterns) = root.get("patterns") {
            self.patterns.data_from_json(patterns);
        }

        if let Some(pattern) = root.get("currentPattern").and_then(Value::as_u64) {
            self.transport
                .set_pattern(usize::try_from(pattern).unwrap_or(NUM_PATTERNS - 1));
        }

        if let Some(step) = root.get("currentStep").and_then(Value::as_i64) {
            let last = self.patterns.steps_in_pattern(self.transport.current_pattern()) as i64 - 1;
            let step = step.clamp(i64::from(STEP_NOT_STARTED), last);
            self.transport.set_step_in_pattern(step as i32);
        }

        if let Some(running) = root.get("sequenceRunning").and_then(Value::as_bool) {
            self.transport.set_run(running);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            module_id = self.patterns.module_id(),
            pattern = self.transport.current_pattern(),
            step = self.transport.current_step_in_pattern(),
            running = self.transport.is_running(),
            "piano roll: state loaded"
        );
    }
}
