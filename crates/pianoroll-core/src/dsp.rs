//! Control-rate signal primitives.
//!
//! The sequencer never touches audio-rate signals; everything here works on
//! gate, trigger and clock voltages sampled once per processing invocation.
//!
//! - [`SchmittTrigger`] - rising-edge detector with hysteresis
//! - [`PulseGenerator`] - countdown timer for gate and trigger outputs
//! - [`ClockDivider`] - runs a block once every N host ticks
//! - [`BoolEdge`] - change detector for boolean state (cable connections)
//! - [`ClockDelayLine`] - fixed-latency FIFO in front of the clock detector

use std::collections::VecDeque;

/// Largest supported clock delay, in processing invocations.
pub const MAX_CLOCK_DELAY: usize = 32;

/// Voltage at or above which a trigger input is considered high.
pub const TRIGGER_HIGH: f32 = 1.0;

/// Voltage at or below which a trigger input is considered low.
pub const TRIGGER_LOW: f32 = 0.0;

/// Rising-edge detector with hysteresis.
///
/// Fires once when the input reaches [`TRIGGER_HIGH`] after having dropped to
/// [`TRIGGER_LOW`]. The detector starts out in the high state, so a signal that
/// is already high when the module is created does not fire until it has been
/// low at least once.
///
/// # Example
///
/// ```rust
/// use pianoroll_core::SchmittTrigger;
///
/// let mut trigger = SchmittTrigger::new();
/// assert!(!trigger.process(10.0)); // armed only after a low sample
/// assert!(!trigger.process(0.0));
/// assert!(trigger.process(10.0));
/// assert!(!trigger.process(10.0));
/// ```
#[derive(Debug, Clone)]
pub struct SchmittTrigger {
    high: bool,
}

impl SchmittTrigger {
    /// Create a detector in the high state.
    pub fn new() -> Self {
        Self { high: true }
    }

    /// Feed one sample. Returns `true` on a rising edge.
    #[inline]
    pub fn process(&mut self, input: f32) -> bool {
        if self.high {
            if input <= TRIGGER_LOW {
                self.high = false;
            }
            false
        } else if input >= TRIGGER_HIGH {
            self.high = true;
            true
        } else {
            false
        }
    }

    /// Whether the detector currently considers its input high.
    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Return to the initial (high) state.
    pub fn reset(&mut self) {
        self.high = true;
    }
}

impl Default for SchmittTrigger {
    fn default() -> Self {
        Self::new()
    }
}

/// Countdown timer driving gate and trigger outputs.
///
/// [`trigger`](Self::trigger) only ever lengthens the remaining time, so
/// overlapping triggers merge into the longest one. An infinite duration
/// keeps the pulse high until [`reset`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct PulseGenerator {
    remaining: f32,
}

impl PulseGenerator {
    /// Create an idle pulse generator.
    pub fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// Start (or extend) the pulse to last at least `duration` seconds.
    #[inline]
    pub fn trigger(&mut self, duration: f32) {
        if duration > self.remaining {
            self.remaining = duration;
        }
    }

    /// Advance the timer by `delta` seconds.
    ///
    /// Returns whether the pulse was high at the start of this advance.
    /// `process(0.0)` therefore queries the state without consuming time.
    #[inline]
    pub fn process(&mut self, delta: f32) -> bool {
        if self.remaining > 0.0 {
            self.remaining -= delta;
            true
        } else {
            false
        }
    }

    /// Seconds left before the pulse ends (may be infinite or negative).
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whether the pulse is high.
    pub fn is_high(&self) -> bool {
        self.remaining > 0.0
    }

    /// Cancel any pending pulse.
    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}

/// Runs a block once every `division` calls.
#[derive(Debug, Clone)]
pub struct ClockDivider {
    clock: u32,
    division: u32,
}

impl ClockDivider {
    /// Create a divider firing every `division` calls (minimum 1).
    pub fn new(division: u32) -> Self {
        Self {
            clock: 0,
            division: division.max(1),
        }
    }

    /// Count one call. Returns `true` on every `division`-th call.
    #[inline]
    pub fn process(&mut self) -> bool {
        self.clock += 1;
        if self.clock >= self.division {
            self.clock = 0;
            true
        } else {
            false
        }
    }

    /// Change the division (minimum 1).
    pub fn set_division(&mut self, division: u32) {
        self.division = division.max(1);
    }

    /// Current division.
    pub fn division(&self) -> u32 {
        self.division
    }

    /// Restart counting from zero.
    pub fn reset(&mut self) {
        self.clock = 0;
    }
}

/// Tracks a boolean and whether the last update changed it.
#[derive(Debug, Clone, Default)]
pub struct BoolEdge {
    value: bool,
    changed: bool,
}

impl BoolEdge {
    /// Create a tracker holding `value`.
    pub fn new(value: bool) -> Self {
        Self {
            value,
            changed: false,
        }
    }

    /// Record the latest value.
    #[inline]
    pub fn process(&mut self, value: bool) {
        self.changed = value != self.value;
        self.value = value;
    }

    /// Latest value.
    pub fn value(&self) -> bool {
        self.value
    }

    /// Whether the latest [`process`](Self::process) call flipped the value.
    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// Result of pushing one sample through a [`ClockDelayLine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayedClock {
    /// A rising edge was seen among the samples leaving the line.
    pub tick: bool,
    /// The most recent sample to leave the line.
    pub level: f32,
}

/// Fixed-latency FIFO in front of a clock edge detector.
///
/// Each call pushes the live clock voltage and releases everything older than
/// `delay` calls through the supplied [`SchmittTrigger`]. With a delay of 0 the
/// live sample passes straight through. The buffer is preallocated for
/// [`MAX_CLOCK_DELAY`], so processing never allocates.
#[derive(Debug, Clone)]
pub struct ClockDelayLine {
    buffer: VecDeque<f32>,
    delay: usize,
}

impl ClockDelayLine {
    /// Create a delay line of `delay` invocations (clamped to [`MAX_CLOCK_DELAY`]).
    pub fn new(delay: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_CLOCK_DELAY + 1),
            delay: delay.min(MAX_CLOCK_DELAY),
        }
    }

    /// Push the live clock voltage and drain delayed samples through `trigger`.
    ///
    /// A shorter buffer (start-up, or a longer delay just configured) is padded
    /// with the live sample. A longer buffer (delay just shortened) is drained
    /// in one go, and any edge among the drained samples counts.
    pub fn process(&mut self, input: f32, trigger: &mut SchmittTrigger) -> DelayedClock {
        while self.buffer.len() <= self.delay {
            self.buffer.push_back(input);
        }

        let mut out = DelayedClock {
            tick: false,
            level: 0.0,
        };
        while self.buffer.len() > self.delay {
            let Some(level) = self.buffer.pop_front() else {
                break;
            };
            out.level = level;
            out.tick |= trigger.process(level);
        }
        out
    }

    /// Configured delay in invocations.
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Change the delay (clamped to [`MAX_CLOCK_DELAY`]); takes effect on the next push.
    pub fn set_delay(&mut self, delay: usize) {
        self.delay = delay.min(MAX_CLOCK_DELAY);
    }
}

impl Default for ClockDelayLine {
    fn default() -> Self {
        Self::new(0)
    }
}
