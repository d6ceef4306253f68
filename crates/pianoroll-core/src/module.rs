//! Host capability interface.
//!
//! A host attaches modules to its patch, owns their voltage ports, and calls
//! [`Module::process`] once per audio tick from its real-time thread. Save and
//! load go through [`Module::data_to_json`] / [`Module::data_from_json`] on a
//! different thread, but never concurrently with processing; modules do no
//! locking of their own.
//!
//! ## Design Decisions
//!
//! - **Trait, not base class**: modules implement [`Module`]; the host holds
//!   them as `Box<dyn Module + Send>`.
//! - **Ports live with the host**: [`Ports`] is passed in on every call, so
//!   output voltages hold their last value between calls exactly like a
//!   physical jack.
//! - **Named-field tree**: persisted state is a [`serde_json::Value`]; the
//!   host decides how it is framed on disk.

use serde_json::Value;

/// Per-call timing information supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessArgs {
    /// Host sample rate in Hz.
    pub sample_rate: f32,
    /// Duration of one host tick in seconds (`1 / sample_rate`).
    pub sample_time: f32,
}

impl ProcessArgs {
    /// Timing for the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            sample_time: 1.0 / sample_rate,
        }
    }
}

impl Default for ProcessArgs {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

/// A mono input jack.
///
/// `channels == 0` means nothing is patched in; the voltage then reads 0 V.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputPort {
    voltage: f32,
    channels: u8,
}

impl InputPort {
    /// Current voltage (0 V when unpatched).
    #[inline]
    pub fn voltage(&self) -> f32 {
        if self.channels == 0 { 0.0 } else { self.voltage }
    }

    /// Whether a cable is patched in.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.channels > 0
    }

    /// Patch in a cable carrying `voltage`.
    pub fn connect(&mut self, voltage: f32) {
        self.channels = 1;
        self.voltage = voltage;
    }

    /// Pull the cable.
    pub fn disconnect(&mut self) {
        self.channels = 0;
        self.voltage = 0.0;
    }

    /// Update the voltage of a patched cable. Ignored while unpatched.
    pub fn set_voltage(&mut self, voltage: f32) {
        if self.channels > 0 {
            self.voltage = voltage;
        }
    }
}

/// A mono output jack.
///
/// `connected` is owned by the host and says whether anything downstream is
/// reading this jack. Modules only write the voltage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutputPort {
    voltage: f32,
    connected: bool,
}

impl OutputPort {
    /// Last written voltage.
    #[inline]
    pub fn voltage(&self) -> f32 {
        self.voltage
    }

    /// Write a voltage.
    #[inline]
    pub fn set_voltage(&mut self, voltage: f32) {
        self.voltage = voltage;
    }

    /// Whether anything downstream reads this jack.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Host-side: mark the jack as patched or not.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

/// The input and output jacks of one module instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ports {
    inputs: Vec<InputPort>,
    outputs: Vec<OutputPort>,
}

impl Ports {
    /// Allocate `inputs` unpatched inputs and `outputs` unpatched outputs.
    pub fn new(inputs: usize, outputs: usize) -> Self {
        Self {
            inputs: vec![InputPort::default(); inputs],
            outputs: vec![OutputPort::default(); outputs],
        }
    }

    /// Input jack by index. Panics if out of range.
    #[inline]
    pub fn input(&self, index: usize) -> &InputPort {
        &self.inputs[index]
    }

    /// Mutable input jack by index. Panics if out of range.
    #[inline]
    pub fn input_mut(&mut self, index: usize) -> &mut InputPort {
        &mut self.inputs[index]
    }

    /// Output jack by index. Panics if out of range.
    #[inline]
    pub fn output(&self, index: usize) -> &OutputPort {
        &self.outputs[index]
    }

    /// Mutable output jack by index. Panics if out of range.
    #[inline]
    pub fn output_mut(&mut self, index: usize) -> &mut OutputPort {
        &mut self.outputs[index]
    }

    /// Number of input jacks.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output jacks.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}

/// A component a host can attach to its patch.
///
/// # Example
///
/// ```rust
/// use pianoroll_core::{Module, Ports, ProcessArgs};
/// use serde_json::{Value, json};
///
/// struct Attenuator;
///
/// impl Module for Attenuator {
///     fn process(&mut self, _args: &ProcessArgs, ports: &mut Ports) {
///         let v = ports.input(0).voltage();
///         ports.output_mut(0).set_voltage(v * 0.5);
///     }
///
///     fn on_reset(&mut self) {}
///
///     fn data_to_json(&self) -> Value {
///         json!({})
///     }
///
///     fn data_from_json(&mut self, _root: &Value) {}
/// }
///
/// let mut ports = Ports::new(1, 1);
/// ports.input_mut(0).connect(4.0);
/// Attenuator.process(&ProcessArgs::default(), &mut ports);
/// assert_eq!(ports.output(0).voltage(), 2.0);
/// ```
pub trait Module {
    /// Run one host tick.
    fn process(&mut self, args: &ProcessArgs, ports: &mut Ports);

    /// Return to the power-on state (user "initialize" or host reset).
    fn on_reset(&mut self);

    /// Called once when the host attaches the module, with its instance id.
    fn on_add(&mut self, _module_id: i64) {}

    /// Serialize persistent state to a named-field tree.
    fn data_to_json(&self) -> Value;

    /// Restore persistent state. Missing or mistyped fields leave the
    /// corresponding state untouched; loading never fails.
    fn data_from_json(&mut self, root: &Value);
}
