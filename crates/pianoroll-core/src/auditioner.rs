//! Single-step preview.
//!
//! An editor previews a step by starting an audition on it. The auditioner
//! only holds a cursor and two one-shot events; it never touches the transport
//! or the recording state. The processing loop reads the cursor and consumes
//! the events.

/// A one-shot event: armed by the editor, consumed once by processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OneShot {
    /// Nothing pending.
    #[default]
    Idle,
    /// Raised and not yet consumed.
    Armed,
}

impl OneShot {
    /// Raise the event. Raising twice before consumption still fires once.
    pub fn arm(&mut self) {
        *self = OneShot::Armed;
    }

    /// Whether the event is pending, without consuming it.
    pub fn is_armed(self) -> bool {
        self == OneShot::Armed
    }

    /// Take the event: `true` once per arming, then `false`.
    pub fn consume(&mut self) -> bool {
        let armed = self.is_armed();
        *self = OneShot::Idle;
        armed
    }
}

/// Preview cursor with retrigger and stop events.
///
/// # Example
///
/// ```rust
/// use pianoroll_core::Auditioner;
///
/// let mut auditioner = Auditioner::new();
/// auditioner.start(5);
/// assert!(auditioner.is_auditioning());
/// assert!(auditioner.consume_retrigger());
/// assert!(!auditioner.consume_retrigger());
///
/// auditioner.stop();
/// assert!(auditioner.consume_stop_event());
/// assert!(!auditioner.consume_stop_event());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auditioner {
    step: usize,
    auditioning: bool,
    retrigger: OneShot,
    stop: OneShot,
}

impl Auditioner {
    /// Idle auditioner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preview `step` (absolute index in the current pattern).
    ///
    /// Starting on a different step, or from idle, requests a retrigger.
    pub fn start(&mut self, step: usize) {
        if !self.auditioning || self.step != step {
            self.retrigger.arm();
        }
        self.step = step;
        self.auditioning = true;
    }

    /// Request another retrigger pulse for the step being previewed.
    pub fn retrigger(&mut self) {
        if self.auditioning {
            self.retrigger.arm();
        }
    }

    /// End the preview. Raises the stop event if a preview was running.
    pub fn stop(&mut self) {
        if self.auditioning {
            self.auditioning = false;
            self.retrigger = OneShot::Idle;
            self.stop.arm();
        }
    }

    /// Whether a preview is running.
    pub fn is_auditioning(&self) -> bool {
        self.auditioning
    }

    /// Step being previewed.
    pub fn step_to_audition(&self) -> usize {
        self.step
    }

    /// Pending retrigger event (not consumed).
    pub fn retrigger_event(&self) -> OneShot {
        self.retrigger
    }

    /// Pending stop event (not consumed).
    pub fn stop_event(&self) -> OneShot {
        self.stop
    }

    /// Take the retrigger event.
    pub fn consume_retrigger(&mut self) -> bool {
        self.retrigger.consume()
    }

    /// Take the stop event.
    pub fn consume_stop_event(&mut self) -> bool {
        self.stop.consume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once() {
        let mut event = OneShot::default();
        assert!(!event.consume());
        event.arm();
        event.arm();
        assert!(event.is_armed());
        assert!(event.consume());
        assert!(!event.consume());
    }

    #[test]
    fn start_arms_retrigger_only_on_new_step() {
        let mut auditioner = Auditioner::new();
        auditioner.start(3);
        assert!(auditioner.consume_retrigger());

        auditioner.start(3);
        assert!(!auditioner.consume_retrigger());

        auditioner.start(4);
        assert_eq!(auditioner.step_to_audition(), 4);
        assert!(auditioner.consume_retrigger());
    }

    #[test]
    fn explicit_retrigger_requires_audition() {
        let mut auditioner = Auditioner::new();
        auditioner.retrigger();
        assert!(!auditioner.retrigger_event().is_armed());

        auditioner.start(0);
        auditioner.consume_retrigger();
        auditioner.retrigger();
        assert!(auditioner.consume_retrigger());
    }

    #[test]
    fn stop_without_audition_is_silent() {
        let mut auditioner = Auditioner::new();
        auditioner.stop();
        assert!(!auditioner.consume_stop_event());
    }

    #[test]
    fn stop_clears_pending_retrigger() {
        let mut auditioner = Auditioner::new();
        auditioner.start(2);
        auditioner.stop();
        assert!(!auditioner.is_auditioning());
        assert!(!auditioner.consume_retrigger());
        assert!(auditioner.stop_event().is_armed());
        assert!(auditioner.consume_stop_event());
    }
}
