//! Jack layout of the Piano Roll module.

/// Input jacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    /// Clock; each rising edge advances one step.
    Clock,
    /// Rising edge rewinds to pattern 0, before the first step.
    Reset,
    /// Pattern select, 1 V/oct: 0 V is pattern 0, each semitone the next.
    Pattern,
    /// Rising edge toggles recording.
    Record,
    /// Rising edge toggles running. Patching it also holds gates open.
    Run,
    /// Pitch to record / pass through, 1 V/oct.
    Voct,
    /// Gate to record / pass through.
    Gate,
    /// Retrigger to record / pass through.
    Retrigger,
    /// Velocity to record / pass through, 0-10 V.
    Velocity,
}

impl Input {
    /// Number of input jacks.
    pub const COUNT: usize = 9;

    /// Every input jack in index order.
    pub const ALL: [Input; Input::COUNT] = [
        Input::Clock,
        Input::Reset,
        Input::Pattern,
        Input::Record,
        Input::Run,
        Input::Voct,
        Input::Gate,
        Input::Retrigger,
        Input::Velocity,
    ];

    /// Index into [`Ports`](crate::Ports).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Panel label.
    pub const fn name(self) -> &'static str {
        match self {
            Input::Clock => "Clock",
            Input::Reset => "Reset",
            Input::Pattern => "Pattern",
            Input::Record => "Record",
            Input::Run => "Run",
            Input::Voct => "V/Oct",
            Input::Gate => "Gate",
            Input::Retrigger => "Retrigger",
            Input::Velocity => "Velocity",
        }
    }
}

/// Output jacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Output {
    /// Note gate, 0/10 V.
    Gate,
    /// 1 ms retrigger pulse, 0/10 V.
    Retrigger,
    /// Step velocity, 0-10 V.
    Velocity,
    /// Step pitch, 1 V/oct.
    Voct,
    /// 1 ms pulse when the last step of the pattern plays.
    EndOfPattern,
    /// Clock input, forwarded for chaining.
    Clock,
    /// Reset input, forwarded for chaining.
    Reset,
    /// Run input, forwarded for chaining.
    Run,
    /// Record input, forwarded for chaining.
    Record,
    /// Current pattern as a pattern-select voltage, for chaining.
    Pattern,
}

impl Output {
    /// Number of output jacks.
    pub const COUNT: usize = 10;

    /// Every output jack in index order.
    pub const ALL: [Output; Output::COUNT] = [
        Output::Gate,
        Output::Retrigger,
        Output::Velocity,
        Output::Voct,
        Output::EndOfPattern,
        Output::Clock,
        Output::Reset,
        Output::Run,
        Output::Record,
        Output::Pattern,
    ];

    /// Index into [`Ports`](crate::Ports).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Panel label.
    pub const fn name(self) -> &'static str {
        match self {
            Output::Gate => "Gate",
            Output::Retrigger => "Retrigger",
            Output::Velocity => "Velocity",
            Output::Voct => "V/Oct",
            Output::EndOfPattern => "End of Pattern",
            Output::Clock => "Clock",
            Output::Reset => "Reset",
            Output::Run => "Run",
            Output::Record => "Record",
            Output::Pattern => "Pattern",
        }
    }
}
