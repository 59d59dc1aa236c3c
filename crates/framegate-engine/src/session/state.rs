/// Where a playback session stands with respect to its GL context.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionState {
    /// Surface or decoder (or both) not there yet.
    Uninitialized,
    /// Surface and decoder exist, but no render pass has completed.
    ContextPending,
    /// A render pass completed, so the native context provably exists.
    /// Playback commands are gated on this state.
    Active,
    /// Surface invalidated or application exiting. Terminal.
    TornDown,
}

/// Facts that drive [`SessionState`]. The state is derived, never stored, so
/// the order in which facts arrive does not matter.
#[derive(Debug, Default, Clone)]
pub(crate) struct Lifecycle {
    surface_realized: bool,
    decoder_attached: bool,
    render_pass_done: bool,
    torn_down: bool,
}

impl Lifecycle {
    pub(crate) fn state(&self) -> SessionState {
        if self.torn_down {
            SessionState::TornDown
        } else if !(self.surface_realized && self.decoder_attached) {
            SessionState::Uninitialized
        } else if self.render_pass_done {
            SessionState::Active
        } else {
            SessionState::ContextPending
        }
    }

    /// Applies `fact` and returns the new state if it changed.
    pub(crate) fn apply(&mut self, fact: impl FnOnce(&mut Self)) -> Option<SessionState> {
        let before = self.state();
        if before == SessionState::TornDown {
            return None;
        }
        fact(self);
        let after = self.state();
        (after != before).then_some(after)
    }

    pub(crate) fn surface_realized(&mut self) {
        self.surface_realized = true;
    }

    pub(crate) fn decoder_attached(&mut self) {
        self.decoder_attached = true;
    }

    pub(crate) fn render_pass_done(&mut self) {
        self.render_pass_done = true;
    }

    pub(crate) fn tear_down(&mut self) {
        self.torn_down = true;
    }
}
