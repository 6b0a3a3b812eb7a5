use crate::{ConfirmationStyle, JobCandidate};

/// Lifecycle of the completion detector within one page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPhase {
    /// Not armed: before load, or on hosts that do not confirm asynchronously.
    #[default]
    Disarmed,
    Watching,
    /// Terminal. `resolved` flips once the candidate has been finalized.
    Fired { resolved: bool },
}

/// Per-page-load state. A navigation discards it; only the pending slot survives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageState {
    style: Option<ConfirmationStyle>,
    success_signals: Vec<String>,
    completion: CompletionPhase,
    apply_fired: bool,
    awaiting_confirmation: Option<JobCandidate>,
    finalized: usize,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self) -> Option<ConfirmationStyle> {
        self.style
    }

    pub fn completion(&self) -> CompletionPhase {
        self.completion
    }

    pub fn apply_fired(&self) -> bool {
        self.apply_fired
    }

    /// Candidate held while the user is asked to confirm tracking.
    pub fn awaiting_confirmation(&self) -> Option<&JobCandidate> {
        self.awaiting_confirmation.as_ref()
    }

    /// Number of `Finalize` effects emitted during this page load.
    pub fn finalized_count(&self) -> usize {
        self.finalized
    }

    pub(crate) fn arm(&mut self, style: Option<ConfirmationStyle>, success_signals: Vec<String>) {
        self.style = style;
        self.success_signals = success_signals;
        self.completion = match style {
            Some(ConfirmationStyle::Asynchronous) => CompletionPhase::Watching,
            _ => CompletionPhase::Disarmed,
        };
    }

    pub(crate) fn is_success_signal(&self, text: &str) -> bool {
        self.success_signals.iter().any(|signal| signal == text)
    }

    pub(crate) fn set_completion(&mut self, phase: CompletionPhase) {
        self.completion = phase;
    }

    pub(crate) fn mark_apply_fired(&mut self) {
        self.apply_fired = true;
    }

    pub(crate) fn hold_for_confirmation(&mut self, candidate: JobCandidate) {
        self.awaiting_confirmation = Some(candidate);
    }

    pub(crate) fn take_awaiting(&mut self) -> Option<JobCandidate> {
        self.awaiting_confirmation.take()
    }

    pub(crate) fn record_finalize(&mut self) {
        self.finalized += 1;
    }
}
