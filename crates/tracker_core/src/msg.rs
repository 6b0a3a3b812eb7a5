use crate::{ConfirmationStyle, JobCandidate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A new page load started. `style` is `None` for unrecognized hosts.
    PageLoaded {
        style: Option<ConfirmationStyle>,
        success_signals: Vec<String>,
        /// Trimmed text of the host anchor, if the page has one.
        anchor_text: Option<String>,
        /// The pending slot already holds a record from an apply-intent on an
        /// earlier page.
        apply_intent_pending: bool,
    },
    /// The user clicked an apply-like control; the candidate was extracted
    /// before the default action ran.
    ApplyIntent { candidate: JobCandidate },
    /// The user answered the "track this application?" prompt.
    ConfirmationAnswered { accepted: bool },
    /// Page content changed; carries the trimmed text of the host anchor, if present.
    PageChanged { anchor_text: Option<String> },
    /// The runtime produced the candidate for a fired completion.
    CandidateResolved { candidate: JobCandidate },
    /// Fallback for placeholder wiring.
    NoOp,
}
