use crate::{JobCandidate, SubmitMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Overwrite the pending slot with this candidate.
    StorePending(JobCandidate),
    /// Extract the current page and overwrite the pending slot with it.
    CaptureDetailPage,
    /// Ask the user whether to track the held candidate.
    PromptConfirmation { question: String },
    /// Stop delivering page changes to the completion detector.
    DisconnectCompletionWatcher,
    /// Consume the pending slot, or extract the current page if it is empty.
    ResolveCandidate,
    /// Hand the record to the external sink. Fire-and-forget.
    Finalize(SubmitMessage),
    /// Show a transient acknowledgment on the page.
    ShowAcknowledgment { message: String },
}
