//! Tracker core: job data model and the pure apply/completion state machine.
mod candidate;
mod effect;
mod msg;
mod state;
mod update;

pub use candidate::{
    ApplicationStatus, ConfirmationStyle, JobCandidate, SubmitMessage, UNKNOWN_COMPANY,
    UNKNOWN_TITLE,
};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{CompletionPhase, PageState};
pub use update::{acknowledgment_text, confirmation_question, update};
