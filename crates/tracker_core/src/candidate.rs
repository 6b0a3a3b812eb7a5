use serde::{Deserialize, Serialize};

/// Title used when no extraction strategy produced a usable value.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Company used when no extraction strategy produced a usable value.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Applied,
}

/// How a host confirms that an application went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStyle {
    /// Ask the user on click and finalize immediately.
    Synchronous,
    /// Park the candidate and wait for a success phrase, possibly on a later page.
    Asynchronous,
}

/// A job extracted from a posting page. Title and company are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCandidate {
    pub title: String,
    pub company: String,
    pub source: String,
    pub url: String,
    #[serde(default)]
    pub status: ApplicationStatus,
}

impl JobCandidate {
    /// Builds a candidate, substituting the sentinels for blank title or company.
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        source: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: non_blank_or(title.into(), UNKNOWN_TITLE),
            company: non_blank_or(company.into(), UNKNOWN_COMPANY),
            source: source.into(),
            url: url.into(),
            status: ApplicationStatus::Applied,
        }
    }
}

fn non_blank_or(value: String, sentinel: &str) -> String {
    if value.trim().is_empty() {
        sentinel.to_string()
    } else {
        value
    }
}

/// Outbound message handed to the finalization sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SubmitMessage {
    #[serde(rename = "JOB_SUBMITTED")]
    JobSubmitted { job: JobCandidate },
}

impl SubmitMessage {
    pub fn job(&self) -> &JobCandidate {
        match self {
            SubmitMessage::JobSubmitted { job } => job,
        }
    }
}
