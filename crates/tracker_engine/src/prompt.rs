/// Explicit yes/no question put to the user on synchronous-confirmation hosts.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Answers every question the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl ConfirmPrompt for FixedAnswer {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}
