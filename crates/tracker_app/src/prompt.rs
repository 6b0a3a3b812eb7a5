use dialoguer::Confirm;
use tracker_engine::ConfirmPrompt;
use tracker_logging::tracker_warn;

/// Interactive y/N question on the terminal. Defaults to "no".
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn confirm(&self, question: &str) -> bool {
        let answer = Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact();
        accepted(answer)
    }
}

// A prompt that cannot be shown (no terminal, closed input) declines.
fn accepted(answer: Result<bool, dialoguer::Error>) -> bool {
    answer.unwrap_or_else(|err| {
        tracker_warn!("Could not read prompt answer: {}", err);
        false
    })
}
