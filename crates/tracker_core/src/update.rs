use crate::{
    CompletionPhase, ConfirmationStyle, Effect, JobCandidate, Msg, PageState, SubmitMessage,
};

/// Pure update function: applies a message to the page state and returns any effects.
pub fn update(mut state: PageState, msg: Msg) -> (PageState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded {
            style,
            success_signals,
            anchor_text,
            apply_intent_pending,
        } => {
            state.arm(style, success_signals);
            // Direct arrival on a detail page: park what we see in case the
            // apply happens through a control we never get to observe. Apply
            // forms and confirmation pages reached after a real apply-intent
            // must not replace the record that intent wrote.
            let is_detail_page = anchor_text
                .as_deref()
                .map(str::trim)
                .is_some_and(|text| !state.is_success_signal(text));
            if style == Some(ConfirmationStyle::Asynchronous)
                && is_detail_page
                && !apply_intent_pending
            {
                vec![Effect::CaptureDetailPage]
            } else {
                Vec::new()
            }
        }
        Msg::ApplyIntent { candidate } => match state.style() {
            Some(ConfirmationStyle::Asynchronous) => {
                state.mark_apply_fired();
                vec![Effect::StorePending(candidate)]
            }
            Some(ConfirmationStyle::Synchronous) => {
                state.mark_apply_fired();
                let question = confirmation_question(&candidate);
                state.hold_for_confirmation(candidate);
                vec![Effect::PromptConfirmation { question }]
            }
            None => Vec::new(),
        },
        Msg::ConfirmationAnswered { accepted } => match state.take_awaiting() {
            Some(candidate) if accepted => finalize(&mut state, candidate),
            _ => Vec::new(),
        },
        Msg::PageChanged { anchor_text } => {
            let matched = state.completion() == CompletionPhase::Watching
                && anchor_text
                    .as_deref()
                    .map(str::trim)
                    .is_some_and(|text| state.is_success_signal(text));
            if matched {
                state.set_completion(CompletionPhase::Fired { resolved: false });
                vec![Effect::DisconnectCompletionWatcher, Effect::ResolveCandidate]
            } else {
                Vec::new()
            }
        }
        Msg::CandidateResolved { candidate } => {
            if state.completion() == (CompletionPhase::Fired { resolved: false }) {
                state.set_completion(CompletionPhase::Fired { resolved: true });
                finalize(&mut state, candidate)
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn finalize(state: &mut PageState, candidate: JobCandidate) -> Vec<Effect> {
    state.record_finalize();
    let message = acknowledgment_text(&candidate);
    vec![
        Effect::Finalize(SubmitMessage::JobSubmitted { job: candidate }),
        Effect::ShowAcknowledgment { message },
    ]
}

/// Question shown on synchronous-confirmation hosts.
pub fn confirmation_question(candidate: &JobCandidate) -> String {
    format!(
        "Track this application? {} at {}",
        candidate.title, candidate.company
    )
}

pub fn acknowledgment_text(candidate: &JobCandidate) -> String {
    format!("✅ Saved \"{}\" at {}", candidate.title, candidate.company)
}
