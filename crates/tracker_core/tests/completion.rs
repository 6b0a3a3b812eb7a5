use std::sync::Once;

use pretty_assertions::assert_eq;
use tracker_core::{
    update, CompletionPhase, ConfirmationStyle, Effect, JobCandidate, Msg, PageState,
    SubmitMessage,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tracker_logging::initialize_for_tests);
}

fn watching() -> PageState {
    let (state, _) = update(
        PageState::new(),
        Msg::PageLoaded {
            style: Some(ConfirmationStyle::Asynchronous),
            success_signals: vec![
                "Your application has been submitted!".to_string(),
                "Application submitted".to_string(),
            ],
            anchor_text: None,
            apply_intent_pending: false,
        },
    );
    state
}

fn changed(state: PageState, text: &str) -> (PageState, Vec<Effect>) {
    update(
        state,
        Msg::PageChanged {
            anchor_text: Some(text.to_string()),
        },
    )
}

fn candidate() -> JobCandidate {
    JobCandidate::new("Welder", "Forge Ltd", "uk.indeed.com", "https://uk.indeed.com/x")
}

#[test]
fn success_phrase_fires_disconnect_then_resolve() {
    init_logging();
    let (state, effects) = changed(watching(), "  Application submitted \n");

    assert_eq!(
        effects,
        vec![Effect::DisconnectCompletionWatcher, Effect::ResolveCandidate]
    );
    assert_eq!(state.completion(), CompletionPhase::Fired { resolved: false });

    let (state, effects) = update(
        state,
        Msg::CandidateResolved {
            candidate: candidate(),
        },
    );
    assert_eq!(
        effects[0],
        Effect::Finalize(SubmitMessage::JobSubmitted { job: candidate() })
    );
    assert!(matches!(effects[1], Effect::ShowAcknowledgment { .. }));
    assert_eq!(state.completion(), CompletionPhase::Fired { resolved: true });
}

#[test]
fn repeated_matching_changes_finalize_exactly_once() {
    init_logging();
    let mut state = watching();
    let mut finalize_count = 0;

    for _ in 0..25 {
        let (next, effects) = changed(state, "Application submitted");
        state = next;
        for effect in effects {
            if effect == Effect::ResolveCandidate {
                let (next, resolved) = update(
                    state,
                    Msg::CandidateResolved {
                        candidate: candidate(),
                    },
                );
                state = next;
                finalize_count += resolved
                    .iter()
                    .filter(|e| matches!(e, Effect::Finalize(_)))
                    .count();
            }
        }
    }

    assert_eq!(finalize_count, 1);
    assert_eq!(state.finalized_count(), 1);
}

#[test]
fn late_resolution_after_finalize_is_ignored() {
    init_logging();
    let (state, _) = changed(watching(), "Application submitted");
    let resolved = Msg::CandidateResolved {
        candidate: candidate(),
    };
    let (state, first) = update(state, resolved.clone());
    let (state, second) = update(state, resolved);

    assert_eq!(first.len(), 2);
    assert!(second.is_empty());
    assert_eq!(state.finalized_count(), 1);
}

#[test]
fn match_is_exact_and_case_sensitive() {
    init_logging();
    for near in [
        "application submitted",
        "Application submitted.",
        "Application submitted successfully",
        "APPLICATION SUBMITTED",
        "",
    ] {
        let (state, effects) = changed(watching(), near);
        assert!(effects.is_empty(), "fired on {near:?}");
        assert_eq!(state.completion(), CompletionPhase::Watching);
    }

    let (state, effects) = update(watching(), Msg::PageChanged { anchor_text: None });
    assert!(effects.is_empty());
    assert_eq!(state.completion(), CompletionPhase::Watching);
}

#[test]
fn completion_is_not_armed_on_sync_or_unknown_hosts() {
    init_logging();
    for style in [Some(ConfirmationStyle::Synchronous), None] {
        let (state, _) = update(
            PageState::new(),
            Msg::PageLoaded {
                style,
                success_signals: vec!["Application submitted".to_string()],
                anchor_text: None,
            apply_intent_pending: false,
            },
        );
        let (state, effects) = changed(state, "Application submitted");
        assert!(effects.is_empty());
        assert_eq!(state.completion(), CompletionPhase::Disarmed);
    }
}

#[test]
fn resolution_without_fire_is_ignored() {
    init_logging();
    let (state, effects) = update(
        watching(),
        Msg::CandidateResolved {
            candidate: candidate(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.finalized_count(), 0);
}

#[test]
fn noop_leaves_a_fired_detector_untouched() {
    init_logging();
    let (fired, _) = changed(watching(), "Application submitted");

    let (next, effects) = update(fired.clone(), Msg::NoOp);
    assert_eq!(next, fired);
    assert!(effects.is_empty());

    // The pending resolution still goes through after the no-op.
    let (next, effects) = update(
        next,
        Msg::CandidateResolved {
            candidate: candidate(),
        },
    );
    assert_eq!(effects.len(), 2);
    assert_eq!(next.finalized_count(), 1);
}
