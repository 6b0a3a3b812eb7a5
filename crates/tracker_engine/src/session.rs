use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracker_core::{update, ConfirmationStyle, Effect, Msg, PageState};
use tracker_logging::{set_page_load, tracker_debug, tracker_info};

use crate::ack::Acknowledger;
use crate::extract::{Extractor, FieldExtractor};
use crate::hosts::{HostProfile, HostRegistry};
use crate::intent::find_apply_control;
use crate::page::{rendered_text, PageContext};
use crate::prompt::ConfirmPrompt;
use crate::sink::FinalizeSink;
use crate::store::{KeyValueStore, PendingOrigin, PendingRecordStore};

static PAGE_LOADS: AtomicU64 = AtomicU64::new(0);

/// Collaborators that outlive a single page load.
#[derive(Clone)]
pub struct SessionDeps {
    pub registry: Arc<HostRegistry>,
    pub store: Arc<dyn KeyValueStore>,
    pub sink: Arc<dyn FinalizeSink>,
    pub prompt: Arc<dyn ConfirmPrompt>,
    pub acknowledger: Arc<dyn Acknowledger>,
}

/// Everything that lives for one page load: the document, the core state and
/// the wiring of click and page-change notifications into it. A navigation
/// drops the session; only the store carries over to the next one.
pub struct PageSession {
    page: PageContext,
    profile: Option<HostProfile>,
    state: PageState,
    extractor: FieldExtractor,
    pending: PendingRecordStore,
    deps: SessionDeps,
    completion_connected: bool,
    completion_notifications: usize,
}

impl PageSession {
    pub fn load(page: PageContext, deps: SessionDeps) -> Self {
        set_page_load(PAGE_LOADS.fetch_add(1, Ordering::Relaxed) + 1);
        let profile = deps.registry.lookup(page.host()).cloned();
        let style = profile.as_ref().map(|p| p.confirmation);
        tracker_info!(
            "Page loaded host={} profile={:?}",
            page.host(),
            profile.as_ref().map(|p| p.key.as_str())
        );

        let anchor_text = profile.as_ref().and_then(|p| read_anchor(&page, p));
        let success_signals = profile
            .as_ref()
            .map(|p| p.success_signals.clone())
            .unwrap_or_default();

        let pending = PendingRecordStore::new(Arc::clone(&deps.store));
        let apply_intent_pending = pending.peek_origin() == Some(PendingOrigin::ApplyIntent);

        let mut session = Self {
            page,
            profile,
            state: PageState::new(),
            extractor: FieldExtractor::new(Arc::clone(&deps.registry)),
            pending,
            completion_connected: style == Some(ConfirmationStyle::Asynchronous),
            completion_notifications: 0,
            deps,
        };
        session.dispatch(Msg::PageLoaded {
            style,
            success_signals,
            anchor_text,
            apply_intent_pending,
        });
        session
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn completion_watcher_connected(&self) -> bool {
        self.completion_connected
    }

    /// Page-change notifications delivered to the completion detector so far.
    pub fn completion_notifications(&self) -> usize {
        self.completion_notifications
    }

    /// Capturing-phase click on the first element matching `selector`.
    /// Returns whether it was recognized as an apply-intent.
    pub fn click(&mut self, selector: &str) -> bool {
        let Some(profile) = self.profile.as_ref() else {
            tracker_debug!("No apply wiring on unrecognized host {}", self.page.host());
            return false;
        };
        let matched = self
            .page
            .select_first(selector)
            .and_then(|target| find_apply_control(target, profile))
            .is_some();
        if !matched {
            return false;
        }

        // Extract now: the default action may navigate away.
        let candidate = self.extractor.extract(&self.page);
        tracker_info!(
            "Apply intent: {:?} at {:?}",
            candidate.title,
            candidate.company
        );
        self.dispatch(Msg::ApplyIntent { candidate });
        true
    }

    /// The page content changed in place.
    pub fn page_changed(&mut self, html: &str) {
        self.page.replace_content(html);
        if !self.completion_connected {
            return;
        }
        self.completion_notifications += 1;
        let anchor_text = self
            .profile
            .as_ref()
            .and_then(|p| read_anchor(&self.page, p));
        self.dispatch(Msg::PageChanged { anchor_text });
    }

    fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(follow_up) = self.run_effect(effect) {
                    inbox.push_back(follow_up);
                }
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::StorePending(candidate) => {
                tracker_info!("Pending job saved on apply: {:?}", candidate.title);
                self.pending.set(&candidate);
                None
            }
            Effect::CaptureDetailPage => {
                let candidate = self.extractor.extract(&self.page);
                tracker_info!("Pending job saved on load: {:?}", candidate.title);
                self.pending.set_with_origin(&candidate, PendingOrigin::PageLoad);
                None
            }
            Effect::PromptConfirmation { question } => {
                let accepted = self.deps.prompt.confirm(&question);
                Some(Msg::ConfirmationAnswered { accepted })
            }
            Effect::DisconnectCompletionWatcher => {
                tracker_info!("Confirmation detected; completion watcher disconnected");
                self.completion_connected = false;
                None
            }
            Effect::ResolveCandidate => {
                let candidate = match self.pending.take() {
                    Some(candidate) => {
                        tracker_debug!("Resolved from pending slot: {:?}", candidate.title);
                        candidate
                    }
                    None => {
                        let candidate = self.extractor.extract(&self.page);
                        tracker_debug!(
                            "Slot empty; resolved from current page: {:?}",
                            candidate.title
                        );
                        candidate
                    }
                };
                Some(Msg::CandidateResolved { candidate })
            }
            Effect::Finalize(message) => {
                tracker_info!("Finalizing {:?}", message.job().title);
                self.deps.sink.send(message);
                None
            }
            Effect::ShowAcknowledgment { message } => {
                self.deps.acknowledger.show(&message);
                None
            }
        }
    }
}

fn read_anchor(page: &PageContext, profile: &HostProfile) -> Option<String> {
    page.select_first(&profile.anchor)
        .map(|anchor| rendered_text(anchor).trim().to_string())
}
