use std::sync::mpsc::Receiver;
use std::sync::{Arc, Once};
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tracker_core::{CompletionPhase, JobCandidate, SubmitMessage};
use tracker_engine::{
    Acknowledger, ChannelSink, FixedAnswer, HostRegistry, KeyValueStore, MemoryStore,
    PageContext, PageSession, PendingRecordStore, SessionDeps, TimedOverlay,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tracker_logging::initialize_for_tests);
}

struct Harness {
    store: MemoryStore,
    deps: SessionDeps,
    rx: Receiver<SubmitMessage>,
    overlay: TimedOverlay,
}

fn harness(answer: bool) -> Harness {
    init_logging();
    let store = MemoryStore::new();
    let (sink, rx) = ChannelSink::channel();
    let overlay = TimedOverlay::new(Duration::from_secs(60));
    let deps = SessionDeps {
        registry: Arc::new(HostRegistry::builtin()),
        store: Arc::new(store.clone()),
        sink: Arc::new(sink),
        prompt: Arc::new(FixedAnswer(answer)),
        acknowledger: Arc::new(overlay.clone()),
    };
    Harness {
        store,
        deps,
        rx,
        overlay,
    }
}

impl Harness {
    fn open(&self, url: &str, html: &str) -> PageSession {
        PageSession::load(PageContext::parse(url, html).unwrap(), self.deps.clone())
    }

    fn pending(&self) -> Option<JobCandidate> {
        PendingRecordStore::new(Arc::new(self.store.clone())).peek()
    }

    fn finalized(&self) -> Vec<JobCandidate> {
        self.rx.try_iter().map(|m| m.job().clone()).collect()
    }
}

const DETAIL: &str = r#"<html><body>
    <h1 class="jobsearch-JobInfoHeader-title">Senior Engineer - job post</h1>
    <div data-testid="jobsearch-CompanyInfoContainer"><a href="/cmp/acme">Acme Corp</a><div>4.3 stars</div></div>
    <div id="applyButtonLinkContainer"><button id="apply"><span id="label">Apply now</span></button></div>
    <button id="save">Save</button>
  </body></html>"#;

const FORM: &str = r#"<html><body><main id="ia">Review your application</main></body></html>"#;
const CONFIRMED: &str =
    r#"<html><body><main><h1> Your application has been submitted! </h1></main></body></html>"#;

#[test]
fn apply_then_confirmation_after_navigation_finalizes_once() {
    let h = harness(true);

    let mut detail = h.open("https://www.indeed.com/viewjob?jk=7", DETAIL);
    assert!(!detail.click("#save"));
    assert!(detail.click("#label"));
    assert!(detail.state().apply_fired());
    let parked = h.pending().expect("pending after apply");
    assert_eq!(parked.title, "Senior Engineer");
    assert_eq!(parked.company, "Acme Corp");
    drop(detail);

    let mut form = h.open("https://smartapply.indeed.com/beta/indeedapply/form", FORM);
    for _ in 0..10 {
        form.page_changed(CONFIRMED);
    }

    assert_eq!(form.state().completion(), CompletionPhase::Fired { resolved: true });
    assert!(!form.completion_watcher_connected());
    assert_eq!(form.completion_notifications(), 1);
    assert_eq!(h.finalized(), vec![parked]);
    assert_eq!(h.pending(), None);
    assert_eq!(
        h.overlay.visible().as_deref(),
        Some("✅ Saved \"Senior Engineer\" at Acme Corp")
    );
}

const HEADED_FORM: &str =
    r#"<html><body><main><h1>Review your application</h1><form></form></main></body></html>"#;

#[test]
fn apply_record_survives_pages_with_their_own_heading() {
    let h = harness(true);

    let mut detail = h.open("https://www.indeed.com/viewjob?jk=9", DETAIL);
    assert!(detail.click("#label"));
    drop(detail);

    let mut form = h.open("https://smartapply.indeed.com/beta/indeedapply/form", HEADED_FORM);
    assert_eq!(h.pending().unwrap().title, "Senior Engineer");
    form.page_changed(CONFIRMED);

    let jobs = h.finalized();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "Senior Engineer");
    assert_eq!(jobs[0].company, "Acme Corp");
    assert_eq!(jobs[0].source, "www.indeed.com");
}

#[test]
fn full_navigation_to_confirmation_page_keeps_apply_record() {
    let h = harness(true);

    let mut detail = h.open("https://www.indeed.com/viewjob?jk=10", DETAIL);
    assert!(detail.click("#label"));
    drop(detail);

    let mut done = h.open("https://smartapply.indeed.com/beta/indeedapply/done", CONFIRMED);
    assert_eq!(h.pending().unwrap().title, "Senior Engineer");
    done.page_changed(CONFIRMED);

    assert_eq!(h.finalized()[0].title, "Senior Engineer");
}

#[test]
fn deep_link_confirmation_page_is_not_captured() {
    let h = harness(true);
    let _done = h.open("https://www.indeed.com/applied", CONFIRMED);
    assert_eq!(h.pending(), None);
}

#[test]
fn load_capture_is_replaced_by_the_next_detail_page() {
    let h = harness(true);
    drop(h.open("https://www.indeed.com/viewjob?jk=11", DETAIL));
    assert_eq!(h.pending().unwrap().title, "Senior Engineer");

    let _other = h.open(
        "https://www.indeed.com/viewjob?jk=12",
        r#"<body><h1 class="jobsearch-JobInfoHeader-title">Line Cook</h1></body>"#,
    );
    assert_eq!(h.pending().unwrap().title, "Line Cook");
}

#[test]
fn detail_page_is_captured_on_load() {
    let h = harness(true);
    let _detail = h.open("https://uk.indeed.com/viewjob?jk=8", DETAIL);

    let pending = h.pending().expect("captured on load");
    assert_eq!(pending.title, "Senior Engineer");
    assert_eq!(pending.source, "uk.indeed.com");
}

#[test]
fn deep_link_confirmation_falls_back_to_current_page() {
    let h = harness(true);
    let mut page = h.open("https://www.indeed.com/applied", "<html><body><p>Loading</p></body></html>");
    assert_eq!(h.pending(), None);

    page.page_changed(
        r#"<html><head><script type="application/ld+json">
            {"@type": "JobPosting", "title": "Forklift Operator", "hiringOrganization": {"name": "Depot"}}
           </script></head><body><h1>Application submitted</h1></body></html>"#,
    );

    let jobs = h.finalized();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "Forklift Operator");
    assert_eq!(jobs[0].company, "Depot");
    assert_eq!(jobs[0].url, "https://www.indeed.com/applied");
}

#[test]
fn near_miss_phrases_do_not_fire() {
    let h = harness(true);
    let mut page = h.open("https://www.indeed.com/applied", FORM);

    page.page_changed("<body><h1>application submitted</h1></body>");
    page.page_changed("<body><h1>Application submitted successfully</h1></body>");
    page.page_changed("<body><h2>Application submitted</h2></body>");

    assert_eq!(page.state().completion(), CompletionPhase::Watching);
    assert!(page.completion_watcher_connected());
    assert_eq!(page.completion_notifications(), 3);
    assert!(h.finalized().is_empty());
}

#[test]
fn synchronous_host_finalizes_on_accepted_prompt() {
    let h = harness(true);
    let mut page = h.open(
        "https://www.linkedin.com/jobs/view/99",
        r#"<body>
            <div class="jobs-unified-top-card__job-title">Product Designer</div>
            <div class="jobs-unified-top-card__company-name">Hooli · 1,200 followers</div>
            <button class="jobs-apply-button" id="easy"><span>Easy Apply</span></button>
          </body>"#,
    );

    assert!(page.click("#easy"));
    let jobs = h.finalized();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "Product Designer");
    assert_eq!(jobs[0].company, "Hooli");
    assert_eq!(h.pending(), None);
    assert_eq!(page.state().completion(), CompletionPhase::Disarmed);
}

#[test]
fn synchronous_host_refusal_sends_nothing() {
    let h = harness(false);
    let mut page = h.open(
        "https://www.linkedin.com/jobs/view/99",
        r#"<body><h1>Designer</h1><button id="easy">Easy Apply</button></body>"#,
    );

    assert!(page.click("#easy"));
    assert!(h.finalized().is_empty());
    assert!(h.overlay.visible().is_none());
}

#[test]
fn unknown_host_has_no_apply_or_completion_wiring() {
    let h = harness(true);
    let mut page = h.open(
        "https://careers.example.org/job/1",
        r#"<body><h1>Gardener</h1><button id="apply">Apply now</button></body>"#,
    );

    assert!(!page.click("#apply"));
    page.page_changed("<body><h1>Application submitted</h1></body>");

    assert_eq!(page.completion_notifications(), 0);
    assert_eq!(h.pending(), None);
    assert!(h.finalized().is_empty());
}

#[test]
fn abandoned_pending_is_silently_overwritten() {
    let h = harness(true);
    let mut first = h.open(
        "https://www.indeed.com/viewjob?jk=1",
        r#"<body><a href="/cmp/one">One Inc</a><button id="a">Apply now</button></body>"#,
    );
    first.click("#a");
    assert_eq!(h.pending().unwrap().company, "One Inc");
    drop(first);

    let mut second = h.open(
        "https://www.indeed.com/viewjob?jk=2",
        r#"<body><a href="/cmp/two">Two LLC</a><button id="a">Apply now</button></body>"#,
    );
    second.click("#a");
    assert_eq!(h.pending().unwrap().company, "Two LLC");
}

#[test]
fn finalize_is_fire_and_forget() {
    let h = harness(true);
    let Harness { store, deps, rx, .. } = h;
    drop(rx);

    let mut page = PageSession::load(
        PageContext::parse("https://www.indeed.com/form", FORM).unwrap(),
        deps,
    );
    page.page_changed(CONFIRMED);
    page.page_changed(CONFIRMED);

    assert_eq!(page.state().finalized_count(), 1);
    assert_eq!(store.get(tracker_engine::PENDING_JOB_KEY), None);
}

#[test]
fn overlay_removes_itself_after_duration() {
    init_logging();
    let overlay = TimedOverlay::new(Duration::from_millis(50));

    overlay.show("first");
    overlay.show("second");
    assert_eq!(overlay.visible().as_deref(), Some("first"));

    thread::sleep(Duration::from_millis(500));
    assert_eq!(overlay.visible(), None);

    overlay.show("third");
    assert_eq!(overlay.visible().as_deref(), Some("third"));
}
