//! Tracker engine: page model, field extraction, storage and the per-page session runtime.
mod ack;
mod decode;
mod extract;
mod hosts;
mod intent;
mod page;
mod prompt;
mod session;
mod sink;
mod store;
mod structured;
mod text;

pub use ack::{Acknowledger, TimedOverlay, DEFAULT_ACK_DURATION};
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use extract::{Extractor, FieldExtractor};
pub use hosts::{CompositeOrder, CompositeRule, HostProfile, HostRegistry};
pub use intent::{find_apply_control, is_apply_text};
pub use page::{is_rendered, rendered_text, PageContext, PageError};
pub use prompt::{ConfirmPrompt, FixedAnswer};
pub use session::{PageSession, SessionDeps};
pub use sink::{ChannelSink, FinalizeSink, JsonLinesSink};
pub use store::{
    FileStore, JobsView, KeyValueStore, MemoryStore, PendingOrigin, PendingRecordStore,
    StoreError, JOBS_KEY, PENDING_JOB_KEY,
};
pub use structured::{find_job_posting, StructuredJob};
pub use text::{
    clean_company, clean_title, looks_like_style_rule, normalize_whitespace, passes_field_checks,
    FIELD_LENGTH_LIMIT,
};
