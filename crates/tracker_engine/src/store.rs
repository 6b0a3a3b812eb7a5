use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracker_core::JobCandidate;
use tracker_logging::{tracker_debug, tracker_warn};

/// Slot holding the not-yet-confirmed candidate. Owned by this crate.
pub const PENDING_JOB_KEY: &str = "pendingJob";
/// Finalized records. Owned by the UI; read-only here.
pub const JOBS_KEY: &str = "jobs";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store directory missing or not writable: {0}")]
    Directory(String),
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent key-value storage that outlives a page load.
///
/// Writes are fire-and-forget: implementations log failures and carry on, so a
/// failed `set` simply shows up as an absent value on the next `get`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    fn remove(&self, key: &str);
}

/// Process-local store; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.entries().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}

/// One `<key>.json` file per key. Writes go to a temp file that is renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        prepare_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn try_get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn try_set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let target = self.path_for(key)?;
        let content = serde_json::to_string(value)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn try_remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

fn prepare_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::Directory(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::Directory(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StoreError::Directory(e.to_string()))?;
    }
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.try_get(key).unwrap_or_else(|err| {
            tracker_warn!("Store read of {:?} failed: {}", key, err);
            None
        })
    }

    fn set(&self, key: &str, value: Value) {
        if let Err(err) = self.try_set(key, &value) {
            tracker_warn!("Store write of {:?} failed: {}", key, err);
        }
    }

    fn remove(&self, key: &str) {
        if let Err(err) = self.try_remove(key) {
            tracker_warn!("Store removal of {:?} failed: {}", key, err);
        }
    }
}

/// How a record got into the pending slot.
///
/// Records written without a marker are treated as real apply-intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOrigin {
    /// Written when the user clicked an apply control.
    #[default]
    ApplyIntent,
    /// Speculatively captured when a detail page loaded.
    PageLoad,
}

#[derive(Serialize, Deserialize)]
struct PendingRecord {
    #[serde(flatten)]
    job: JobCandidate,
    #[serde(default, rename = "capturedOn")]
    origin: PendingOrigin,
}

/// The single cross-navigation slot for a candidate awaiting confirmation.
///
/// A record whose confirmation never arrives stays here until the next
/// apply-intent silently overwrites it.
#[derive(Clone)]
pub struct PendingRecordStore {
    store: Arc<dyn KeyValueStore>,
}

impl PendingRecordStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stores the candidate of an apply-intent.
    pub fn set(&self, candidate: &JobCandidate) {
        self.set_with_origin(candidate, PendingOrigin::ApplyIntent);
    }

    pub fn set_with_origin(&self, candidate: &JobCandidate, origin: PendingOrigin) {
        let record = PendingRecord {
            job: candidate.clone(),
            origin,
        };
        match serde_json::to_value(&record) {
            Ok(value) => self.store.set(PENDING_JOB_KEY, value),
            Err(err) => tracker_warn!("Could not serialize pending job: {}", err),
        }
    }

    /// Reads and clears the slot.
    pub fn take(&self) -> Option<JobCandidate> {
        let value = self.store.get(PENDING_JOB_KEY);
        if value.is_some() {
            self.store.remove(PENDING_JOB_KEY);
        }
        value.and_then(decode_pending).map(|record| record.job)
    }

    pub fn peek(&self) -> Option<JobCandidate> {
        self.peek_record().map(|record| record.job)
    }

    /// Origin of the record currently in the slot, if any.
    pub fn peek_origin(&self) -> Option<PendingOrigin> {
        self.peek_record().map(|record| record.origin)
    }

    fn peek_record(&self) -> Option<PendingRecord> {
        self.store.get(PENDING_JOB_KEY).and_then(decode_pending)
    }
}

fn decode_pending(value: Value) -> Option<PendingRecord> {
    serde_json::from_value::<PendingRecord>(value)
        .map_err(|err| tracker_debug!("Ignoring malformed pending job: {}", err))
        .ok()
        .map(|record| PendingRecord {
            job: revalidate(record.job),
            origin: record.origin,
        })
}

fn decode_candidate(value: Value) -> Option<JobCandidate> {
    serde_json::from_value(value)
        .map_err(|err| tracker_debug!("Ignoring malformed stored job: {}", err))
        .ok()
        .map(revalidate)
}

// Stored values may come from anywhere; blank fields get the sentinels again.
fn revalidate(job: JobCandidate) -> JobCandidate {
    let status = job.status;
    JobCandidate {
        status,
        ..JobCandidate::new(job.title, job.company, job.source, job.url)
    }
}

/// Read-only access to the finalized records kept by the UI.
#[derive(Clone)]
pub struct JobsView {
    store: Arc<dyn KeyValueStore>,
}

impl JobsView {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Finalized records, newest first as stored. Malformed entries are skipped.
    pub fn jobs(&self) -> Vec<JobCandidate> {
        match self.store.get(JOBS_KEY) {
            Some(Value::Array(items)) => items.into_iter().filter_map(decode_candidate).collect(),
            _ => Vec::new(),
        }
    }
}
