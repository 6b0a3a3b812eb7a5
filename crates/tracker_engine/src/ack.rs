use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracker_logging::{tracker_debug, tracker_info};

pub const DEFAULT_ACK_DURATION: Duration = Duration::from_secs(6);

/// Local, transient acknowledgment shown on the page after a finalize.
pub trait Acknowledger: Send + Sync {
    fn show(&self, message: &str);
}

/// Keeps at most one message visible and removes it after a fixed duration.
/// Removal is scheduled on show and cannot be cancelled.
#[derive(Debug, Clone)]
pub struct TimedOverlay {
    visible: Arc<Mutex<Option<String>>>,
    duration: Duration,
}

impl TimedOverlay {
    pub fn new(duration: Duration) -> Self {
        Self {
            visible: Arc::new(Mutex::new(None)),
            duration,
        }
    }

    pub fn visible(&self) -> Option<String> {
        self.visible
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for TimedOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_ACK_DURATION)
    }
}

impl Acknowledger for TimedOverlay {
    fn show(&self, message: &str) {
        {
            let mut visible = self
                .visible
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if visible.is_some() {
                tracker_debug!("Acknowledgment already visible; skipping {:?}", message);
                return;
            }
            *visible = Some(message.to_string());
        }
        tracker_info!("{}", message);

        let visible = Arc::clone(&self.visible);
        let duration = self.duration;
        thread::spawn(move || {
            thread::sleep(duration);
            *visible.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        });
    }
}
