use std::io::Write;
use std::sync::{mpsc, Mutex};

use tracker_core::SubmitMessage;
use tracker_logging::{tracker_debug, tracker_warn};

/// Receives finalized records. Delivery is best-effort: no acknowledgment, no retry.
pub trait FinalizeSink: Send + Sync {
    fn send(&self, message: SubmitMessage);
}

pub struct ChannelSink {
    tx: mpsc::Sender<SubmitMessage>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<SubmitMessage>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::Receiver<SubmitMessage>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }
}

impl FinalizeSink for ChannelSink {
    fn send(&self, message: SubmitMessage) {
        if self.tx.send(message).is_err() {
            tracker_debug!("Finalize receiver is gone; message dropped");
        }
    }
}

/// Writes each message as one JSON object per line.
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> FinalizeSink for JsonLinesSink<W> {
    fn send(&self, message: SubmitMessage) {
        let line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(err) => {
                tracker_warn!("Could not serialize finalize message: {}", err);
                return;
            }
        };
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = writeln!(writer, "{line}").and_then(|_| writer.flush()) {
            tracker_warn!("Finalize message was not written: {}", err);
        }
    }
}
