use std::sync::{Arc, Mutex};

use filemirror::engine::{MirrorEvent, Reporter};

/// A reporter that records every event so tests can assert on them.
///
/// Clones share the same event log.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<MirrorEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far.
    pub fn events(&self) -> Vec<MirrorEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Drain the log, returning what was recorded.
    pub fn take(&self) -> Vec<MirrorEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn count(&self, pred: impl Fn(&MirrorEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }

    pub fn copies(&self) -> usize {
        self.count(|e| matches!(e, MirrorEvent::FileCopied { .. }))
    }

    pub fn deletions(&self) -> usize {
        self.count(|e| matches!(e, MirrorEvent::FileDeleted { .. }))
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: MirrorEvent) {
        self.events.lock().unwrap().push(event);
    }
}
