//! Unread-message tracking.

/// Count of messages that arrived while the timeline was not being viewed.
///
/// Created when the chat panel mounts, dropped when it unmounts; never
/// persisted. Mutated only from the single scheduling thread.
#[derive(Debug, Default)]
pub struct UnreadTracker {
    count: usize,
}

impl UnreadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A message arrived while the panel was inactive.
    pub fn notify_unseen(&mut self) {
        self.count += 1;
    }

    /// Clear the count, returning what was cleared. Idempotent: resetting an
    /// already-zero tracker is a no-op, not an error.
    pub fn reset(&mut self) -> usize {
        std::mem::take(&mut self.count)
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
