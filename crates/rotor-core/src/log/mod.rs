//! Bounded per-task activity log.

use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Default number of lines kept per task.
pub const DEFAULT_LOG_CAPACITY: usize = 250;

/// One immutable log line.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: OffsetDateTime,
    pub message: String,
}

impl LogEntry {
    /// `<rfc3339 timestamp> <message>`.
    pub fn render(&self) -> String {
        let ts = self
            .at
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.at.unix_timestamp().to_string());
        format!("{ts} {}", self.message)
    }
}

/// Fixed-capacity FIFO of log entries.
///
/// Appends are O(1); once full, every append evicts the oldest entry.
/// Written by a single worker, read concurrently through [`LogRing::snapshot`].
#[derive(Debug)]
pub struct LogRing {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl LogRing {
    /// Capacity is clamped to at least one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a line stamped with the current UTC time.
    pub fn push(&self, message: impl Into<String>) {
        let entry = LogEntry {
            at: OffsetDateTime::now_utc(),
            message: message.into(),
        };
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().cloned().collect()
    }

    /// Rendered lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.snapshot().iter().map(LogEntry::render).collect()
    }
}

impl Default for LogRing {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
