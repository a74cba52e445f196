//! Human-readable anomaly log feed.

use std::collections::VecDeque;

use chrono::Local;

use crate::engine::AnomalyRecord;

/// Display cap on the sidebar log. This limits the formatted feed only;
/// the engine's record history is unbounded.
pub const MAX_ENTRIES: usize = 50;

/// Capped, newest-first feed of formatted anomaly entries.
#[derive(Debug, Clone)]
pub struct AnomalyLog {
    entries: VecDeque<String>,
    max_entries: usize,
}

impl AnomalyLog {
    pub fn new() -> Self {
        Self::with_max_entries(MAX_ENTRIES)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Prepend a formatted entry, dropping the oldest beyond the cap.
    pub fn record(&mut self, record: &AnomalyRecord) {
        let timestamp = record.detected_at.with_timezone(&Local).format("%H:%M:%S");
        self.entries
            .push_front(format!("[{}] Anomaly: {:.2}", timestamp, record.value));
        self.entries.truncate(self.max_entries);
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for AnomalyLog {
    fn default() -> Self {
        Self::new()
    }
}
