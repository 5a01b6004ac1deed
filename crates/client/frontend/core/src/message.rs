//! Notification log shown to the player.
use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Severity of a notification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Snapshot of a single notification.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageEntry {
    pub text: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub level: MessageLevel,
}

impl MessageEntry {
    pub fn new(text: impl Into<String>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            timestamp: Some(Utc::now()),
            level,
        }
    }
}

/// Circular buffer of notifications, oldest evicted first.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
        }
    }

    pub fn push(&mut self, entry: MessageEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn push_text(&mut self, text: impl Into<String>, level: MessageLevel) {
        self.push(MessageEntry::new(text, level));
    }

    /// Most recent first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn latest(&self) -> Option<&MessageEntry> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut log = MessageLog::new(2);
        log.push_text("one", MessageLevel::Info);
        log.push_text("two", MessageLevel::Info);
        log.push_text("three", MessageLevel::Error);

        let texts: Vec<_> = log.recent(5).map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["three", "two"]);
        assert_eq!(log.latest().map(|e| e.level), Some(MessageLevel::Error));
    }

    #[test]
    fn zero_capacity_still_keeps_latest() {
        let mut log = MessageLog::new(0);
        log.push_text("only", MessageLevel::Info);
        assert_eq!(log.len(), 1);
    }
}
