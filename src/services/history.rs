use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::message::ReportResponse;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub const NO_REPORT_PLACEHOLDER: &str = "No report generated.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    pub message: String,
    pub response: String,
}

/// Ordered log of successful exchanges, oldest first.
///
/// Holds at most `capacity` entries; recording into a full log evicts the
/// oldest entry.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<ChatHistoryEntry>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Records a successful exchange. Returns the evicted entry, if any.
    pub fn record(&mut self, query: &str, response: &ReportResponse) -> Option<ChatHistoryEntry> {
        let text = response.report_text().unwrap_or(NO_REPORT_PLACEHOLDER);
        self.push(ChatHistoryEntry {
            message: query.to_string(),
            response: text.to_string(),
        })
    }

    pub fn push(&mut self, entry: ChatHistoryEntry) -> Option<ChatHistoryEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChatHistoryEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<ChatHistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(report: Option<&str>) -> ReportResponse {
        ReportResponse {
            report: report.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn keeps_submission_order() {
        let mut log = HistoryLog::default();
        log.record("q1", &reply(Some("R1")));
        log.record("q2", &reply(Some("R2")));

        let entries = log.to_vec();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ChatHistoryEntry { message: "q1".into(), response: "R1".into() });
        assert_eq!(entries[1], ChatHistoryEntry { message: "q2".into(), response: "R2".into() });
    }

    #[test]
    fn missing_report_uses_placeholder() {
        let mut log = HistoryLog::default();
        log.record("", &reply(None));
        log.record("q", &reply(Some("")));
        assert!(log.entries().all(|e| e.response == NO_REPORT_PLACEHOLDER));
        assert_eq!(log.entries().next().unwrap().message, "");
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut log = HistoryLog::new(2);
        assert!(log.record("a", &reply(Some("1"))).is_none());
        assert!(log.record("b", &reply(Some("2"))).is_none());
        let evicted = log.record("c", &reply(Some("3"))).unwrap();
        assert_eq!(evicted.message, "a");
        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["b", "c"]);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut log = HistoryLog::new(0);
        assert_eq!(log.capacity(), 1);
        log.record("a", &reply(Some("1")));
        log.record("b", &reply(Some("2")));
        assert_eq!(log.len(), 1);
        log.clear();
        assert!(log.is_empty());
    }
}
