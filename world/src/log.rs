use std::collections::VecDeque;

use concert_core::LogEntry;

/// Bounded narration history, most recent entry first.
#[derive(Debug)]
pub(crate) struct NarrationLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl NarrationLog {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub(crate) fn record(&mut self, elapsed_seconds: u32, text: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(LogEntry {
            elapsed_seconds,
            text: text.into(),
        });
        self.entries.truncate(self.capacity);
    }

    pub(crate) fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::NarrationLog;

    #[test]
    fn keeps_most_recent_entries_first() {
        let mut log = NarrationLog::new(2);
        log.record(1, "first");
        log.record(2, "second");
        log.record(3, "third");

        let texts: Vec<_> = log.to_vec().into_iter().map(|entry| entry.text).collect();
        assert_eq!(texts, vec!["third".to_owned(), "second".to_owned()]);
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut log = NarrationLog::new(0);
        log.record(1, "ignored");
        assert!(log.to_vec().is_empty());
    }

    #[test]
    fn oversized_capacity_does_not_preallocate() {
        let mut log = NarrationLog::new(usize::MAX);
        log.record(1, "only");
        assert_eq!(log.to_vec().len(), 1);
    }
}
