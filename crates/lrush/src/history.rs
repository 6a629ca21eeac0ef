//! Bounded operation log, newest first

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};
use lrusim::Access;
use serde::{Serialize, Serializer};

/// Operation kind recorded in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Read,
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => f.write_str("READ"),
            Operation::Write => f.write_str("WRITE"),
        }
    }
}

/// One logged read or write
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub at: DateTime<Local>,
    pub operation: Operation,
    pub key: String,
    pub hit: bool,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} '{}'",
            self.at.format("%H:%M:%S%.3f"),
            if self.hit { '+' } else { '-' },
            self.operation,
            self.key
        )
    }
}

/// Operation log keeping at most `limit` records
#[derive(Debug, Clone)]
pub struct History {
    records: VecDeque<Record>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(limit.min(1024)),
            limit,
        }
    }

    /// Log an operation stamped with the current local time
    pub fn record(&mut self, operation: Operation, key: &str, access: Access) {
        self.record_at(Local::now(), operation, key, access);
    }

    pub fn record_at(
        &mut self,
        at: DateTime<Local>,
        operation: Operation,
        key: &str,
        access: Access,
    ) {
        self.records.push_front(Record {
            at,
            operation,
            key: key.to_string(),
            hit: access.is_hit(),
        });
        self.records.truncate(self.limit);
    }

    /// Records, newest first
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Serialize for History {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_newest_first() {
        let mut history = History::new(10);

        history.record(Operation::Write, "a", Access::Miss);
        history.record(Operation::Read, "a", Access::Hit);

        let ops: Vec<_> = history.iter().map(|r| r.operation).collect();
        assert_eq!(ops, vec![Operation::Read, Operation::Write]);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(2);

        history.record(Operation::Write, "a", Access::Miss);
        history.record(Operation::Write, "b", Access::Miss);
        history.record(Operation::Write, "c", Access::Miss);

        let keys: Vec<_> = history.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "b"]);
    }

    #[test]
    fn test_zero_limit_keeps_nothing() {
        let mut history = History::new(0);

        history.record(Operation::Read, "a", Access::Miss);

        assert!(history.is_empty());
    }

    #[test]
    fn test_record_display() {
        let mut history = History::new(4);

        history.record_at(noon(), Operation::Read, "k", Access::Hit);
        history.record_at(noon(), Operation::Write, "k", Access::Miss);

        let lines: Vec<_> = history.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            lines,
            vec!["[12:00:00.000] - WRITE 'k'", "[12:00:00.000] + READ 'k'"]
        );
    }

    #[test]
    fn test_serialize() {
        let mut history = History::new(4);
        history.record_at(noon(), Operation::Write, "k", Access::Miss);

        let json = serde_json::to_value(&history).unwrap();

        assert_eq!(json[0]["operation"], "WRITE");
        assert_eq!(json[0]["key"], "k");
        assert_eq!(json[0]["hit"], false);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new(4);
        history.record(Operation::Read, "a", Access::Miss);

        history.clear();

        assert_eq!(history.len(), 0);
    }
}
