use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One line of the match narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The player the line is about, if any
    pub pid: Option<usize>,
    pub msg: String,
    /// Seconds since the unix epoch
    pub time: u64,
}

/// Append-only, human readable log of everything that happened in a game.
/// Visible verbatim to every viewer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<Record>,
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            records: Vec::new(),
        }
    }

    pub fn record(&mut self, pid: Option<usize>, msg: impl Into<String>) {
        self.records.push(Record {
            pid,
            msg: msg.into(),
            time: unix_now(),
        });
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Message of the most recent line
    pub fn last_message(&self) -> Option<&str> {
        self.records.last().map(|r| r.msg.as_str())
    }
}
