use alloc::collections::VecDeque;
use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Classification the event feed renders with (color-coding); game
/// logic never reads entries back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Damage,
    Health,
    Points,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub text: String,
    pub kind: LogKind,
    pub id: u64,
}

/// Newest-first bounded event feed. Oldest entries fall off past the
/// cap.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    entries: VecDeque<LogEntry>,
    next_id: u64,
}

impl Journal {
    pub const CAP: usize = 50;

    pub fn push(&mut self, text: String, kind: LogKind) {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_front(LogEntry { text, kind, id });
        self.entries.truncate(Self::CAP);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
