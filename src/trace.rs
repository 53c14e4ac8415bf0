//! Per-table operation trace.
//!
//! Every operation on a table appends one human-readable line describing its
//! parameters, result size and elapsed time. Entries are never reordered.
//! The log is unbounded unless a retention limit is configured, in which case
//! the oldest entries are dropped and counted.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLog {
    entries: VecDeque<String>,
    retention: Option<usize>,
    evicted: u64,
}

impl TraceLog {
    pub fn new(retention: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            retention,
            evicted: 0,
        }
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push_back(entry.into());
        if let Some(limit) = self.retention {
            while self.entries.len() > limit {
                self.entries.pop_front();
                self.evicted += 1;
            }
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries dropped by the retention limit.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

/// Wall-clock timer for the `execution time (mil)` part of trace entries.
pub struct Stopwatch(Instant);

impl Stopwatch {
    pub fn start() -> Self {
        Stopwatch(Instant::now())
    }

    pub fn elapsed_millis(&self) -> u128 {
        self.0.elapsed().as_millis()
    }
}
