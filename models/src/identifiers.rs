// models/src/identifiers.rs

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// The kinds of generated record identifiers. Each kind carries the prefix
/// the stored collections key their records by.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IdKind {
    Patient,
    Slot,
    Request,
    Appointment,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Patient => "PAT",
            IdKind::Slot => "SLOT",
            IdKind::Request => "REQ",
            IdKind::Appointment => "APT",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Mints record identifiers. Injectable so callers can swap a deterministic
/// generator in during tests.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    fn mint(&self, kind: IdKind) -> String;
}

/// Production generator: prefix + millisecond timestamp + a process-wide
/// monotonic counter. The counter makes ids unique within a process even when
/// several are minted in the same millisecond.
#[derive(Debug, Default)]
pub struct ClockIdGenerator {
    counter: AtomicU64,
}

impl ClockIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for ClockIdGenerator {
    fn mint(&self, kind: IdKind) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{}{}", kind.prefix(), Utc::now().timestamp_millis(), seq)
    }
}

/// Deterministic generator for tests: prefix + zero-padded counter, no clock.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn mint(&self, kind: IdKind) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{:06}", kind.prefix(), seq)
    }
}
