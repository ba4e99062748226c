//! Session statistics types.
//!
//! Statistics are kept as one counter per calendar date. Together the
//! counters form the singleton `sessionStats` document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Per-date tally of saved and deleted sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCounter {
    pub date: NaiveDate,
    pub saved_sessions: u64,
    pub deleted_sessions: u64,
}

impl DailyCounter {
    /// A zero-initialized counter for `date`.
    pub fn zero(date: NaiveDate) -> Self {
        Self {
            date,
            saved_sessions: 0,
            deleted_sessions: 0,
        }
    }

    pub fn get(&self, kind: CounterKind) -> u64 {
        match kind {
            CounterKind::Saved => self.saved_sessions,
            CounterKind::Deleted => self.deleted_sessions,
        }
    }
}

/// The full statistics document, ordered by first appearance of each date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsDocument {
    pub total_sessions: Vec<DailyCounter>,
}

impl StatisticsDocument {
    pub fn counter_for(&self, date: NaiveDate) -> Option<&DailyCounter> {
        self.total_sessions.iter().find(|c| c.date == date)
    }

    /// Sum of all `savedSessions` across dates.
    pub fn total_saved(&self) -> u64 {
        self.total_sessions.iter().map(|c| c.saved_sessions).sum()
    }

    /// Sum of all `deletedSessions` across dates.
    pub fn total_deleted(&self) -> u64 {
        self.total_sessions.iter().map(|c| c.deleted_sessions).sum()
    }
}

/// Which field of a [`DailyCounter`] an event increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Saved,
    Deleted,
}

impl CounterKind {
    /// Storage column backing this counter.
    pub fn column(&self) -> &'static str {
        match self {
            CounterKind::Saved => "saved_sessions",
            CounterKind::Deleted => "deleted_sessions",
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterKind::Saved => write!(f, "saved"),
            CounterKind::Deleted => write!(f, "deleted"),
        }
    }
}

/// What the aggregator does when an event arrives for a date with no counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingCounterPolicy {
    /// Append a zero-initialized counter for the date, then increment it.
    #[default]
    Create,
    /// Fail the operation with `StatsError::MissingCounter`.
    Reject,
}

impl fmt::Display for MissingCounterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingCounterPolicy::Create => write!(f, "create"),
            MissingCounterPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for MissingCounterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(MissingCounterPolicy::Create),
            "reject" => Ok(MissingCounterPolicy::Reject),
            other => Err(format!("invalid missing counter policy: '{other}'")),
        }
    }
}
