use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one finished round, kept as the best-ever result.
///
/// Records are never edited: a better round produces a new record that
/// supersedes the old one.
///
/// Persisted as `{"correct": int, "total": int, "date": ISO8601}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    correct: u32,
    total: u32,
    date: DateTime<Utc>,
}

impl GameRecord {
    #[must_use]
    pub fn new(correct: u32, total: u32, date: DateTime<Utc>) -> Self {
        Self {
            correct,
            total,
            date,
        }
    }

    /// The zero record used before any round was played, or when the stored
    /// record cannot be read.
    #[must_use]
    pub fn empty(date: DateTime<Utc>) -> Self {
        Self::new(0, 0, date)
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Strictly more correct answers than `other`.
    ///
    /// Ties are not better, and `total` is not taken into account: a 7/10
    /// round and a 7/20 round compare equal.
    #[must_use]
    pub fn is_better_than(&self, other: &GameRecord) -> bool {
        self.correct > other.correct
    }

    /// Human readable form, e.g. `7/10 (01.01.24 12:00)`.
    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "{}/{} ({})",
            self.correct,
            self.total,
            self.date.format("%d.%m.%y %H:%M")
        )
    }
}
