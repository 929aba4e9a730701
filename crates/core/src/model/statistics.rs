use chrono::{DateTime, Utc};

use super::GameRecord;

/// Aggregate results across every completed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    pub cumulative_correct: u32,
    pub cumulative_total: u32,
    pub games_played: u32,
    pub best_game: GameRecord,
}

impl StatisticsSnapshot {
    /// State before the first round: all counters zero, empty best game.
    #[must_use]
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            cumulative_correct: 0,
            cumulative_total: 0,
            games_played: 0,
            best_game: GameRecord::empty(now),
        }
    }

    /// Percentage of correct answers over all rounds.
    ///
    /// This is the plain division, so it is `NaN` until a round with a
    /// non-zero total has been recorded.
    #[must_use]
    pub fn total_accuracy(&self) -> f64 {
        f64::from(self.cumulative_correct) / f64::from(self.cumulative_total) * 100.0
    }

    /// Fold a finished round into the aggregate.
    ///
    /// The best game is only replaced when `round` is strictly better, so the
    /// first round reaching a given score keeps the record.
    #[must_use]
    pub fn with_round(&self, round: GameRecord) -> Self {
        let best_game = if round.is_better_than(&self.best_game) {
            round
        } else {
            self.best_game
        };

        Self {
            cumulative_correct: self.cumulative_correct.saturating_add(round.correct()),
            cumulative_total: self.cumulative_total.saturating_add(round.total()),
            games_played: self.games_played.saturating_add(1),
            best_game,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn accuracy_is_nan_before_first_round() {
        let snapshot = StatisticsSnapshot::empty(fixed_now());
        assert!(snapshot.total_accuracy().is_nan());
    }

    #[test]
    fn with_round_accumulates_and_keeps_first_best_on_tie() {
        let t0 = fixed_now();
        let first = GameRecord::new(6, 10, t0);
        let tie = GameRecord::new(6, 10, t0 + Duration::hours(1));

        let snapshot = StatisticsSnapshot::empty(t0)
            .with_round(first)
            .with_round(tie);

        assert_eq!(snapshot.games_played, 2);
        assert_eq!(snapshot.cumulative_correct, 12);
        assert_eq!(snapshot.cumulative_total, 20);
        assert_eq!(snapshot.best_game, first);
        assert!((snapshot.total_accuracy() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_round_does_not_replace_empty_best() {
        let t0 = fixed_now();
        let empty = StatisticsSnapshot::empty(t0);
        let next = empty.with_round(GameRecord::new(0, 10, t0 + Duration::days(1)));
        assert_eq!(next.best_game, empty.best_game);
        assert_eq!(next.games_played, 1);
    }
}
