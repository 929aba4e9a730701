use std::sync::Arc;

use log::{error, warn};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use quiz_core::model::{GameRecord, StatisticsSnapshot};
use storage::repository::{Entry, KeyValueStore};

use crate::Clock;
use crate::error::StatisticsError;

pub const KEY_CORRECT: &str = "correct";
pub const KEY_TOTAL: &str = "total";
pub const KEY_GAMES_COUNT: &str = "gamesCount";
pub const KEY_BEST_GAME: &str = "bestGame";

const ALL_KEYS: [&str; 4] = [KEY_CORRECT, KEY_TOTAL, KEY_GAMES_COUNT, KEY_BEST_GAME];

/// Durable statistics across every completed round.
///
/// Reads are forgiving: missing or corrupted entries fall back to zero (or
/// an empty best game) instead of failing. Writes go through one atomic
/// batch, so a reader never sees the best game updated without the counters.
#[derive(Clone)]
pub struct StatisticsService {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl StatisticsService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            clock,
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Record a finished round and return the statistics that are now stored.
    ///
    /// A failed write is logged and the previous statistics are returned
    /// unchanged.
    pub async fn record_round(&self, correct: u32, total: u32) -> StatisticsSnapshot {
        match self.try_record_round(correct, total).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!("failed to store round {correct}/{total}: {err}");
                self.snapshot().await
            }
        }
    }

    /// Like [`record_round`](Self::record_round) but reports write failures.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError` if the stored values cannot be read, or the
    /// new values cannot be encoded or written. Nothing is written in that
    /// case.
    pub async fn try_record_round(
        &self,
        correct: u32,
        total: u32,
    ) -> Result<StatisticsSnapshot, StatisticsError> {
        let _guard = self.write_lock.lock().await;

        let current = self.read_snapshot().await?;
        let round = GameRecord::new(correct, total, self.clock.now());
        let next = current.with_round(round);

        self.store.set_many(encode(&next)?).await?;
        Ok(next)
    }

    /// All four values from one consistent read.
    pub async fn snapshot(&self) -> StatisticsSnapshot {
        match self.read_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("statistics unavailable, using defaults: {err}");
                StatisticsSnapshot::empty(self.clock.now())
            }
        }
    }

    /// Corrupted or missing entries decode to defaults; a store that cannot
    /// be read at all is an error.
    async fn read_snapshot(&self) -> Result<StatisticsSnapshot, StatisticsError> {
        let now = self.clock.now();
        let mut values = self.store.get_many(&ALL_KEYS).await?.into_iter();
        let mut next = || values.next().flatten();
        let cumulative_correct = decode_or(KEY_CORRECT, next(), 0);
        let cumulative_total = decode_or(KEY_TOTAL, next(), 0);
        let games_played = decode_or(KEY_GAMES_COUNT, next(), 0);
        let best_game = decode_or(KEY_BEST_GAME, next(), GameRecord::empty(now));

        Ok(StatisticsSnapshot {
            cumulative_correct,
            cumulative_total,
            games_played,
            best_game,
        })
    }

    /// Percentage of correct answers over every recorded round.
    ///
    /// `NaN` until the first round is recorded; callers show it only in round
    /// results.
    pub async fn total_accuracy(&self) -> f64 {
        self.snapshot().await.total_accuracy()
    }

    pub async fn games_played(&self) -> u32 {
        self.read(KEY_GAMES_COUNT, 0).await
    }

    pub async fn best_game(&self) -> GameRecord {
        self.read(KEY_BEST_GAME, GameRecord::empty(self.clock.now()))
            .await
    }

    /// Forget every recorded round.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::Storage` if the entries cannot be removed.
    pub async fn reset(&self) -> Result<(), StatisticsError> {
        let _guard = self.write_lock.lock().await;
        self.store.remove_many(&ALL_KEYS).await?;
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.get(key).await {
            Ok(bytes) => decode_or(key, bytes, default),
            Err(err) => {
                warn!("failed to read {key}, using default: {err}");
                default
            }
        }
    }
}

fn decode_or<T: DeserializeOwned>(key: &str, bytes: Option<Vec<u8>>, default: T) -> T {
    let Some(bytes) = bytes else {
        return default;
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            warn!("corrupted {key} entry, using default: {err}");
            default
        }
    }
}

fn encode(snapshot: &StatisticsSnapshot) -> Result<Vec<Entry>, StatisticsError> {
    Ok(vec![
        (
            KEY_CORRECT.to_owned(),
            serde_json::to_vec(&snapshot.cumulative_correct)?,
        ),
        (
            KEY_TOTAL.to_owned(),
            serde_json::to_vec(&snapshot.cumulative_total)?,
        ),
        (
            KEY_GAMES_COUNT.to_owned(),
            serde_json::to_vec(&snapshot.games_played)?,
        ),
        (
            KEY_BEST_GAME.to_owned(),
            serde_json::to_vec(&snapshot.best_game)?,
        ),
    ])
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
