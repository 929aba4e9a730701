use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use quiz_core::model::{Movie, QuizQuestion};

use super::{MoviesLoader, QuestionSource};
use crate::error::LoadError;

/// Rating thresholds asked about unless configured otherwise.
pub const DEFAULT_THRESHOLDS: RangeInclusive<u8> = 5..=8;

/// Builds "is this movie rated above N?" questions from a loaded catalogue.
pub struct MovieQuestionFactory {
    loader: Arc<dyn MoviesLoader>,
    movies: RwLock<Vec<Movie>>,
    rng: Mutex<StdRng>,
    thresholds: RangeInclusive<u8>,
}

impl MovieQuestionFactory {
    #[must_use]
    pub fn new(loader: Arc<dyn MoviesLoader>) -> Self {
        Self::with_rng(loader, StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic question order for a given seed.
    #[must_use]
    pub fn with_seed(loader: Arc<dyn MoviesLoader>, seed: u64) -> Self {
        Self::with_rng(loader, StdRng::seed_from_u64(seed))
    }

    /// Ask about thresholds in `thresholds` instead of [`DEFAULT_THRESHOLDS`].
    /// An empty range falls back to the default.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: RangeInclusive<u8>) -> Self {
        if !thresholds.is_empty() {
            self.thresholds = thresholds;
        }
        self
    }

    fn with_rng(loader: Arc<dyn MoviesLoader>, rng: StdRng) -> Self {
        Self {
            loader,
            movies: RwLock::new(Vec::new()),
            rng: Mutex::new(rng),
            thresholds: DEFAULT_THRESHOLDS,
        }
    }

    /// Number of movies currently loaded.
    #[must_use]
    pub fn catalogue_len(&self) -> usize {
        self.movies.read().map(|movies| movies.len()).unwrap_or(0)
    }
}

#[async_trait]
impl QuestionSource for MovieQuestionFactory {
    async fn load_data(&self) -> Result<(), LoadError> {
        let loaded = self.loader.load_movies().await?;
        if loaded.is_empty() {
            return Err(LoadError::Empty);
        }
        debug!("loaded {} movies", loaded.len());

        let mut movies = self
            .movies
            .write()
            .map_err(|e| LoadError::Unavailable(e.to_string()))?;
        *movies = loaded;
        Ok(())
    }

    async fn next_question(&self) -> Option<QuizQuestion> {
        let movies = self.movies.read().ok()?;
        if movies.is_empty() {
            return None;
        }

        let mut rng = self.rng.lock().ok()?;
        let movie = &movies[rng.random_range(0..movies.len())];
        let threshold = rng.random_range(self.thresholds.clone());
        Some(movie.rating_question(threshold))
    }
}
