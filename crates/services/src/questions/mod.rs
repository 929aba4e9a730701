mod loader;
mod movie_factory;

use async_trait::async_trait;
use quiz_core::model::QuizQuestion;

use crate::error::LoadError;

pub use loader::{JsonFileMoviesLoader, MoviesLoader, StaticMoviesLoader};
pub use movie_factory::MovieQuestionFactory;

/// Supplies the questions of a round.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Prepare question data. Called once per load or retry.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if no question data can be made available.
    async fn load_data(&self) -> Result<(), LoadError>;

    /// Produce the next question, or `None` if nothing can be asked.
    async fn next_question(&self) -> Option<QuizQuestion>;
}
