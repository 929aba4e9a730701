#![forbid(unsafe_code)]

pub mod error;
pub mod questions;
pub mod quiz;
pub mod statistics_service;

pub use quiz_core::Clock;

pub use error::{EngineError, LoadError, SessionError, StatisticsError};
pub use questions::{
    JsonFileMoviesLoader, MovieQuestionFactory, MoviesLoader, QuestionSource, StaticMoviesLoader,
};
pub use quiz::{QuizConfig, QuizDisplay, QuizEngine, QuizHandle, QuizSession};
pub use statistics_service::StatisticsService;
