mod config;
mod display;
mod engine;
mod events;
mod results;
mod session;

// Public API of the quiz subsystem.
pub use crate::error::{EngineError, SessionError};
pub use config::{DEFAULT_DWELL, DEFAULT_QUESTIONS_AMOUNT, QuizConfig};
pub use display::QuizDisplay;
pub use engine::{NO_QUESTION_MESSAGE, QuizEngine, QuizHandle};
pub use events::{QuizEvent, SourceEvent, UserAction};
pub use results::{RESULTS_BUTTON, RESULTS_TITLE, round_results};
pub use session::{Advance, Phase, QuizSession};
