use quiz_core::model::{Answer, QuizQuestion};

use crate::error::LoadError;

/// Notifications from the question source, tagged with the ticket of the
/// request they answer.
#[derive(Debug)]
pub enum SourceEvent {
    QuestionReady {
        ticket: u64,
        question: Option<QuizQuestion>,
    },
    LoadComplete {
        ticket: u64,
    },
    LoadFailed {
        ticket: u64,
        error: LoadError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Answer(Answer),
    AcknowledgeResults,
    RetryLoad,
}

/// Everything the engine loop consumes.
#[derive(Debug)]
pub enum QuizEvent {
    User(UserAction),
    Source(SourceEvent),
    DwellElapsed { generation: u64 },
    Shutdown,
}
