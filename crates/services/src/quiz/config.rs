use std::num::NonZeroUsize;
use std::time::Duration;

/// Questions per round unless configured otherwise.
pub const DEFAULT_QUESTIONS_AMOUNT: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(amount) => amount,
    None => panic!("questions amount must be non-zero"),
};

/// How long the answer highlight stays up before moving on.
pub const DEFAULT_DWELL: Duration = Duration::from_secs(1);

/// Round shape and pacing for a `QuizEngine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    questions_amount: NonZeroUsize,
    dwell: Duration,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_amount: DEFAULT_QUESTIONS_AMOUNT,
            dwell: DEFAULT_DWELL,
        }
    }
}

impl QuizConfig {
    #[must_use]
    pub fn with_questions_amount(mut self, questions_amount: NonZeroUsize) -> Self {
        self.questions_amount = questions_amount;
        self
    }

    #[must_use]
    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    #[must_use]
    pub fn questions_amount(&self) -> NonZeroUsize {
        self.questions_amount
    }

    #[must_use]
    pub fn dwell(&self) -> Duration {
        self.dwell
    }
}
