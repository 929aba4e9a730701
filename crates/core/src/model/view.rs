use super::QuizQuestion;

/// What the display needs to render the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStep {
    pub image: Vec<u8>,
    pub text: String,
    /// Position within the round, e.g. `3/10`.
    pub question_number: String,
}

impl QuizStep {
    /// Build a step for the question at zero-based `index`.
    #[must_use]
    pub fn from_question(question: &QuizQuestion, index: usize, questions_amount: usize) -> Self {
        Self {
            image: question.image().to_vec(),
            text: question.text().to_owned(),
            question_number: format!("{}/{}", index + 1, questions_amount),
        }
    }
}

/// End-of-round summary shown in a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub title: String,
    pub text: String,
    pub button_text: String,
}
