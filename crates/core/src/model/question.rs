/// A single yes/no question shown during a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    image: Vec<u8>,
    text: String,
    correct_answer: bool,
}

impl QuizQuestion {
    #[must_use]
    pub fn new(image: Vec<u8>, text: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            image,
            text: text.into(),
            correct_answer,
        }
    }

    /// Raw image bytes, passed through to the display untouched.
    #[must_use]
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> bool {
        self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self, answer: Answer) -> bool {
        answer.as_bool() == self.correct_answer
    }
}

/// The two buttons a player can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    #[must_use]
    pub fn as_bool(self) -> bool {
        matches!(self, Answer::Yes)
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        if value { Answer::Yes } else { Answer::No }
    }
}
