use quiz_core::model::{QuizResults, QuizStep};

/// Everything the engine asks of the user interface.
///
/// Calls arrive from the engine task, one at a time, in the order the round
/// produces them.
pub trait QuizDisplay: Send {
    fn show_question(&mut self, step: &QuizStep);

    fn show_results(&mut self, results: &QuizResults);

    /// Mark the last answer as right or wrong.
    fn highlight_answer(&mut self, correct: bool);

    fn show_loading(&mut self);

    fn hide_loading(&mut self);

    fn disable_input(&mut self);

    fn enable_input(&mut self);

    /// Report a failed load; the user may retry.
    fn show_error(&mut self, message: &str);
}
