use quiz_core::model::{QuizResults, StatisticsSnapshot};

pub const RESULTS_TITLE: &str = "This round is over!";
pub const RESULTS_BUTTON: &str = "Play again";

/// Build the end-of-round dialog from the round score and the statistics
/// stored after recording it.
#[must_use]
pub fn round_results(
    correct: usize,
    questions_amount: usize,
    statistics: &StatisticsSnapshot,
) -> QuizResults {
    let text = format!(
        "Your result: {correct}/{questions_amount}\n\
         Quizzes played: {}\n\
         Record: {}\n\
         Average accuracy: {:.2}%",
        statistics.games_played,
        statistics.best_game.description(),
        statistics.total_accuracy(),
    );

    QuizResults {
        title: RESULTS_TITLE.to_owned(),
        text,
        button_text: RESULTS_BUTTON.to_owned(),
    }
}
