use std::io::Write;

use quiz_core::model::{Answer, QuizResults, QuizStep};
use services::{EngineError, QuizDisplay, QuizHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

/// What a line typed by the player currently means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Nothing to do until the engine shows something.
    Wait,
    Answer,
    Acknowledge,
    Retry,
}

/// Renders the quiz on stdout and tells the input loop what to expect.
pub struct TerminalDisplay {
    prompt: watch::Sender<Prompt>,
    input_enabled: bool,
}

impl TerminalDisplay {
    #[must_use]
    pub fn new() -> (Self, watch::Receiver<Prompt>) {
        let (tx, rx) = watch::channel(Prompt::Wait);
        let display = Self {
            prompt: tx,
            input_enabled: true,
        };
        (display, rx)
    }

    fn set_prompt(&self, prompt: Prompt) {
        self.prompt.send_replace(prompt);
    }
}

fn print_flush(text: &str) {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "{text}");
    let _ = out.flush();
}

impl QuizDisplay for TerminalDisplay {
    fn show_question(&mut self, step: &QuizStep) {
        println!();
        println!("Question {}", step.question_number);
        if !step.image.is_empty() {
            println!("[poster: {} bytes]", step.image.len());
        }
        println!("{}", step.text);
        if self.input_enabled {
            self.set_prompt(Prompt::Answer);
        }
        print_flush("[y]es / [n]o > ");
    }

    fn show_results(&mut self, results: &QuizResults) {
        println!();
        println!("== {} ==", results.title);
        println!("{}", results.text);
        self.set_prompt(Prompt::Acknowledge);
        print_flush(&format!("[Enter] {} / [q]uit > ", results.button_text));
    }

    fn highlight_answer(&mut self, correct: bool) {
        if correct {
            println!("Correct!");
        } else {
            println!("Wrong.");
        }
    }

    fn show_loading(&mut self) {
        self.set_prompt(Prompt::Wait);
        println!("Loading movies...");
    }

    fn hide_loading(&mut self) {}

    fn disable_input(&mut self) {
        self.input_enabled = false;
        self.set_prompt(Prompt::Wait);
    }

    fn enable_input(&mut self) {
        self.input_enabled = true;
    }

    fn show_error(&mut self, message: &str) {
        println!();
        println!("Error: {message}");
        self.set_prompt(Prompt::Retry);
        print_flush("[r]etry / [q]uit > ");
    }
}

/// Read stdin until the player quits or input ends, forwarding commands to
/// the engine.
///
/// # Errors
///
/// Returns `EngineError::Closed` if the engine stopped first.
pub async fn read_input(
    handle: QuizHandle,
    prompt: watch::Receiver<Prompt>,
) -> Result<(), EngineError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let input = line.trim().to_ascii_lowercase();
        if input == "q" || input == "quit" {
            break;
        }

        let current = *prompt.borrow();
        match (current, input.as_str()) {
            (Prompt::Answer, "y" | "yes") => handle.answer(Answer::Yes)?,
            (Prompt::Answer, "n" | "no") => handle.answer(Answer::No)?,
            (Prompt::Answer, _) => print_flush("please type y or n > "),
            (Prompt::Acknowledge, _) => handle.acknowledge_results()?,
            (Prompt::Retry, "r" | "retry" | "") => handle.retry_load()?,
            (Prompt::Retry, _) => print_flush("please type r or q > "),
            (Prompt::Wait, _) => {}
        }
    }

    handle.shutdown()
}
