use std::fmt;
use std::num::NonZeroUsize;

use quiz_core::model::{Answer, QuizQuestion, QuizStep};

use crate::error::SessionError;

/// Where a round currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Question data is being loaded, or the last load failed and is waiting
    /// for a retry.
    Loading,
    /// The next question has been requested but not delivered yet.
    AwaitingQuestion,
    /// A question is shown and accepts one answer.
    AwaitingAnswer,
    /// The answer was scored; waiting for the dwell timer.
    Scoring,
    /// Every question was answered and the round was handed to statistics.
    Finished,
}

/// What happens after the dwell delay of a scored answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move on; the next question was requested under `ticket`.
    NextQuestion { ticket: u64 },
    /// The round is over.
    Finished { correct: usize, total: usize },
}

/// State of one quiz round.
///
/// Pure and synchronous: the engine feeds it events and performs the side
/// effects it asks for. Each load or question request gets a ticket, and a
/// delivery is only accepted for the latest outstanding ticket, which keeps
/// late or duplicated deliveries from touching the round.
#[derive(Clone, PartialEq)]
pub struct QuizSession {
    questions_amount: NonZeroUsize,
    phase: Phase,
    current_question_index: usize,
    correct_answers: usize,
    current_question: Option<QuizQuestion>,
    pending_load: Option<u64>,
    pending_question: Option<u64>,
    next_ticket: u64,
}

impl QuizSession {
    /// A session in `Loading` with no load issued yet.
    #[must_use]
    pub fn new(questions_amount: NonZeroUsize) -> Self {
        Self {
            questions_amount,
            phase: Phase::Loading,
            current_question_index: 0,
            correct_answers: 0,
            current_question: None,
            pending_load: None,
            pending_question: None,
            next_ticket: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn questions_amount(&self) -> usize {
        self.questions_amount.get()
    }

    #[must_use]
    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    #[must_use]
    pub fn correct_answers(&self) -> usize {
        self.correct_answers
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.current_question.as_ref()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_question_index == self.questions_amount.get() - 1
    }

    /// The view of the current question, if one is set.
    #[must_use]
    pub fn step(&self) -> Option<QuizStep> {
        self.current_question.as_ref().map(|question| {
            QuizStep::from_question(
                question,
                self.current_question_index,
                self.questions_amount.get(),
            )
        })
    }

    /// Enter `Loading` and issue a new load ticket. Any outstanding load or
    /// question request is forgotten.
    pub fn begin_load(&mut self) -> u64 {
        self.phase = Phase::Loading;
        self.pending_question = None;
        let ticket = self.issue_ticket();
        self.pending_load = Some(ticket);
        ticket
    }

    /// Data is loaded; request the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StaleDelivery` unless `ticket` is the
    /// outstanding load.
    pub fn complete_load(&mut self, ticket: u64) -> Result<u64, SessionError> {
        self.take_pending_load(ticket)?;
        Ok(self.request_question())
    }

    /// The load failed; stay in `Loading` until a retry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StaleDelivery` unless `ticket` is the
    /// outstanding load.
    pub fn fail_load(&mut self, ticket: u64) -> Result<(), SessionError> {
        self.take_pending_load(ticket)
    }

    /// Install a delivered question and return its view.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StaleDelivery` if no question is awaited or
    /// `ticket` is not the latest request. The session is left untouched.
    pub fn accept_question(
        &mut self,
        ticket: u64,
        question: QuizQuestion,
    ) -> Result<QuizStep, SessionError> {
        self.take_pending_question(ticket)?;
        let step = QuizStep::from_question(
            &question,
            self.current_question_index,
            self.questions_amount.get(),
        );
        self.current_question = Some(question);
        self.phase = Phase::AwaitingAnswer;
        Ok(step)
    }

    /// The source had nothing to deliver; fall back to `Loading` so a retry
    /// reloads the data.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StaleDelivery` under the same rules as
    /// [`accept_question`](Self::accept_question).
    pub fn question_unavailable(&mut self, ticket: u64) -> Result<(), SessionError> {
        self.take_pending_question(ticket)?;
        self.phase = Phase::Loading;
        Ok(())
    }

    /// Score an answer to the current question. Returns whether it was right.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAwaitingAnswer` unless a question is shown
    /// and has not been answered yet.
    pub fn answer(&mut self, answer: Answer) -> Result<bool, SessionError> {
        if self.phase != Phase::AwaitingAnswer {
            return Err(SessionError::NotAwaitingAnswer);
        }
        let Some(question) = self.current_question.as_ref() else {
            return Err(SessionError::NotAwaitingAnswer);
        };

        let is_correct = question.is_correct(answer);
        if is_correct {
            self.correct_answers += 1;
        }
        self.phase = Phase::Scoring;
        Ok(is_correct)
    }

    /// Leave `Scoring`: finish the round after the last question, otherwise
    /// move to the next index and request its question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotScoring` outside of `Scoring`.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        if self.phase != Phase::Scoring {
            return Err(SessionError::NotScoring);
        }

        if self.is_last_question() {
            self.phase = Phase::Finished;
            return Ok(Advance::Finished {
                correct: self.correct_answers,
                total: self.questions_amount.get(),
            });
        }

        self.current_question_index += 1;
        Ok(Advance::NextQuestion {
            ticket: self.request_question(),
        })
    }

    /// Start a new round on the already loaded data.
    pub fn restart(&mut self) -> u64 {
        self.reset_round();
        self.pending_load = None;
        self.request_question()
    }

    /// Start a new round from scratch, reloading the data.
    pub fn reload(&mut self) -> u64 {
        self.reset_round();
        self.begin_load()
    }

    fn reset_round(&mut self) {
        self.current_question_index = 0;
        self.correct_answers = 0;
        self.current_question = None;
    }

    fn request_question(&mut self) -> u64 {
        self.phase = Phase::AwaitingQuestion;
        let ticket = self.issue_ticket();
        self.pending_question = Some(ticket);
        ticket
    }

    fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn take_pending_load(&mut self, ticket: u64) -> Result<(), SessionError> {
        if self.phase != Phase::Loading || self.pending_load != Some(ticket) {
            return Err(SessionError::StaleDelivery);
        }
        self.pending_load = None;
        Ok(())
    }

    fn take_pending_question(&mut self, ticket: u64) -> Result<(), SessionError> {
        let awaiting = matches!(self.phase, Phase::Loading | Phase::AwaitingQuestion);
        if !awaiting || self.pending_question != Some(ticket) {
            return Err(SessionError::StaleDelivery);
        }
        self.pending_question = None;
        Ok(())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("current_question_index", &self.current_question_index)
            .field("correct_answers", &self.correct_answers)
            .field("questions_amount", &self.questions_amount)
            .field("has_question", &self.current_question.is_some())
            .field("pending_load", &self.pending_load)
            .field("pending_question", &self.pending_question)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
