use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::task::JoinHandle;

use quiz_core::model::Answer;

use super::config::QuizConfig;
use super::display::QuizDisplay;
use super::events::{QuizEvent, SourceEvent, UserAction};
use super::results::round_results;
use super::session::{Advance, Phase, QuizSession};
use crate::error::EngineError;
use crate::questions::QuestionSource;
use crate::statistics_service::StatisticsService;

pub const NO_QUESTION_MESSAGE: &str = "No question is available right now.";

/// Cloneable entry point for user actions.
#[derive(Debug, Clone)]
pub struct QuizHandle {
    events: UnboundedSender<QuizEvent>,
}

impl QuizHandle {
    /// # Errors
    ///
    /// Returns `EngineError::Closed` once the engine has stopped.
    pub fn answer(&self, answer: Answer) -> Result<(), EngineError> {
        self.send(QuizEvent::User(UserAction::Answer(answer)))
    }

    /// Dismiss the results dialog and start the next round.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Closed` once the engine has stopped.
    pub fn acknowledge_results(&self) -> Result<(), EngineError> {
        self.send(QuizEvent::User(UserAction::AcknowledgeResults))
    }

    /// Reload question data and restart the round.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Closed` once the engine has stopped.
    pub fn retry_load(&self) -> Result<(), EngineError> {
        self.send(QuizEvent::User(UserAction::RetryLoad))
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the engine already stopped.
    pub fn shutdown(&self) -> Result<(), EngineError> {
        self.send(QuizEvent::Shutdown)
    }

    fn send(&self, event: QuizEvent) -> Result<(), EngineError> {
        self.events.send(event).map_err(|_| EngineError::Closed)
    }
}

/// Single control loop for one quiz.
///
/// Every state change happens inside [`run`](Self::run): source results,
/// user actions and dwell timer expiries all arrive as `QuizEvent`s on one
/// channel and are applied in order.
pub struct QuizEngine {
    config: QuizConfig,
    session: QuizSession,
    source: Arc<dyn QuestionSource>,
    statistics: StatisticsService,
    display: Box<dyn QuizDisplay>,
    events_tx: WeakUnboundedSender<QuizEvent>,
    events_rx: UnboundedReceiver<QuizEvent>,
    dwell: Option<JoinHandle<()>>,
    dwell_generation: u64,
}

impl QuizEngine {
    #[must_use]
    pub fn new(
        config: QuizConfig,
        source: Arc<dyn QuestionSource>,
        statistics: StatisticsService,
        display: Box<dyn QuizDisplay>,
    ) -> (Self, QuizHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Self {
            config,
            session: QuizSession::new(config.questions_amount()),
            source,
            statistics,
            display,
            events_tx: tx.downgrade(),
            events_rx: rx,
            dwell: None,
            dwell_generation: 0,
        };
        (engine, QuizHandle { events: tx })
    }

    /// Load question data and process events until shutdown, or until every
    /// `QuizHandle` is dropped and no work is in flight.
    pub async fn run(mut self) {
        let ticket = self.session.begin_load();
        self.load(ticket);

        while let Some(event) = self.events_rx.recv().await {
            match event {
                QuizEvent::Shutdown => break,
                QuizEvent::User(action) => self.on_user(action),
                QuizEvent::Source(event) => self.on_source(event),
                QuizEvent::DwellElapsed { generation } => self.on_dwell(generation).await,
            }
        }

        self.cancel_dwell();
        debug!("quiz engine stopped in {:?}", self.session.phase());
    }

    fn on_user(&mut self, action: UserAction) {
        match action {
            UserAction::Answer(answer) => match self.session.answer(answer) {
                Ok(correct) => {
                    self.display.highlight_answer(correct);
                    self.display.disable_input();
                    self.schedule_dwell();
                }
                Err(err) => debug!("ignoring answer: {err}"),
            },
            UserAction::AcknowledgeResults => {
                if self.session.phase() == Phase::Finished {
                    self.cancel_dwell();
                    let ticket = self.session.restart();
                    self.request_question(ticket);
                } else {
                    debug!("no results to acknowledge in {:?}", self.session.phase());
                }
            }
            UserAction::RetryLoad => {
                if self.cancel_dwell() {
                    self.display.enable_input();
                }
                let ticket = self.session.reload();
                self.load(ticket);
            }
        }
    }

    fn on_source(&mut self, event: SourceEvent) {
        match event {
            SourceEvent::LoadComplete { ticket } => match self.session.complete_load(ticket) {
                Ok(question_ticket) => {
                    self.display.hide_loading();
                    self.request_question(question_ticket);
                }
                Err(err) => debug!("load #{ticket} completed: {err}"),
            },
            SourceEvent::LoadFailed { ticket, error } => match self.session.fail_load(ticket) {
                Ok(()) => {
                    self.display.hide_loading();
                    self.display.show_error(&error.to_string());
                }
                Err(err) => debug!("load #{ticket} failed ({error}): {err}"),
            },
            SourceEvent::QuestionReady {
                ticket,
                question: Some(question),
            } => match self.session.accept_question(ticket, question) {
                Ok(step) => self.display.show_question(&step),
                Err(err) => debug!("question #{ticket} dropped: {err}"),
            },
            SourceEvent::QuestionReady {
                ticket,
                question: None,
            } => match self.session.question_unavailable(ticket) {
                Ok(()) => self.display.show_error(NO_QUESTION_MESSAGE),
                Err(err) => debug!("empty question #{ticket} dropped: {err}"),
            },
        }
    }

    async fn on_dwell(&mut self, generation: u64) {
        if generation != self.dwell_generation {
            debug!("dwell #{generation} superseded");
            return;
        }
        self.dwell = None;
        self.display.enable_input();

        match self.session.advance() {
            Ok(Advance::NextQuestion { ticket }) => self.request_question(ticket),
            Ok(Advance::Finished { correct, total }) => self.finish_round(correct, total).await,
            Err(err) => debug!("dwell elapsed: {err}"),
        }
    }

    async fn finish_round(&mut self, correct: usize, total: usize) {
        let snapshot = self
            .statistics
            .record_round(to_u32(correct), to_u32(total))
            .await;
        let results = round_results(correct, total, &snapshot);
        self.display.show_results(&results);
    }

    fn load(&mut self, ticket: u64) {
        let Some(tx) = self.events_tx.upgrade() else {
            return;
        };

        self.display.show_loading();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let event = match source.load_data().await {
                Ok(()) => SourceEvent::LoadComplete { ticket },
                Err(error) => SourceEvent::LoadFailed { ticket, error },
            };
            let _ = tx.send(QuizEvent::Source(event));
        });
    }

    fn request_question(&mut self, ticket: u64) {
        let Some(tx) = self.events_tx.upgrade() else {
            return;
        };
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let question = source.next_question().await;
            let _ = tx.send(QuizEvent::Source(SourceEvent::QuestionReady { ticket, question }));
        });
    }

    fn schedule_dwell(&mut self) {
        self.cancel_dwell();
        let Some(tx) = self.events_tx.upgrade() else {
            return;
        };
        let generation = self.dwell_generation;
        let dwell = self.config.dwell();
        self.dwell = Some(tokio::spawn(async move {
            tokio::time::sleep(dwell).await;
            let _ = tx.send(QuizEvent::DwellElapsed { generation });
        }));
    }

    /// Abort any pending dwell and invalidate an expiry already queued.
    /// Returns whether a dwell was pending.
    fn cancel_dwell(&mut self) -> bool {
        self.dwell_generation += 1;
        match self.dwell.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
