use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Answer, QuizQuestion, QuizResults, QuizStep};
use quiz_core::time::fixed_clock;
use services::quiz::NO_QUESTION_MESSAGE;
use services::{LoadError, QuestionSource, QuizConfig, QuizDisplay, QuizEngine, StatisticsService};
use storage::repository::InMemoryStore;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Question(QuizStep),
    Results(QuizResults),
    Highlight(bool),
    ShowLoading,
    HideLoading,
    DisableInput,
    EnableInput,
    Error(String),
}

struct RecordingDisplay(UnboundedSender<Call>);

impl RecordingDisplay {
    fn record(&self, call: Call) {
        let _ = self.0.send(call);
    }
}

impl QuizDisplay for RecordingDisplay {
    fn show_question(&mut self, step: &QuizStep) {
        self.record(Call::Question(step.clone()));
    }
    fn show_results(&mut self, results: &QuizResults) {
        self.record(Call::Results(results.clone()));
    }
    fn highlight_answer(&mut self, correct: bool) {
        self.record(Call::Highlight(correct));
    }
    fn show_loading(&mut self) {
        self.record(Call::ShowLoading);
    }
    fn hide_loading(&mut self) {
        self.record(Call::HideLoading);
    }
    fn disable_input(&mut self) {
        self.record(Call::DisableInput);
    }
    fn enable_input(&mut self) {
        self.record(Call::EnableInput);
    }
    fn show_error(&mut self, message: &str) {
        self.record(Call::Error(message.to_owned()));
    }
}

/// Always asks the same yes-question; can fail loads or run dry on demand.
#[derive(Default)]
struct ScriptedSource {
    failing_loads: AtomicUsize,
    loads: AtomicUsize,
    dry: AtomicBool,
}

impl ScriptedSource {
    fn failing_first(n: usize) -> Self {
        let source = Self::default();
        source.failing_loads.store(n, Ordering::SeqCst);
        source
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn load_data(&self) -> Result<(), LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing_loads.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_loads.store(failing - 1, Ordering::SeqCst);
            return Err(LoadError::Unavailable("offline".into()));
        }
        Ok(())
    }

    async fn next_question(&self) -> Option<QuizQuestion> {
        if self.dry.swap(false, Ordering::SeqCst) {
            return None;
        }
        Some(QuizQuestion::new(vec![0xFF], "Is the rating of this movie greater than 6?", true))
    }
}

struct Harness {
    source: Arc<ScriptedSource>,
    stats: StatisticsService,
    calls: UnboundedReceiver<Call>,
}

impl Harness {
    async fn next(&mut self) -> Call {
        self.calls.recv().await.expect("display call")
    }

    async fn expect(&mut self, expected: Call) {
        assert_eq!(self.next().await, expected);
    }

    async fn expect_question(&mut self, number: &str) {
        match self.next().await {
            Call::Question(step) => assert_eq!(step.question_number, number),
            other => panic!("expected question {number}, got {other:?}"),
        }
    }

    async fn expect_results(&mut self) -> QuizResults {
        match self.next().await {
            Call::Results(results) => results,
            other => panic!("expected results, got {other:?}"),
        }
    }

    /// Answer the shown question and wait out the dwell.
    async fn answer(&mut self, handle: &services::QuizHandle, answer: Answer) {
        handle.answer(answer).unwrap();
        self.expect(Call::Highlight(answer == Answer::Yes)).await;
        self.expect(Call::DisableInput).await;
        self.expect(Call::EnableInput).await;
    }
}

fn start(
    config: QuizConfig,
    source: ScriptedSource,
) -> (Harness, services::QuizHandle, tokio::task::JoinHandle<()>) {
    let source = Arc::new(source);
    let stats = StatisticsService::new(fixed_clock(), Arc::new(InMemoryStore::new()));
    let (tx, rx) = mpsc::unbounded_channel();
    let (engine, handle) = QuizEngine::new(
        config,
        source.clone(),
        stats.clone(),
        Box::new(RecordingDisplay(tx)),
    );
    let task = tokio::spawn(engine.run());
    (
        Harness {
            source,
            stats,
            calls: rx,
        },
        handle,
        task,
    )
}

fn rounds_of(n: usize) -> QuizConfig {
    QuizConfig::default().with_questions_amount(NonZeroUsize::new(n).unwrap())
}

#[tokio::test(start_paused = true)]
async fn all_wrong_round_records_zero_once() {
    let (mut h, handle, task) = start(QuizConfig::default(), ScriptedSource::default());
    // Arrives while loading and must be ignored.
    handle.answer(Answer::Yes).unwrap();

    h.expect(Call::ShowLoading).await;
    h.expect(Call::HideLoading).await;
    for number in 1..=10 {
        h.expect_question(&format!("{number}/10")).await;
        h.answer(&handle, Answer::No).await;
    }

    let results = h.expect_results().await;
    assert!(results.text.starts_with("Your result: 0/10\nQuizzes played: 1\n"));

    let snapshot = h.stats.snapshot().await;
    assert_eq!(snapshot.games_played, 1);
    assert_eq!(snapshot.cumulative_correct, 0);
    assert_eq!(snapshot.cumulative_total, 10);

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn perfect_round_sets_best_game() {
    let (mut h, handle, task) = start(rounds_of(3), ScriptedSource::default());

    h.expect(Call::ShowLoading).await;
    h.expect(Call::HideLoading).await;
    for number in 1..=3 {
        h.expect_question(&format!("{number}/3")).await;
        h.answer(&handle, Answer::Yes).await;
    }

    let results = h.expect_results().await;
    assert_eq!(results.title, "This round is over!");
    assert_eq!(results.button_text, "Play again");
    assert!(results.text.contains("Record: 3/3 ("));
    assert!(results.text.ends_with("Average accuracy: 100.00%"));
    assert_eq!(h.stats.best_game().await.correct(), 3);

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn failed_load_shows_error_and_retry_reloads() {
    let (mut h, handle, task) = start(rounds_of(2), ScriptedSource::failing_first(1));

    h.expect(Call::ShowLoading).await;
    h.expect(Call::HideLoading).await;
    h.expect(Call::Error("question source unavailable: offline".into()))
        .await;

    handle.answer(Answer::Yes).unwrap();
    handle.retry_load().unwrap();

    h.expect(Call::ShowLoading).await;
    h.expect(Call::HideLoading).await;
    h.expect_question("1/2").await;
    assert_eq!(h.source.loads(), 2);

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn acknowledging_results_restarts_without_reloading() {
    let (mut h, handle, task) = start(rounds_of(2), ScriptedSource::default());

    h.expect(Call::ShowLoading).await;
    h.expect(Call::HideLoading).await;
    h.expect_question("1/2").await;
    h.answer(&handle, Answer::Yes).await;
    h.expect_question("2/2").await;
    h.answer(&handle, Answer::No).await;
    h.expect_results().await;

    handle.acknowledge_results().unwrap();
    h.expect_question("1/2").await;
    h.answer(&handle, Answer::Yes).await;
    h.expect_question("2/2").await;
    h.answer(&handle, Answer::Yes).await;

    let results = h.expect_results().await;
    assert!(results.text.starts_with("Your result: 2/2\nQuizzes played: 2\n"));
    assert!(results.text.ends_with("Average accuracy: 75.00%"));
    assert_eq!(h.source.loads(), 1);

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reload_during_dwell_discards_pending_advance() {
    let (mut h, handle, task) = start(QuizConfig::default(), ScriptedSource::default());

    h.expect(Call::ShowLoading).await;
    h.expect(Call::HideLoading).await;
    h.expect_question("1/10").await;

    handle.answer(Answer::Yes).unwrap();
    h.expect(Call::Highlight(true)).await;
    h.expect(Call::DisableInput).await;
    handle.retry_load().unwrap();

    h.expect(Call::EnableInput).await;
    h.expect(Call::ShowLoading).await;
    h.expect(Call::HideLoading).await;
    h.expect_question("1/10").await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.calls.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(h.stats.games_played().await, 0);

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn missing_question_asks_for_retry() {
    let source = ScriptedSource::default();
    source.dry.store(true, Ordering::SeqCst);
    let (mut h, handle, task) = start(rounds_of(2), source);

    h.expect(Call::ShowLoading).await;
    h.expect(Call::HideLoading).await;
    h.expect(Call::Error(NO_QUESTION_MESSAGE.into())).await;

    handle.retry_load().unwrap();
    h.expect(Call::ShowLoading).await;
    h.expect(Call::HideLoading).await;
    h.expect_question("1/2").await;

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn engine_stops_when_handles_are_dropped() {
    let (mut h, handle, task) = start(rounds_of(2), ScriptedSource::default());
    h.expect(Call::ShowLoading).await;
    h.expect(Call::HideLoading).await;
    h.expect_question("1/2").await;

    let spare = handle.clone();
    drop(handle);
    drop(spare);
    task.await.unwrap();
}
