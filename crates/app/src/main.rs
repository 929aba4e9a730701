use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};
use services::{
    Clock, JsonFileMoviesLoader, MovieQuestionFactory, MoviesLoader, QuizConfig, QuizEngine,
    StaticMoviesLoader, StatisticsService,
};
use storage::repository::Storage;

mod catalogue;
mod terminal;

use terminal::{TerminalDisplay, read_input};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidQuestions { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuestions { raw } => {
                write!(f, "invalid --questions value: {raw} (expected a positive number)")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  movie-quiz [--db <sqlite_url|memory>] [--movies <file.json>] [--questions <n>] [--reset-stats]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:movie-quiz.sqlite3");
    eprintln!("  --questions 10");
    eprintln!("  built-in movie list when --movies is omitted");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_MOVIES, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug)]
struct Args {
    database: Database,
    movies: Option<PathBuf>,
    questions: NonZeroUsize,
    reset_stats: bool,
    help: bool,
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut database = match env("QUIZ_DB_URL") {
            Some(raw) => parse_database(raw)?,
            None => Database::Sqlite(normalize_sqlite_url("movie-quiz.sqlite3".into())),
        };
        let mut movies = env("QUIZ_MOVIES")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut questions = services::quiz::DEFAULT_QUESTIONS_AMOUNT;
        let mut reset_stats = false;
        let mut help = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => database = parse_database(require_value(&mut args, "--db")?)?,
                "--movies" => movies = Some(PathBuf::from(require_value(&mut args, "--movies")?)),
                "--questions" => {
                    let value = require_value(&mut args, "--questions")?;
                    questions = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidQuestions { raw: value.clone() })?;
                }
                "--reset-stats" => reset_stats = true,
                "--help" | "-h" => help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            database,
            movies,
            questions,
            reset_stats,
            help,
        })
    }
}

fn parse_database(raw: String) -> Result<Database, ArgsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ArgsError::InvalidDbUrl { raw });
    }
    if trimmed == "memory" || trimmed == "sqlite::memory:" {
        return Ok(Database::Memory);
    }
    Ok(Database::Sqlite(normalize_sqlite_url(trimmed.to_owned())))
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw.starts_with("sqlite://") {
        return raw;
    }

    let path_str = raw.strip_prefix("sqlite:").unwrap_or(raw.as_str());
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn open_storage(database: &Database) -> Result<Storage, Box<dyn std::error::Error>> {
    match database {
        Database::Memory => Ok(Storage::in_memory()),
        Database::Sqlite(url) => {
            prepare_sqlite_file(url)?;
            Ok(Storage::sqlite(url).await?)
        }
    }
}

fn movies_loader(
    movies: Option<&PathBuf>,
) -> Result<Arc<dyn MoviesLoader>, Box<dyn std::error::Error>> {
    let loader: Arc<dyn MoviesLoader> = match movies {
        Some(path) => Arc::new(JsonFileMoviesLoader::new(path)),
        None => Arc::new(StaticMoviesLoader::new(catalogue::built_in_movies()?)),
    };
    Ok(loader)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok()).map_err(
        |e| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let storage = open_storage(&args.database).await?;
    let statistics = StatisticsService::new(Clock::system(), Arc::clone(&storage.kv));
    if args.reset_stats {
        statistics.reset().await?;
        info!("statistics reset");
    }

    let source = Arc::new(MovieQuestionFactory::new(movies_loader(args.movies.as_ref())?));
    let config = QuizConfig::default().with_questions_amount(args.questions);
    let (display, prompt) = TerminalDisplay::new();
    let (engine, handle) = QuizEngine::new(config, source, statistics, Box::new(display));

    let engine_task = tokio::spawn(engine.run());
    if let Err(err) = read_input(handle, prompt).await {
        debug!("input loop ended: {err}");
    }
    engine_task.await?;
    println!();
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(|s| (*s).to_owned()), |_| None)
    }

    #[test]
    fn defaults_use_sqlite_file_and_ten_questions() {
        let args = parse(&[]).unwrap();
        assert!(matches!(args.database, Database::Sqlite(ref url) if url.starts_with("sqlite://")));
        assert_eq!(args.questions.get(), 10);
        assert!(args.movies.is_none());
        assert!(!args.reset_stats);
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "--db",
            "memory",
            "--questions",
            "3",
            "--movies",
            "top.json",
            "--reset-stats",
        ])
        .unwrap();
        assert_eq!(args.database, Database::Memory);
        assert_eq!(args.questions.get(), 3);
        assert_eq!(args.movies, Some(PathBuf::from("top.json")));
        assert!(args.reset_stats);
    }

    #[test]
    fn environment_supplies_fallbacks() {
        let args = Args::parse(Vec::new(), |key| match key {
            "QUIZ_DB_URL" => Some("sqlite::memory:".into()),
            "QUIZ_MOVIES" => Some("/tmp/movies.json".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(args.database, Database::Memory);
        assert_eq!(args.movies, Some(PathBuf::from("/tmp/movies.json")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            parse(&["--questions", "0"]),
            Err(ArgsError::InvalidQuestions { .. })
        ));
        assert!(matches!(
            parse(&["--questions"]),
            Err(ArgsError::MissingValue { flag: "--questions" })
        ));
        assert!(matches!(parse(&["--db", " "]), Err(ArgsError::InvalidDbUrl { .. })));
        assert!(matches!(parse(&["--verbose"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:data/quiz.db".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/quiz.db"));
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/q.db".into()),
            "sqlite:///tmp/q.db"
        );
    }
}
