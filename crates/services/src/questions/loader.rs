use std::path::PathBuf;

use async_trait::async_trait;
use quiz_core::model::Movie;

use crate::error::LoadError;

/// Provides the movie catalogue questions are drawn from.
#[async_trait]
pub trait MoviesLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns `LoadError` if the catalogue cannot be produced.
    async fn load_movies(&self) -> Result<Vec<Movie>, LoadError>;
}

/// A catalogue fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticMoviesLoader {
    movies: Vec<Movie>,
}

impl StaticMoviesLoader {
    #[must_use]
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }
}

#[async_trait]
impl MoviesLoader for StaticMoviesLoader {
    async fn load_movies(&self) -> Result<Vec<Movie>, LoadError> {
        Ok(self.movies.clone())
    }
}

/// Reads a JSON array of movies, e.g.
/// `[{"title": "Heat", "rating": 8.3, "image": [137, 80, 78, 71]}]`.
#[derive(Debug, Clone)]
pub struct JsonFileMoviesLoader {
    path: PathBuf,
}

impl JsonFileMoviesLoader {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MoviesLoader for JsonFileMoviesLoader {
    async fn load_movies(&self) -> Result<Vec<Movie>, LoadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "movie-quiz-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn json_loader_parses_catalogue() {
        let path = temp_file(
            "ok",
            r#"[{"title":"Heat","rating":8.3},{"title":"Cats","rating":2.8,"image":[1,2]}]"#,
        );
        let movies = JsonFileMoviesLoader::new(&path).load_movies().await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].image(), &[1, 2]);
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn json_loader_reports_invalid_entries() {
        let path = temp_file("bad", r#"[{"title":"Heat","rating":42}]"#);
        let err = JsonFileMoviesLoader::new(&path).load_movies().await.unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn json_loader_reports_missing_file() {
        let err = JsonFileMoviesLoader::new("/nonexistent/movies.json")
            .load_movies()
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
