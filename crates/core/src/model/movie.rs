use serde::Deserialize;
use thiserror::Error;

use super::QuizQuestion;

/// Highest rating a movie can carry.
pub const MAX_RATING: f32 = 10.0;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum MovieError {
    #[error("movie title cannot be empty")]
    EmptyTitle,

    #[error("movie rating must be within 0..=10, got {0}")]
    InvalidRating(f32),
}

//
// ─── MOVIE ─────────────────────────────────────────────────────────────────────
//

/// Catalogue entry the question factory builds questions from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "MovieDraft")]
pub struct Movie {
    title: String,
    rating: f32,
    image: Vec<u8>,
}

#[derive(Deserialize)]
struct MovieDraft {
    title: String,
    rating: f32,
    #[serde(default)]
    image: Vec<u8>,
}

impl TryFrom<MovieDraft> for Movie {
    type Error = MovieError;

    fn try_from(draft: MovieDraft) -> Result<Self, Self::Error> {
        Movie::new(draft.title, draft.rating, draft.image)
    }
}

impl Movie {
    /// # Errors
    ///
    /// Returns `MovieError::EmptyTitle` for a blank title and
    /// `MovieError::InvalidRating` for a rating outside `0..=10` (or NaN).
    pub fn new(title: impl Into<String>, rating: f32, image: Vec<u8>) -> Result<Self, MovieError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(MovieError::EmptyTitle);
        }
        if !(0.0..=MAX_RATING).contains(&rating) {
            return Err(MovieError::InvalidRating(rating));
        }
        Ok(Self {
            title,
            rating,
            image,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn rating(&self) -> f32 {
        self.rating
    }

    #[must_use]
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Ask whether this movie is rated above `threshold`.
    #[must_use]
    pub fn rating_question(&self, threshold: u8) -> QuizQuestion {
        QuizQuestion::new(
            self.image.clone(),
            format!("Is the rating of this movie greater than {threshold}?"),
            self.rating > f32::from(threshold),
        )
    }
}
