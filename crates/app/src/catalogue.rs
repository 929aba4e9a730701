use quiz_core::model::{Movie, MovieError};

const BUILT_IN: &[(&str, f32)] = &[
    ("The Godfather", 9.2),
    ("The Dark Knight", 9.0),
    ("Kill Bill", 8.2),
    ("The Avengers", 8.0),
    ("Deadpool", 8.0),
    ("The Green Knight", 6.6),
    ("Old", 5.8),
    ("The Ice Age Adventures of Buck Wild", 4.3),
    ("Tesla", 5.1),
    ("Vivarium", 5.8),
];

/// Catalogue used when no `--movies` file is given.
///
/// # Errors
///
/// Returns `MovieError` if a built-in entry is invalid.
pub fn built_in_movies() -> Result<Vec<Movie>, MovieError> {
    BUILT_IN
        .iter()
        .map(|(title, rating)| Movie::new(*title, *rating, Vec::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_catalogue_is_valid() {
        let movies = built_in_movies().unwrap();
        assert_eq!(movies.len(), BUILT_IN.len());
    }
}
