use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::models::Movie;

/// Durable set of liked movies, keyed by title.
///
/// The full set is rewritten to disk as JSON on every mutation, mirroring the
/// single `likedMovies` storage entry of the web client. A missing or
/// unreadable file hydrates to the empty set; persistence failures are logged
/// and never surfaced, so a broken disk degrades the feature instead of the
/// session.
pub struct LikedStore {
    path: PathBuf,
    movies: Vec<Movie>,
}

impl LikedStore {
    /// Hydrate the store from `path`, defaulting to empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let movies = match read_liked(&path) {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load liked movies, starting empty");
                Vec::new()
            }
        };
        Self { path, movies }
    }

    /// Toggle membership of `movie` by title. Returns true when the movie is
    /// liked after the call, false when it was removed.
    pub fn toggle_like(&mut self, movie: &Movie) -> bool {
        let liked = if self.is_liked(movie) {
            self.movies.retain(|liked| liked.title != movie.title);
            false
        } else {
            self.movies.push(movie.clone());
            true
        };

        if let Err(e) = self.persist() {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist liked movies");
        }

        liked
    }

    pub fn is_liked(&self, movie: &Movie) -> bool {
        self.movies.iter().any(|liked| liked.title == movie.title)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    fn persist(&self) -> AppResult<()> {
        let json = serde_json::to_string(&self.movies)
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| AppError::Persistence(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), liked = self.movies.len(), "Liked movies persisted");
        Ok(())
    }
}

fn read_liked(path: &Path) -> AppResult<Vec<Movie>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(path).map_err(|e| AppError::Persistence(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| AppError::Persistence(e.to_string()))
}
