use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::backend::MovieBackend;
use crate::error::AppError;
use crate::models::{Movie, PersonalizedRequest, RecommendRequest};
use crate::store::LikedStore;

/// Message shown when personalized recommendations are requested with an
/// empty liked set. Produced locally, without a backend call.
pub const EMPTY_LIKES_MESSAGE: &str =
    "Please like some movies first to get personalized recommendations";

const EMPTY_GENRES_MESSAGE: &str = "Select at least one genre to get recommendations";

/// Which fetch produced the currently visible result set.
///
/// Replaces the web client's pair of independently mutable fields (selected
/// genres + implicit personalized mode) with a single tagged value, so the
/// mutually exclusive states are exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultContext {
    Popular,
    Genres(Vec<String>),
    Personalized,
}

impl ResultContext {
    /// Genres behind the displayed result set; empty unless genre-based.
    pub fn selected_genres(&self) -> &[String] {
        match self {
            ResultContext::Genres(genres) => genres,
            _ => &[],
        }
    }
}

/// Label the presentation layer puts above the result grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Popular,
    GenreBased,
    Personalized,
}

/// Snapshot of the manager's visible state.
#[derive(Debug, Clone)]
pub struct RecommendationState {
    pub movies: Vec<Movie>,
    pub genres: Vec<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub context: ResultContext,
}

impl RecommendationState {
    fn new() -> Self {
        Self {
            movies: Vec::new(),
            genres: Vec::new(),
            loading: false,
            error: None,
            context: ResultContext::Popular,
        }
    }

    pub fn selected_genres(&self) -> &[String] {
        self.context.selected_genres()
    }
}

/// Owns the recommendation state and coordinates fetches against the backend.
///
/// Every fetch takes a monotonic sequence token at start; a completion whose
/// token is no longer the latest issued is discarded, so the last *issued*
/// operation wins regardless of completion order. Likes are forwarded to the
/// [`LikedStore`] and, when the set is non-empty afterwards, schedule a
/// delayed fire-and-forget personalized refresh whose failures are logged but
/// never surfaced.
#[derive(Clone)]
pub struct RecommendationManager {
    backend: Arc<dyn MovieBackend>,
    state: Arc<RwLock<RecommendationState>>,
    store: Arc<RwLock<LikedStore>>,
    seq: Arc<AtomicU64>,
    limit: u32,
    refresh_delay: Duration,
    refresh_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl RecommendationManager {
    pub fn new(
        backend: Arc<dyn MovieBackend>,
        store: LikedStore,
        limit: u32,
        refresh_delay: Duration,
    ) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(RecommendationState::new())),
            store: Arc::new(RwLock::new(store)),
            seq: Arc::new(AtomicU64::new(0)),
            limit,
            refresh_delay,
            refresh_task: Arc::new(Mutex::new(None)),
        }
    }

    /// Clone of the current state, for rendering.
    pub async fn state(&self) -> RecommendationState {
        self.state.read().await.clone()
    }

    pub async fn is_liked(&self, movie: &Movie) -> bool {
        self.store.read().await.is_liked(movie)
    }

    pub async fn liked_movies(&self) -> Vec<Movie> {
        self.store.read().await.movies().to_vec()
    }

    /// Label precedence: genre-based beats personalized beats popular.
    pub async fn display_mode(&self) -> DisplayMode {
        let state = self.state.read().await;
        if matches!(state.context, ResultContext::Genres(_)) {
            return DisplayMode::GenreBased;
        }
        drop(state);
        if self.store.read().await.is_empty() {
            DisplayMode::Popular
        } else {
            DisplayMode::Personalized
        }
    }

    /// Startup sequence, run once: genre catalog first, then popular movies.
    ///
    /// The popular fetch runs even when the catalog fetch failed, and its
    /// success does not clear the recorded catalog error. `loading` wraps the
    /// two steps as a single unit.
    pub async fn initialize(&self) {
        let token = self.begin_fetch().await;

        let genres = self.backend.get_genres().await;
        {
            if !self.is_current(token) {
                return;
            }
            let mut state = self.state.write().await;
            match genres {
                Ok(genres) => state.genres = genres,
                Err(e) => {
                    tracing::warn!(error = %e, "Genre catalog fetch failed");
                    state.genres = Vec::new();
                    state.error = Some(e.to_string());
                }
            }
        }

        let popular = self.backend.get_popular_movies(self.limit).await;
        if !self.is_current(token) {
            return;
        }
        let mut state = self.state.write().await;
        match popular {
            Ok(movies) => {
                state.movies = movies;
                state.context = ResultContext::Popular;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Initial popular fetch failed");
                state.movies = Vec::new();
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
    }

    /// Fetch popular movies, clearing any genre selection.
    pub async fn load_popular(&self) {
        let token = self.begin_fetch().await;
        let result = self.backend.get_popular_movies(self.limit).await;
        self.finish_fetch(token, result, ResultContext::Popular, false)
            .await;
    }

    /// Search by title. A blank query behaves exactly as [`load_popular`].
    ///
    /// [`load_popular`]: Self::load_popular
    pub async fn search(&self, query: &str) {
        if query.trim().is_empty() {
            self.load_popular().await;
            return;
        }

        let token = self.begin_fetch().await;
        let result = self.backend.search_movies(query, self.limit).await;
        self.finish_fetch(token, result, ResultContext::Popular, false)
            .await;
    }

    /// Genre-filtered recommendations with any-of matching.
    pub async fn recommend_by_genres(&self, genres: Vec<String>) {
        if genres.is_empty() {
            self.state.write().await.error = Some(EMPTY_GENRES_MESSAGE.to_string());
            return;
        }

        let token = self.begin_fetch().await;
        let request = RecommendRequest {
            genres: genres.clone(),
            limit: self.limit,
            match_all: false,
        };
        let result = self.backend.get_recommendations(request).await;
        self.finish_fetch(token, result, ResultContext::Genres(genres), false)
            .await;
    }

    /// Recommendations personalized on the full liked set.
    ///
    /// With an empty liked set this fails locally: the validation message is
    /// recorded and no request is issued, leaving `movies` and `loading`
    /// untouched.
    pub async fn recommend_personalized(&self) {
        let liked = self.liked_movies().await;
        if liked.is_empty() {
            self.state.write().await.error = Some(EMPTY_LIKES_MESSAGE.to_string());
            return;
        }
        self.fetch_personalized(liked, false).await;
    }

    /// Toggle the liked state of `movie`. Returns true when it is liked
    /// after the call.
    ///
    /// A like (never an unlike) that leaves the set non-empty schedules a
    /// personalized refresh after the configured delay, decoupled from the
    /// triggering interaction. Scheduling again replaces a still-pending
    /// refresh.
    pub async fn toggle_like(&self, movie: &Movie) -> bool {
        let (liked, snapshot) = {
            let mut store = self.store.write().await;
            let liked = store.toggle_like(movie);
            (liked, store.movies().to_vec())
        };

        if liked && !snapshot.is_empty() {
            self.schedule_refresh(snapshot);
        }

        liked
    }

    /// Abort a still-pending like-triggered refresh. In-flight requests run
    /// to completion; their results are discarded by the sequence token.
    pub fn shutdown(&self) {
        if let Some(task) = self.take_refresh_task() {
            task.abort();
        }
    }

    fn schedule_refresh(&self, liked: Vec<Movie>) {
        let manager = self.clone();
        let delay = self.refresh_delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(liked = liked.len(), "Running like-triggered personalized refresh");
            manager.fetch_personalized(liked, true).await;
        });

        if let Some(previous) = self.replace_refresh_task(task) {
            previous.abort();
        }
    }

    async fn fetch_personalized(&self, liked: Vec<Movie>, quiet: bool) {
        let token = self.begin_fetch().await;
        let request = PersonalizedRequest {
            liked_movies: liked,
            limit: self.limit,
        };
        let result = self.backend.get_personalized_recommendations(request).await;
        self.finish_fetch(token, result, ResultContext::Personalized, quiet)
            .await;
    }

    /// Issues the next sequence token and flags the fetch as in flight.
    async fn begin_fetch(&self) -> u64 {
        let token = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.write().await;
        state.loading = true;
        state.error = None;
        token
    }

    /// Applies a completed fetch unless a newer one has been issued since.
    ///
    /// `quiet` fetches (the like-triggered refresh) swallow failures: loading
    /// still toggles off, but no error message is recorded and the visible
    /// movies are kept.
    async fn finish_fetch(
        &self,
        token: u64,
        result: Result<Vec<Movie>, AppError>,
        context: ResultContext,
        quiet: bool,
    ) {
        if !self.is_current(token) {
            tracing::debug!(token, "Discarding stale fetch result");
            return;
        }

        let mut state = self.state.write().await;
        match result {
            Ok(movies) => {
                state.movies = movies;
                state.context = context;
            }
            Err(e) if quiet => {
                tracing::warn!(error = %e, "Background personalized refresh failed");
            }
            Err(e) => {
                state.error = Some(e.to_string());
                state.movies = Vec::new();
            }
        }
        state.loading = false;
    }

    fn is_current(&self, token: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == token
    }

    fn replace_refresh_task(&self, task: JoinHandle<()>) -> Option<JoinHandle<()>> {
        match self.refresh_task.lock() {
            Ok(mut slot) => slot.replace(task),
            Err(poisoned) => poisoned.into_inner().replace(task),
        }
    }

    fn take_refresh_task(&self) -> Option<JoinHandle<()>> {
        match self.refresh_task.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockMovieBackend;
    use mockall::predicate::eq;

    fn movie(title: &str) -> Movie {
        Movie {
            title: title.to_string(),
            release_date: None,
            vote_average: 8.0,
            popularity: 100.0,
            genres: vec!["Action".to_string()],
            overview: None,
            homepage: None,
        }
    }

    fn manager_with(backend: MockMovieBackend) -> (tempfile::TempDir, RecommendationManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = LikedStore::load(dir.path().join("likedMovies.json"));
        let manager = RecommendationManager::new(
            Arc::new(backend),
            store,
            24,
            Duration::from_millis(1),
        );
        (dir, manager)
    }

    #[tokio::test]
    async fn load_popular_replaces_movies_and_clears_selection() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_get_popular_movies()
            .with(eq(24))
            .times(1)
            .returning(|_| Ok(vec![movie("Dune"), movie("Arrival")]));
        let (_dir, manager) = manager_with(backend);

        manager.load_popular().await;

        let state = manager.state().await;
        assert_eq!(state.movies.len(), 2);
        assert_eq!(state.context, ResultContext::Popular);
        assert!(state.selected_genres().is_empty());
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn blank_search_falls_back_to_popular() {
        let mut backend = MockMovieBackend::new();
        // No search expectation: a search call would panic the mock.
        backend
            .expect_get_popular_movies()
            .with(eq(24))
            .times(1)
            .returning(|_| Ok(vec![movie("Dune")]));
        let (_dir, manager) = manager_with(backend);

        manager.search("   ").await;

        let state = manager.state().await;
        assert_eq!(state.movies.len(), 1);
        assert_eq!(state.context, ResultContext::Popular);
    }

    #[tokio::test]
    async fn genre_recommendations_record_the_selection() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_get_recommendations()
            .withf(|request| {
                request.genres == ["Action", "Comedy"] && !request.match_all && request.limit == 24
            })
            .times(1)
            .returning(|_| Ok(vec![movie("Hot Fuzz")]));
        let (_dir, manager) = manager_with(backend);

        manager
            .recommend_by_genres(vec!["Action".to_string(), "Comedy".to_string()])
            .await;

        let state = manager.state().await;
        assert_eq!(state.selected_genres(), ["Action", "Comedy"]);
        assert_eq!(manager.display_mode().await, DisplayMode::GenreBased);
    }

    #[tokio::test]
    async fn empty_genre_selection_fails_locally() {
        let backend = MockMovieBackend::new();
        let (_dir, manager) = manager_with(backend);

        manager.recommend_by_genres(Vec::new()).await;

        let state = manager.state().await;
        assert_eq!(state.error.as_deref(), Some(EMPTY_GENRES_MESSAGE));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn personalized_with_no_likes_never_calls_the_backend() {
        let backend = MockMovieBackend::new();
        let (_dir, manager) = manager_with(backend);

        manager.recommend_personalized().await;

        let state = manager.state().await;
        assert_eq!(state.error.as_deref(), Some(EMPTY_LIKES_MESSAGE));
        assert!(state.movies.is_empty());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn failed_fetch_surfaces_message_and_clears_movies() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_get_popular_movies()
            .times(2)
            .returning(|_| Ok(vec![movie("Dune")]));
        backend
            .expect_get_recommendations()
            .times(1)
            .returning(|_| Err(AppError::Backend("model unavailable".to_string())));
        let (_dir, manager) = manager_with(backend);

        manager.load_popular().await;
        manager.recommend_by_genres(vec!["Action".to_string()]).await;

        let state = manager.state().await;
        assert_eq!(state.error.as_deref(), Some("model unavailable"));
        assert!(state.movies.is_empty());
        assert!(!state.loading);

        // The next successful fetch clears the message again.
        manager.load_popular().await;
        let state = manager.state().await;
        assert_eq!(state.error, None);
        assert_eq!(state.movies.len(), 1);
    }

    #[tokio::test]
    async fn display_mode_prefers_personalized_once_likes_exist() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_get_personalized_recommendations()
            .returning(|_| Ok(vec![movie("Blade Runner")]));
        let (_dir, manager) = manager_with(backend);

        assert_eq!(manager.display_mode().await, DisplayMode::Popular);

        manager.toggle_like(&movie("Dune")).await;
        assert_eq!(manager.display_mode().await, DisplayMode::Personalized);

        manager.shutdown();
    }
}
