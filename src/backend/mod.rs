/// Recommendation backend abstraction
///
/// The backend is an opaque remote service: genre catalog, popularity ranking
/// and personalization all live behind the HTTP contract. The trait exists so
/// the state manager takes the client by injection and tests can substitute
/// a double.
use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{HealthResponse, Movie, PersonalizedRequest, RecommendRequest},
};

pub mod http;

pub use http::HttpBackend;

/// Client operations against the recommendation backend.
///
/// Every call maps to exactly one HTTP request; there is no retry or backoff,
/// and all failures propagate to the caller unmodified.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieBackend: Send + Sync {
    /// Fetch the full genre catalog.
    async fn get_genres(&self) -> AppResult<Vec<String>>;

    /// Fetch up to `limit` popular movies.
    async fn get_popular_movies(&self, limit: u32) -> AppResult<Vec<Movie>>;

    /// Search movies by title substring.
    async fn search_movies(&self, query: &str, limit: u32) -> AppResult<Vec<Movie>>;

    /// Fetch genre-filtered recommendations.
    async fn get_recommendations(&self, request: RecommendRequest) -> AppResult<Vec<Movie>>;

    /// Fetch recommendations personalized on the given liked set.
    async fn get_personalized_recommendations(
        &self,
        request: PersonalizedRequest,
    ) -> AppResult<Vec<Movie>>;

    /// Probe backend connectivity.
    async fn health_check(&self) -> AppResult<HealthResponse>;
}
