/// HTTP implementation of the recommendation backend client
///
/// One request per call against a fixed base URL. A non-2xx status is a
/// `Transport` failure carrying the status code; a 2xx body holding a
/// top-level `error` field is a `Backend` failure carrying that message.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{GenresResponse, HealthResponse, Movie, MoviesResponse, PersonalizedRequest, RecommendRequest},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Clone)]
pub struct HttpBackend {
    http_client: HttpClient,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http_client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path = %path, status = status.as_u16(), "Backend request failed");
            return Err(AppError::Transport(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        tracing::debug!(path = %path, "Backend response received");
        decode_payload(payload)
    }
}

/// Rejects 2xx bodies that carry an `error` field, then deserializes.
fn decode_payload<T: DeserializeOwned>(payload: Value) -> AppResult<T> {
    if let Some(message) = payload.get("error").and_then(Value::as_str) {
        return Err(AppError::Backend(message.to_string()));
    }

    serde_json::from_value(payload)
        .map_err(|e| AppError::Backend(format!("malformed backend response: {}", e)))
}

#[async_trait::async_trait]
impl super::MovieBackend for HttpBackend {
    async fn get_genres(&self) -> AppResult<Vec<String>> {
        let path = "/genres";
        tracing::debug!(path = %path, "Fetching genre catalog");
        let response = self.http_client.get(self.url(path)).send().await?;
        let genres: GenresResponse = Self::decode(path, response).await?;
        Ok(genres.genres)
    }

    async fn get_popular_movies(&self, limit: u32) -> AppResult<Vec<Movie>> {
        let path = "/movies/popular";
        tracing::debug!(path = %path, limit, "Fetching popular movies");
        let response = self
            .http_client
            .get(self.url(path))
            .query(&[("limit", limit)])
            .send()
            .await?;
        let movies: MoviesResponse = Self::decode(path, response).await?;

        tracing::info!(results = movies.movies.len(), "Popular movies fetched");
        Ok(movies.movies)
    }

    async fn search_movies(&self, query: &str, limit: u32) -> AppResult<Vec<Movie>> {
        let path = "/movies/search";
        tracing::debug!(path = %path, query = %query, limit, "Searching movies");
        let response = self
            .http_client
            .get(self.url(path))
            .query(&[("q", query.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;
        let movies: MoviesResponse = Self::decode(path, response).await?;

        tracing::info!(query = %query, results = movies.movies.len(), "Movie search completed");
        Ok(movies.movies)
    }

    async fn get_recommendations(&self, request: RecommendRequest) -> AppResult<Vec<Movie>> {
        let path = "/movies/recommend";
        tracing::debug!(path = %path, genres = ?request.genres, "Fetching genre recommendations");
        let response = self
            .http_client
            .post(self.url(path))
            .json(&request)
            .send()
            .await?;
        let movies: MoviesResponse = Self::decode(path, response).await?;

        tracing::info!(results = movies.movies.len(), "Genre recommendations fetched");
        Ok(movies.movies)
    }

    async fn get_personalized_recommendations(
        &self,
        request: PersonalizedRequest,
    ) -> AppResult<Vec<Movie>> {
        let path = "/movies/personalized";
        tracing::debug!(
            path = %path,
            liked = request.liked_movies.len(),
            "Fetching personalized recommendations"
        );
        let response = self
            .http_client
            .post(self.url(path))
            .json(&request)
            .send()
            .await?;
        let movies: MoviesResponse = Self::decode(path, response).await?;

        tracing::info!(results = movies.movies.len(), "Personalized recommendations fetched");
        Ok(movies.movies)
    }

    async fn health_check(&self) -> AppResult<HealthResponse> {
        let path = "/health";
        let response = self.http_client.get(self.url(path)).send().await?;
        Self::decode(path, response).await
    }
}
