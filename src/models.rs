use serde::{Deserialize, Serialize};

/// A movie as returned by the recommendation backend.
///
/// The backend has no stable numeric identifier; the title doubles as the key
/// for liking and deduplication. Two distinct movies sharing a title are
/// indistinguishable to the liked-movies store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
}

// Wire types for the HTTP contract. The backend includes extra fields
// (`total`, `query`, `based_on`) that the client does not consume; serde
// ignores them by default.

#[derive(Debug, Deserialize)]
pub struct GenresResponse {
    pub genres: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoviesResponse {
    #[serde(default)]
    pub movies: Vec<Movie>,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub movies_count: u64,
}

/// Body of POST /movies/recommend
#[derive(Debug, Clone, Serialize)]
pub struct RecommendRequest {
    pub genres: Vec<String>,
    pub limit: u32,
    pub match_all: bool,
}

/// Body of POST /movies/personalized
#[derive(Debug, Clone, Serialize)]
pub struct PersonalizedRequest {
    pub liked_movies: Vec<Movie>,
    pub limit: u32,
}
