//! Client-side core of a movie recommendation UI.
//!
//! Three pieces: a typed HTTP client for the remote recommendation backend
//! ([`backend`]), a durable liked-movies store ([`store`]), and the async
//! state manager the presentation layer renders from ([`manager`]). A small
//! health poller ([`health`]) tracks backend connectivity for display.

pub mod backend;
pub mod config;
pub mod error;
pub mod health;
pub mod manager;
pub mod models;
pub mod store;

pub use backend::{HttpBackend, MovieBackend};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use health::{BackendHealth, HealthMonitor};
pub use manager::{DisplayMode, RecommendationManager, RecommendationState, ResultContext};
pub use models::Movie;
pub use store::LikedStore;
