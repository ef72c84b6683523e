use std::sync::Arc;

use reelfeed::{
    backend::{HttpBackend, MovieBackend},
    config::Config,
    health::{BackendHealth, HealthMonitor},
    manager::RecommendationManager,
    store::LikedStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelfeed=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let backend: Arc<dyn MovieBackend> = Arc::new(HttpBackend::new(&config)?);
    let store = LikedStore::load(config.liked_movies_path.as_str());
    let manager = RecommendationManager::new(
        Arc::clone(&backend),
        store,
        config.page_limit,
        config.refresh_delay(),
    );
    let monitor = HealthMonitor::start(Arc::clone(&backend), config.health_poll_interval());

    manager.initialize().await;

    let state = manager.state().await;
    if let Some(message) = &state.error {
        eprintln!("error: {}", message);
    }
    println!("{} genres in catalog", state.genres.len());
    for movie in &state.movies {
        println!(
            "  {:5.1}  {}",
            movie.vote_average,
            movie.title
        );
    }

    match monitor.status().await {
        BackendHealth::Connected { movies_count } => {
            println!("backend connected ({} movies)", movies_count)
        }
        BackendHealth::Unavailable => println!("backend not available"),
        BackendHealth::Checking => println!("backend status: checking"),
    }

    manager.shutdown();
    Ok(())
}
