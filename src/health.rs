use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::backend::MovieBackend;

/// Backend connectivity as shown in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendHealth {
    /// No probe has completed yet.
    Checking,
    Connected { movies_count: u64 },
    Unavailable,
}

/// Periodic `/health` poller, independent of recommendation state.
///
/// Probes immediately on start and then on every interval tick. The poll task
/// is aborted when the monitor is dropped.
pub struct HealthMonitor {
    status: Arc<RwLock<BackendHealth>>,
    task: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn start(backend: Arc<dyn MovieBackend>, poll_interval: Duration) -> Self {
        let status = Arc::new(RwLock::new(BackendHealth::Checking));
        let shared = Arc::clone(&status);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            loop {
                ticker.tick().await;
                let next = match backend.health_check().await {
                    Ok(health) => {
                        tracing::debug!(movies_count = health.movies_count, "Backend healthy");
                        BackendHealth::Connected {
                            movies_count: health.movies_count,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Backend health check failed");
                        BackendHealth::Unavailable
                    }
                };
                *shared.write().await = next;
            }
        });

        Self { status, task }
    }

    pub async fn status(&self) -> BackendHealth {
        self.status.read().await.clone()
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
