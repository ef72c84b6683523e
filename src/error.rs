/// Application-level errors
///
/// `Backend` carries the message from a JSON `error` field verbatim: the UI
/// surfaces it to the user unchanged, so no prefix is added. Same for
/// `Validation`, which holds locally produced user-facing messages.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("backend returned HTTP status {0}")]
    Transport(u16),

    #[error("{0}")]
    Backend(String),

    #[error("{0}")]
    Validation(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_displays_bare_message() {
        let err = AppError::Backend("model unavailable".to_string());
        assert_eq!(err.to_string(), "model unavailable");
    }

    #[test]
    fn transport_error_carries_status() {
        let err = AppError::Transport(503);
        assert_eq!(err.to_string(), "backend returned HTTP status 503");
    }
}
