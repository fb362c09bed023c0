use err_derive::Error;
use std::fmt::Debug;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(display = "Web request error: {}", _0)]
    Request(#[error(source)] reqwest::Error),

    #[error(display = "Server responded with {}: {}", _0, _1)]
    Status(reqwest::StatusCode, String),

    #[error(display = "JSON error: {}", _0)]
    Json(#[error(source)] serde_json::Error),
}

impl ApiError {
    /// Whether retrying the same request later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Request(e) => e.is_timeout() || e.is_connect(),
            ApiError::Status(s, _) => s.is_server_error(),
            ApiError::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors() {
        let e = ApiError::Status(reqwest::StatusCode::BAD_GATEWAY, "upstream down".into());
        assert!(e.is_transient());
        assert_eq!(
            e.to_string(),
            "Server responded with 502 Bad Gateway: upstream down"
        );

        let e = ApiError::Status(reqwest::StatusCode::NOT_FOUND, String::new());
        assert!(!e.is_transient());
    }
}
