//! 错误类型
//!
//! 所有失败都被限制在界面内部，不会导致进程崩溃

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid route: {0}")]
    Route(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// 是否值得重试（网络抖动、超时、5xx）
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            AppError::Timeout(_) => true,
            AppError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let server = AppError::Status {
            status: 503,
            url: "x".to_string(),
        };
        let missing = AppError::Status {
            status: 404,
            url: "x".to_string(),
        };
        let decode = AppError::Decode(serde_json::from_str::<u8>("nope").unwrap_err());

        assert!(server.is_transient());
        assert!(!missing.is_transient());
        assert!(!decode.is_transient());
        assert!(AppError::Timeout("x".to_string()).is_transient());
    }
}
