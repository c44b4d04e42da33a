use thiserror::Error;

/// foodgle-insights error types
#[derive(Error, Debug)]
pub enum InsightsError {
    /// Failed to parse a JSON payload or a setting value
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend request failed
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for foodgle-insights
pub type Result<T> = std::result::Result<T, InsightsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InsightsError::Parse("invalid json".into());
        assert_eq!(err.to_string(), "parse error: invalid json");
    }

    #[test]
    fn test_fetch_error_display() {
        let err = InsightsError::Fetch("HTTP 502 for /orders".into());
        assert_eq!(err.to_string(), "fetch error: HTTP 502 for /orders");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InsightsError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
