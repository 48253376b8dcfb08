use thiserror::Error;

/// chargeview error types
#[derive(Error, Debug)]
pub enum ChargeviewError {
    /// Request failed in transport or returned a non-success status
    #[error("http error: {0}")]
    Http(String),

    /// Response body could not be decoded into the expected report
    #[error("decode error: {0}")]
    Decode(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for chargeview
pub type Result<T> = std::result::Result<T, ChargeviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChargeviewError::Decode("expected object".into());
        assert_eq!(err.to_string(), "decode error: expected object");
    }

    #[test]
    fn test_http_error_display() {
        let err = ChargeviewError::Http("status 503".into());
        assert_eq!(err.to_string(), "http error: status 503");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ChargeviewError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
