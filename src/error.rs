use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The provider answered, but with nothing to analyze.
    #[error("No data available: {0}")]
    DataUnavailable(String),

    #[error("Provider request failed: {0}")]
    ProviderFailure(String),

    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl AppError {
    /// True when the failure came from talking to the statistics provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AppError::ProviderFailure(_)
                | AppError::RateLimited
                | AppError::HttpError(_)
                | AppError::JsonError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_provider_failures() {
        assert!(AppError::HttpError("timeout".to_string()).is_provider_failure());
        assert!(AppError::RateLimited.is_provider_failure());
        assert!(!AppError::DataUnavailable("no matches".to_string()).is_provider_failure());
        assert!(!AppError::ConfigError("bad".to_string()).is_provider_failure());
    }
}
