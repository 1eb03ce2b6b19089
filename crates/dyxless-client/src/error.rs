//! Errors returned by the Dyxless client.

use thiserror::Error;

/// Failure of a single Dyxless API call.
#[derive(Error, Debug)]
pub enum DyxlessError {
    /// HTTP 402: the account has no money left. Further paid requests will fail the same way.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// HTTP 401: the API token is wrong or revoked.
    #[error("unauthorized: check DYXLESS_API_TOKEN")]
    Unauthorized,

    /// HTTP 404: the endpoint URL is wrong.
    #[error("API endpoint not found")]
    NotFound,

    /// HTTP 429: the provider-side rate limit was hit.
    #[error("too many requests")]
    RateLimited,

    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DyxlessError {
    /// Maps a non-200 status to the matching variant.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => DyxlessError::Unauthorized,
            402 => DyxlessError::InsufficientBalance,
            404 => DyxlessError::NotFound,
            429 => DyxlessError::RateLimited,
            _ => DyxlessError::Http { status },
        }
    }

    pub fn is_insufficient_balance(&self) -> bool {
        matches!(self, DyxlessError::InsufficientBalance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(DyxlessError::from_status(402).is_insufficient_balance());
        assert!(matches!(DyxlessError::from_status(401), DyxlessError::Unauthorized));
        assert!(matches!(DyxlessError::from_status(404), DyxlessError::NotFound));
        assert!(matches!(DyxlessError::from_status(429), DyxlessError::RateLimited));
        assert!(matches!(
            DyxlessError::from_status(503),
            DyxlessError::Http { status: 503 }
        ));
    }
}
