//! # Dyxless API client
//!
//! Thin binding over the Dyxless lookup service: one JSON `POST /query` endpoint authenticated by a
//! token in the request body.
//!
//! ```rust,no_run
//! use dyxless_client::{DyxlessClient, LookupApi, QueryType};
//!
//! async fn example() -> Result<(), dyxless_client::DyxlessError> {
//!     let client = DyxlessClient::with_token("your-token".to_string())?;
//!     let response = client.lookup("7736207543", QueryType::Standard).await?;
//!     println!("found {} record(s)", response.counts);
//!     Ok(())
//! }
//! ```
//!
//! Status mapping: 200 → [`QueryResponse`], 402 → [`DyxlessError::InsufficientBalance`],
//! 401/404/429 → dedicated variants, anything else → [`DyxlessError::Http`].

mod error;
mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info, instrument};

pub use error::DyxlessError;
pub use types::{ProbeReport, QueryResponse, QueryType, Record};

use types::QueryRequest;

/// Production endpoint.
pub const DEFAULT_API_URL: &str = "https://api-dyxless.cfd/query";

/// Default total request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PROBE_PREVIEW_CHARS: usize = 1000;

/// Masks a token for logs: first 7 + `***` + last 4 chars; tokens of 11 chars or fewer become `***`.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Anything that can answer a lookup. Implemented by [`DyxlessClient`]; tests substitute canned responses.
#[async_trait]
pub trait LookupApi: Send + Sync {
    async fn lookup(&self, query: &str, query_type: QueryType) -> Result<QueryResponse, DyxlessError>;
}

/// HTTP client for the Dyxless API.
#[derive(Debug, Clone)]
pub struct DyxlessClient {
    client: Client,
    api_token: String,
    base_url: String,
}

impl DyxlessClient {
    /// Creates a client for `base_url` with the given total request timeout.
    pub fn new(api_token: String, base_url: String, timeout: Duration) -> Result<Self, DyxlessError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_token,
            base_url,
        })
    }

    /// Client for the production endpoint with the default timeout.
    pub fn with_token(api_token: String) -> Result<Self, DyxlessError> {
        Self::new(api_token, DEFAULT_API_URL.to_string(), DEFAULT_TIMEOUT)
    }

    /// Client for a custom endpoint (e.g. a mock server) with the default timeout.
    pub fn with_base_url(api_token: String, base_url: String) -> Result<Self, DyxlessError> {
        Self::new(api_token, base_url, DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token in masked form, safe for logs.
    pub fn masked_token(&self) -> String {
        mask_token(&self.api_token)
    }

    /// Runs one search. Each successful call is billed by the provider.
    #[instrument(skip(self), fields(api_token = %self.masked_token()))]
    pub async fn query(&self, query: &str, query_type: QueryType) -> Result<QueryResponse, DyxlessError> {
        let response = self.post(query, query_type).await.map_err(|e| {
            error!(error = %e, query = %query, "Dyxless request failed");
            e
        })?;

        let status = response.status().as_u16();
        if status != 200 {
            error!(status, query = %query, "Dyxless returned non-success status");
            return Err(DyxlessError::from_status(status));
        }

        let body = response.text().await?;
        let parsed: QueryResponse = serde_json::from_str(&body)?;
        info!(
            query = %query,
            query_type = %query_type,
            status = parsed.status,
            counts = parsed.counts,
            "Dyxless query completed"
        );
        Ok(parsed)
    }

    /// Diagnostic request: returns status, headers and a body preview instead of failing on non-200.
    #[instrument(skip(self), fields(api_token = %self.masked_token()))]
    pub async fn probe(&self, query: &str) -> Result<ProbeReport, DyxlessError> {
        let response = self.post(query, QueryType::Standard).await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = response.content_length();
        let body = response.text().await?;
        let body_preview: String = body.chars().take(PROBE_PREVIEW_CHARS).collect();
        let parsed = if status == 200 {
            serde_json::from_str::<QueryResponse>(&body).ok()
        } else {
            None
        };

        Ok(ProbeReport {
            status,
            content_type,
            content_length,
            body_preview,
            response: parsed,
        })
    }

    async fn post(&self, query: &str, query_type: QueryType) -> Result<reqwest::Response, DyxlessError> {
        let request = QueryRequest {
            token: &self.api_token,
            query,
            query_type,
        };
        let response = self
            .client
            .post(&self.base_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl LookupApi for DyxlessClient {
    async fn lookup(&self, query: &str, query_type: QueryType) -> Result<QueryResponse, DyxlessError> {
        self.query(query, query_type).await
    }
}
