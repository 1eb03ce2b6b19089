//! Wire types of the Dyxless `/query` endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One record returned by the API: an ordered JSON object. The `table_name` key names the source database.
pub type Record = Map<String, Value>;

/// Search kind. The wire value of the standard search is spelled `standart` by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryType {
    #[serde(rename = "standart")]
    Standard,
    #[serde(rename = "telegram")]
    Telegram,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Standard => "standart",
            QueryType::Telegram => "telegram",
        }
    }

    /// Parses the wire value (also accepts `standard`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "standart" | "standard" => Some(QueryType::Standard),
            "telegram" => Some(QueryType::Telegram),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body of `POST /query`.
#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub token: &'a str,
    pub query: &'a str,
    #[serde(rename = "type")]
    pub query_type: QueryType,
}

/// Response body of `POST /query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub counts: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl QueryResponse {
    /// Successful response carrying at least one record.
    pub fn has_results(&self) -> bool {
        self.status && self.counts > 0
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Record>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Record>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw outcome of a diagnostic request.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    /// First 1000 characters of the body.
    pub body_preview: String,
    /// Decoded body when the status is 200 and the body parses.
    pub response: Option<QueryResponse>,
}
