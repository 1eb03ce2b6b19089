//! Mock [`dyxless_client::LookupApi`] returning canned answers per query.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use dyxless_client::{DyxlessError, LookupApi, QueryResponse, QueryType};
use serde_json::json;

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Canned {
    Found(QueryResponse),
    Status(u16),
}

#[derive(Default)]
pub struct MockLookup {
    answers: Mutex<HashMap<String, Canned>>,
    calls: Mutex<Vec<(String, QueryType)>>,
}

#[allow(dead_code)]
impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, query: &str, canned: Canned) -> Self {
        self.answers.lock().unwrap().insert(query.to_string(), canned);
        self
    }

    /// Queries in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn call_types(&self) -> Vec<QueryType> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

/// Successful response with one record holding `phone`.
#[allow(dead_code)]
pub fn found_phone(phone: &str) -> Canned {
    Canned::Found(
        serde_json::from_value(json!({
            "status": true,
            "counts": 1,
            "data": [{"table_name": "egrul", "phone": phone, "name": "ООО Ромашка"}]
        }))
        .unwrap(),
    )
}

#[allow(dead_code)]
pub fn nothing_found() -> Canned {
    Canned::Found(
        serde_json::from_value(json!({"status": true, "counts": 0, "data": []})).unwrap(),
    )
}

#[async_trait]
impl LookupApi for MockLookup {
    async fn lookup(&self, query: &str, query_type: QueryType) -> Result<QueryResponse, DyxlessError> {
        self.calls.lock().unwrap().push((query.to_string(), query_type));
        let canned = self.answers.lock().unwrap().get(query).cloned();
        match canned {
            Some(Canned::Found(resp)) => Ok(resp),
            Some(Canned::Status(status)) => Err(DyxlessError::from_status(status)),
            None => Ok(QueryResponse {
                status: true,
                ..Default::default()
            }),
        }
    }
}
