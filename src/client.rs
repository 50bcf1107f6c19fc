//! HTTP client for the lead management API.
//!
//! Thin wrapper over `reqwest` that:
//! - Applies the per-request timeout to every call
//! - Attaches bearer tokens, query parameters and JSON bodies
//! - Decodes response bodies leniently (JSON, else a truncated raw-text wrapper)

use reqwest::header::{ACCEPT, HeaderValue};
use serde_json::Value;
use std::time::Duration;

use crate::harness::types::HarnessResult;
use crate::runner::HttpMethod;

/// Maximum characters kept from a body that is not valid JSON
pub const RAW_BODY_LIMIT: usize = 500;

/// Errors that prevent a response from being obtained
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("connection failed: {0}")]
    Connect(reqwest::Error),
    #[error("request failed: {0}")]
    Other(reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err)
        } else if err.is_connect() {
            TransportError::Connect(err)
        } else {
            TransportError::Other(err)
        }
    }
}

/// One outbound call, described independently of the transport
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the base URL, with a leading `/`
    pub path: String,
    pub token: Option<String>,
    pub query: Vec<(String, String)>,
    pub json: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            token: None,
            query: Vec::new(),
            json: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }
}

/// Status and decoded body of a completed call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> HarnessResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue the request and wait for the full body
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let method: reqwest::Method = request.method.into();
        let mut builder = self
            .http
            .request(method, self.url_for(&request.path))
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = request.token.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(ApiResponse {
            status,
            body: decode_body(&text),
        })
    }
}

/// Decode a response body.
///
/// Empty bodies yield `None`. Bodies that are not JSON are kept as
/// `{"raw": <first RAW_BODY_LIMIT chars>}`.
pub fn decode_body(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Some(value),
        Err(_) => {
            let raw: String = text.chars().take(RAW_BODY_LIMIT).collect();
            Some(serde_json::json!({ "raw": raw }))
        }
    }
}
