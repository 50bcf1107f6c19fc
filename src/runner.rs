//! Types for probe results.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Outcome of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    /// Observed status matched the expected one
    Pass,
    /// The server answered with a different status
    Fail,
    /// No response was obtained (connect failure, timeout, DNS)
    Error,
    /// A mismatch recognized as an accepted business or auth outcome
    Skip,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Pass,
        Classification::Fail,
        Classification::Error,
        Classification::Skip,
    ];

    /// Classify a completed exchange
    pub fn from_status(observed: u16, expected: u16) -> Self {
        if observed == expected {
            Classification::Pass
        } else {
            Classification::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Pass => "PASS",
            Classification::Fail => "FAIL",
            Classification::Error => "ERROR",
            Classification::Skip => "SKIP",
        }
    }

    /// FAIL and ERROR results get a detail block in the summary
    pub fn is_failure(&self) -> bool {
        matches!(self, Classification::Fail | Classification::Error)
    }
}

impl Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        };
        write!(f, "{label}")
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

/// Record of one HTTP call attempted by the harness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Path relative to the base URL (e.g. "/leads/42")
    pub endpoint: String,

    pub method: HttpMethod,

    /// Observed status code (None when the call never completed)
    pub status_code: Option<u16>,

    pub expected_status: u16,

    #[serde(rename = "test_status")]
    pub classification: Classification,

    /// Wall-clock time of the call in milliseconds
    pub response_time_ms: f64,

    pub error_message: Option<String>,

    /// Decoded body, or `{"raw": ...}` when it was not JSON
    pub response_body: Option<serde_json::Value>,
}

impl ProbeResult {
    /// Observed status for display; transport failures show as 0
    pub fn status_display(&self) -> u16 {
        self.status_code.unwrap_or(0)
    }

    /// Server-provided `message` or `error` field, if the body carries one
    pub fn api_message(&self) -> Option<&str> {
        let body = self.response_body.as_ref()?;
        body.get("message")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .or_else(|| body.get("error").and_then(|v| v.as_str()).filter(|s| !s.is_empty()))
    }
}
