use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::ApiEnvelope;
use crate::runner::{Classification, ProbeResult};
use crate::session::RunSession;

/// What a probe sees after its call has been recorded
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Position of the recorded result in the session
    pub index: usize,
    pub classification: Classification,
    pub status_code: Option<u16>,
    pub error_message: Option<String>,
    pub body: Option<Value>,
}

impl ProbeOutcome {
    pub fn passed(&self) -> bool {
        self.classification == Classification::Pass
    }

    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status_code, Some(401 | 403))
    }

    pub fn envelope(&self) -> ApiEnvelope {
        ApiEnvelope::from_body(self.body.as_ref())
    }

    pub fn error_text(&self) -> &str {
        self.error_message.as_deref().unwrap_or("unknown error")
    }
}

/// Issue one request and append exactly one result to the session.
///
/// Transport failures are recorded as ERROR with no status code; a completed
/// call is PASS when the status matches `expected` and FAIL otherwise.
pub async fn execute(
    client: &ApiClient,
    session: &mut RunSession,
    request: ApiRequest,
    expected: u16,
) -> ProbeOutcome {
    debug!(method = %request.method, url = %client.url_for(&request.path), "sending probe");

    let started = Instant::now();
    let sent = client.send(&request).await;
    let response_time_ms = started.elapsed().as_secs_f64() * 1000.0;

    let result = match sent {
        Ok(response) => {
            let classification = Classification::from_status(response.status, expected);
            let error_message = mismatch_message(classification, response.status, expected);
            debug!(
                status = response.status,
                elapsed_ms = response_time_ms,
                %classification,
                "probe completed"
            );
            ProbeResult {
                endpoint: request.path,
                method: request.method,
                status_code: Some(response.status),
                expected_status: expected,
                classification,
                response_time_ms,
                error_message,
                response_body: response.body,
            }
        }
        Err(err) => {
            warn!(
                method = %request.method,
                path = %request.path,
                error = %err,
                "probe transport failure"
            );
            ProbeResult {
                endpoint: request.path,
                method: request.method,
                status_code: None,
                expected_status: expected,
                classification: Classification::Error,
                response_time_ms,
                error_message: Some(err.to_string()),
                response_body: None,
            }
        }
    };

    let outcome = ProbeOutcome {
        index: 0,
        classification: result.classification,
        status_code: result.status_code,
        error_message: result.error_message.clone(),
        body: result.response_body.clone(),
    };
    let index = session.record(result);

    ProbeOutcome { index, ..outcome }
}

fn mismatch_message(
    classification: Classification,
    observed: u16,
    expected: u16,
) -> Option<String> {
    if classification != Classification::Fail {
        return None;
    }
    if matches!(observed, 401 | 403) {
        Some(format!("Authentication required (got {observed})"))
    } else {
        Some(format!("Expected {expected}, got {observed}"))
    }
}
