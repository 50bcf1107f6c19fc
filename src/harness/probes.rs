//! Named probes against the lead management API.
//!
//! Each probe issues its call(s) through [`execute`], narrates the outcome on
//! stdout and, where the API hands back something later probes need (a token,
//! a lead id), stores it in the [`RunSession`]. Narration never changes a
//! recorded classification, except in [`escalate_lead`].

use serde_json::Value;
use tracing::debug;

use super::executor::{ProbeOutcome, execute};
use super::types::{Credentials, Role};
use crate::client::{ApiClient, ApiRequest};
use crate::payloads;
use crate::runner::Classification;
use crate::session::RunSession;

const OK: u16 = 200;

/// Query filters exercised by [`filter_leads`]
pub const LEAD_FILTERS: [(&str, &str); 4] = [
    ("status", "NEW"),
    ("status", "ASSIGNED"),
    ("leadSource", "Partner Referral"),
    ("assignedTo", "1"),
];

fn announce(method: &str, path: &str, note: Option<&str>) {
    match note {
        Some(note) => println!("\n[TEST] {method} {path} - {note}"),
        None => println!("\n[TEST] {method} {path}"),
    }
}

/// Shared narration: success line, "auth required (expected)" for 401/403,
/// otherwise the stored error description.
fn narrate(outcome: &ProbeOutcome, success: &str, failure: &str) {
    if outcome.passed() {
        println!("  ✓ {success}");
    } else if outcome.is_auth_rejection() {
        println!("  ! Authentication required (expected)");
    } else {
        println!("  ✗ {failure}: {}", outcome.error_text());
    }
}

fn field_display(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// POST /auth/login; returns the issued token when the login succeeded
pub async fn login(
    client: &ApiClient,
    session: &mut RunSession,
    credentials: &Credentials,
    role: Role,
) -> Option<String> {
    announce("POST", "/auth/login", Some(&role.to_string()));
    let request = ApiRequest::post("/auth/login").json(payloads::login(credentials));
    let outcome = execute(client, session, request, OK).await;

    if !outcome.passed() {
        println!("  ✗ Login failed: {}", outcome.error_text());
        return None;
    }

    let envelope = outcome.envelope();
    match envelope.data_str("token") {
        Some(token) if envelope.is_success() => {
            println!("  ✓ Login successful, token obtained");
            Some(token.to_string())
        }
        _ => {
            println!("  ✗ Login failed: {}", envelope.message_or("Unknown error"));
            None
        }
    }
}

/// POST /auth/register with a fresh timestamped user; returns the created username
pub async fn register(client: &ApiClient, session: &mut RunSession) -> Option<String> {
    announce("POST", "/auth/register", None);
    let request =
        ApiRequest::post("/auth/register").json(payloads::register(&payloads::timestamp()));
    let outcome = execute(client, session, request, OK).await;

    let envelope = outcome.envelope();
    if outcome.passed() {
        println!("  ✓ Registration successful");
        envelope.data_str("username").map(str::to_string)
    } else {
        println!("  ✗ Registration failed: {}", outcome.error_text());
        if outcome.body.is_some() {
            println!("    Response: {}", envelope.message_or("Unknown error"));
        }
        None
    }
}

// ============================================================================
// Lead management
// ============================================================================

/// GET /leads (first page); remembers the first lead id if none is held
pub async fn list_leads(client: &ApiClient, session: &mut RunSession) -> ProbeOutcome {
    announce("GET", "/leads", Some("All leads"));
    let request = ApiRequest::get("/leads")
        .token(session.active_token())
        .query("page", 0)
        .query("size", 10);
    let outcome = execute(client, session, request, OK).await;

    narrate(&outcome, "Retrieved leads successfully", "Failed");
    if outcome.passed() {
        let envelope = outcome.envelope();
        let leads = envelope.page_items();
        if !leads.is_empty() {
            println!("    Found {} leads", leads.len());
            session.remember_lead_if_unset(envelope.first_page_id());
        }
    }
    outcome
}

/// GET /leads once per entry of [`LEAD_FILTERS`]
pub async fn filter_leads(client: &ApiClient, session: &mut RunSession) -> Vec<ProbeOutcome> {
    announce("GET", "/leads", Some("With filters"));
    let mut outcomes = Vec::with_capacity(LEAD_FILTERS.len());

    for (key, value) in LEAD_FILTERS {
        let request = ApiRequest::get("/leads")
            .token(session.active_token())
            .query(key, value);
        let outcome = execute(client, session, request, OK).await;

        let filter = format!("{key}={value}");
        if outcome.passed() {
            println!("  ✓ Filter {filter}: Success");
        } else if outcome.is_auth_rejection() {
            println!("  ! Filter {filter}: Auth required (expected)");
        } else {
            println!("  ✗ Filter {filter}: {}", outcome.error_text());
        }
        outcomes.push(outcome);
    }
    outcomes
}

/// POST /leads; a successful create replaces the remembered lead id
pub async fn create_lead(client: &ApiClient, session: &mut RunSession) -> ProbeOutcome {
    announce("POST", "/leads", Some("Create new lead"));
    let request = ApiRequest::post("/leads")
        .token(session.active_token())
        .json(payloads::lead_create(&payloads::timestamp()));
    let outcome = execute(client, session, request, OK).await;

    if outcome.passed() {
        let envelope = outcome.envelope();
        if let Some(id) = envelope.data_id().filter(|_| envelope.is_success()) {
            session.lead_id = Some(id);
            println!("  ✓ Lead created successfully, ID: {id}");
        } else {
            println!("  ✗ Lead creation failed: response carried no lead id");
        }
    } else if outcome.is_auth_rejection() {
        println!("  ! Authentication required (expected)");
    } else {
        println!("  ✗ Lead creation failed: {}", outcome.error_text());
    }
    outcome
}

pub async fn get_lead(client: &ApiClient, session: &mut RunSession, lead_id: i64) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}");
    announce("GET", &path, None);
    let request = ApiRequest::get(path).token(session.active_token());
    let outcome = execute(client, session, request, OK).await;
    narrate(&outcome, "Lead retrieved successfully", "Failed");
    outcome
}

pub async fn update_lead(
    client: &ApiClient,
    session: &mut RunSession,
    lead_id: i64,
) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}");
    announce("PUT", &path, None);
    let request = ApiRequest::put(path)
        .token(session.active_token())
        .json(payloads::lead_update());
    let outcome = execute(client, session, request, OK).await;
    narrate(&outcome, "Lead updated successfully", "Update failed");
    outcome
}

/// GET on a flat-list endpoint, narrating the number of items returned
async fn list_probe(
    client: &ApiClient,
    session: &mut RunSession,
    path: &str,
    noun: &str,
) -> ProbeOutcome {
    announce("GET", path, None);
    let request = ApiRequest::get(path).token(session.active_token());
    let outcome = execute(client, session, request, OK).await;
    let count = outcome.envelope().list_items().len();
    narrate(&outcome, &format!("Retrieved {count} {noun}"), "Failed");
    outcome
}

pub async fn my_leads(client: &ApiClient, session: &mut RunSession) -> ProbeOutcome {
    list_probe(client, session, "/leads/my-leads", "assigned leads").await
}

pub async fn new_leads(client: &ApiClient, session: &mut RunSession) -> ProbeOutcome {
    list_probe(client, session, "/leads/new", "new leads").await
}

pub async fn high_value_leads(client: &ApiClient, session: &mut RunSession) -> ProbeOutcome {
    list_probe(client, session, "/leads/high-value", "high-value leads").await
}

pub async fn distribution_stats(client: &ApiClient, session: &mut RunSession) -> ProbeOutcome {
    announce("GET", "/leads/distribution-stats", None);
    let request = ApiRequest::get("/leads/distribution-stats").token(session.active_token());
    let outcome = execute(client, session, request, OK).await;

    narrate(&outcome, "Distribution stats retrieved successfully", "Failed");
    if outcome.passed() {
        if let Some(stats) = outcome.envelope().data {
            println!("    Active sales persons: {}", field_display(&stats, "activeSalesPersons"));
            println!("    New leads: {}", field_display(&stats, "newLeadsCount"));
            println!("    Assigned leads: {}", field_display(&stats, "assignedLeadsCount"));
        }
    }
    outcome
}

/// GET /leads?page=0&size=1 to find any lead id for the detail probes
pub async fn discover_lead(client: &ApiClient, session: &mut RunSession) -> ProbeOutcome {
    let request = ApiRequest::get("/leads")
        .token(session.active_token())
        .query("page", 0)
        .query("size", 1);
    let outcome = execute(client, session, request, OK).await;
    session.remember_lead_if_unset(outcome.envelope().first_page_id());
    debug!(lead_id = ?session.lead_id, "lead discovery finished");
    outcome
}

pub async fn update_status(
    client: &ApiClient,
    session: &mut RunSession,
    lead_id: i64,
) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}/status");
    announce("PUT", &path, None);
    let request = ApiRequest::put(path)
        .token(session.active_token())
        .query("status", "IN_PROGRESS");
    let outcome = execute(client, session, request, OK).await;
    narrate(&outcome, "Status updated successfully", "Status update failed");
    outcome
}

pub async fn recalculate_score(
    client: &ApiClient,
    session: &mut RunSession,
    lead_id: i64,
) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}/recalculate-score");
    announce("POST", &path, None);
    let request = ApiRequest::post(path).token(session.active_token());
    let outcome = execute(client, session, request, OK).await;
    narrate(&outcome, "Score recalculated successfully", "Score recalculation failed");
    outcome
}

// ============================================================================
// Workflow
// ============================================================================

pub async fn distribute_leads(client: &ApiClient, session: &mut RunSession) -> ProbeOutcome {
    announce("POST", "/leads/distribute", None);
    let request = ApiRequest::post("/leads/distribute").token(session.active_token());
    let outcome = execute(client, session, request, OK).await;
    narrate(&outcome, "Leads distributed successfully", "Failed");
    outcome
}

/// POST /leads/{id}/escalate.
///
/// A 400 carrying the high-value business rule, or a 401/403, is
/// reclassified from FAIL to SKIP.
pub async fn escalate_lead(
    client: &ApiClient,
    session: &mut RunSession,
    lead_id: i64,
) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}/escalate");
    announce("POST", &path, None);
    let request = ApiRequest::post(path).token(session.active_token());
    let mut outcome = execute(client, session, request, OK).await;

    if outcome.passed() {
        println!("  ✓ Lead escalated successfully");
    } else if outcome.status_code == Some(400) {
        if is_business_rule_rejection(&outcome) {
            println!("  ! Lead does not meet high-value criteria (expected for leads < $1M)");
            skip(session, &mut outcome);
        } else {
            println!("  ✗ Failed: {}", outcome.error_text());
        }
    } else if outcome.is_auth_rejection() {
        println!("  ! Authentication required (expected)");
        skip(session, &mut outcome);
    } else {
        println!("  ✗ Failed: {}", outcome.error_text());
    }
    outcome
}

fn is_business_rule_rejection(outcome: &ProbeOutcome) -> bool {
    let envelope = outcome.envelope();
    let message = envelope.message.as_deref().unwrap_or("");
    let body = outcome.body.as_ref().map(Value::to_string).unwrap_or_default();
    message.contains("high-value criteria") || body.contains("Business rule violation")
}

fn skip(session: &mut RunSession, outcome: &mut ProbeOutcome) {
    if session.reclassify_as_skip(outcome.index) {
        outcome.classification = Classification::Skip;
    }
}

pub async fn request_approval(
    client: &ApiClient,
    session: &mut RunSession,
    lead_id: i64,
) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}/request-approval");
    announce("POST", &path, None);
    let request = ApiRequest::post(path).token(session.active_token());
    let outcome = execute(client, session, request, OK).await;

    if outcome.status_code == Some(400) {
        println!("  ! High-value leads must be escalated (expected)");
    } else {
        narrate(&outcome, "Approval requested successfully", "Failed");
    }
    outcome
}

pub async fn approve_lead(
    client: &ApiClient,
    session: &mut RunSession,
    lead_id: i64,
) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}/approve");
    announce("POST", &path, None);
    let request = ApiRequest::post(path).token(session.active_token());
    let outcome = execute(client, session, request, OK).await;
    narrate(&outcome, "Lead approved successfully", "Failed");
    outcome
}

pub async fn reject_lead(
    client: &ApiClient,
    session: &mut RunSession,
    lead_id: i64,
) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}/reject");
    announce("POST", &path, None);
    let request = ApiRequest::post(path)
        .token(session.active_token())
        .query("reason", "Test rejection reason");
    let outcome = execute(client, session, request, OK).await;
    narrate(&outcome, "Lead rejected successfully", "Failed");
    outcome
}

// ============================================================================
// History
// ============================================================================

pub async fn lead_history(
    client: &ApiClient,
    session: &mut RunSession,
    lead_id: i64,
) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}/history");
    announce("GET", &path, None);
    let request = ApiRequest::get(path)
        .token(session.active_token())
        .query("page", 0)
        .query("size", 10);
    let outcome = execute(client, session, request, OK).await;
    let count = outcome.envelope().page_items().len();
    narrate(&outcome, &format!("Retrieved {count} history records"), "Failed");
    outcome
}

pub async fn add_comment(
    client: &ApiClient,
    session: &mut RunSession,
    lead_id: i64,
) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}/history");
    announce("POST", &path, Some("Add comment"));
    let request = ApiRequest::post(path)
        .token(session.active_token())
        .json(payloads::comment());
    let outcome = execute(client, session, request, OK).await;
    narrate(&outcome, "Comment added successfully", "Comment addition failed");
    outcome
}

pub async fn recent_history(
    client: &ApiClient,
    session: &mut RunSession,
    lead_id: i64,
) -> ProbeOutcome {
    let path = format!("/leads/{lead_id}/history/recent");
    announce("GET", &path, None);
    let request = ApiRequest::get(path)
        .token(session.active_token())
        .query("limit", 5);
    let outcome = execute(client, session, request, OK).await;
    let count = outcome.envelope().list_items().len();
    narrate(&outcome, &format!("Retrieved {count} recent history records"), "Failed");
    outcome
}
