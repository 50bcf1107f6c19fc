//! End-to-end runs of every phase against a mock API

use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use std::time::Duration;

use leads_smoke::config::Config;
use leads_smoke::{Classification, Credentials, HttpMethod, run_all};

fn config_for(server: &MockServer, report_dir: &std::path::Path) -> Config {
    Config::defaults()
        .base_url(server.base_url())
        .timeout(Duration::from_secs(5))
        .report_dir(report_dir)
}

#[tokio::test]
async fn test_unreachable_paths_still_complete_the_run() {
    // no mocks: every call gets the mock server's 404
    let server = MockServer::start_async().await;
    let reports = tempfile::tempdir().unwrap();

    let outcome = run_all(&config_for(&server, reports.path())).await.unwrap();
    let results = outcome.session.results();

    // 10 lead probes + discovery + 3 fallback detail probes + 5 workflow + 3 history
    assert_eq!(results.len(), 22);
    assert!(results.iter().all(|r| r.classification == Classification::Fail));
    assert_eq!(outcome.session.lead_id, None);

    let fallback: Vec<_> = results.iter().skip(11).take(3).map(|r| r.endpoint.as_str()).collect();
    assert_eq!(fallback, vec!["/leads/1", "/leads/1/status", "/leads/1/recalculate-score"]);
    assert!(!results.iter().any(|r| r.method == HttpMethod::Put && r.endpoint == "/leads/1"));
    assert_eq!(results[10].endpoint, "/leads");

    let raw = fs::read_to_string(&outcome.reports.json).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["summary"]["total"], json!(22));
    assert_eq!(json["summary"]["failed"], json!(22));
    assert_eq!(json["results"].as_array().unwrap().len(), 22);
    assert!(outcome.reports.markdown.exists());
}

#[tokio::test]
async fn test_created_lead_drives_dependent_probes() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/leads");
            then.status(200).json_body(json!({"success": true, "data": {"id": 42}}));
        })
        .await;
    let escalate = server
        .mock_async(|when, then| {
            when.method(POST).path("/leads/42/escalate");
            then.status(400).json_body(json!({
                "success": false,
                "message": "Lead does not meet high-value criteria for escalation"
            }));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/leads/42").json_body(json!({
                "leadName": "Updated Test Lead",
                "company": "Updated Company Inc",
                "email": "updated@test.com",
                "phone": "555-8888",
                "potentialValue": 750000.0,
                "leadSource": "Webinar",
                "description": "Updated description",
                "industry": "Finance",
                "companySize": "Large",
                "location": "New York, NY"
            }));
            then.status(200).json_body(json!({"success": true, "data": {"id": 42}}));
        })
        .await;
    let comment = server
        .mock_async(|when, then| {
            when.method(POST).path("/leads/42/history");
            then.status(200).json_body(json!({"success": true}));
        })
        .await;

    let reports = tempfile::tempdir().unwrap();
    let outcome = run_all(&config_for(&server, reports.path())).await.unwrap();

    escalate.assert_async().await;
    update.assert_async().await;
    comment.assert_async().await;

    let session = &outcome.session;
    assert_eq!(session.lead_id, Some(42));
    // no discovery call once a lead was created: 10 + 4 + 5 + 3
    assert_eq!(session.results().len(), 22);
    assert!(!session.results().iter().any(|r| r.endpoint.starts_with("/leads/1/")));

    let summary = outcome.summary();
    assert_eq!(summary.passed, 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.failed, 18);
}

#[tokio::test]
async fn test_auth_phase_tokens_reach_lead_probes() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({"success": true, "data": {"token": "sales-token"}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/register");
            then.status(200)
                .json_body(json!({"success": true, "data": {"username": "testuser_1"}}));
        })
        .await;
    let my_leads = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/leads/my-leads")
                .header("authorization", "Bearer sales-token");
            then.status(200).json_body(json!({"success": true, "data": [{"id": 1}]}));
        })
        .await;

    let reports = tempfile::tempdir().unwrap();
    let config = config_for(&server, reports.path()).with_auth(true);
    let outcome = run_all(&config).await.unwrap();

    my_leads.assert_async().await;
    let results = outcome.session.results();
    // sales login, manager login, register, login as the registered user
    let auth: Vec<_> = results.iter().take(4).map(|r| r.endpoint.as_str()).collect();
    assert_eq!(auth, vec!["/auth/login", "/auth/login", "/auth/register", "/auth/login"]);
    assert!(results.iter().take(4).all(|r| r.classification == Classification::Pass));
    assert_eq!(outcome.session.sales_token.as_deref(), Some("sales-token"));
}

#[tokio::test]
async fn test_failed_logins_fall_back_to_alternate_credentials() {
    let server = MockServer::start_async().await;
    let reports = tempfile::tempdir().unwrap();
    let config = config_for(&server, reports.path()).with_auth(true);

    let outcome = run_all(&config).await.unwrap();
    let results = outcome.session.results();

    // two logins, register, then two alternate logins
    let auth: Vec<_> = results.iter().take(5).map(|r| r.endpoint.as_str()).collect();
    assert_eq!(
        auth,
        vec!["/auth/login", "/auth/login", "/auth/register", "/auth/login", "/auth/login"]
    );
    assert!(!outcome.session.has_token());
}

#[tokio::test]
async fn test_alternate_login_uses_fixed_password() {
    let server = MockServer::start_async().await;
    let alternate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/login")
                .json_body(json!({"username": "sales1", "password": "password123"}));
            then.status(200).json_body(json!({"success": true, "data": {"token": "alt-token"}}));
        })
        .await;

    let reports = tempfile::tempdir().unwrap();
    let mut config = config_for(&server, reports.path()).with_auth(true);
    config.accounts.sales = Credentials::new("someone", "overridden");

    let outcome = run_all(&config).await.unwrap();

    alternate.assert_async().await;
    assert_eq!(outcome.session.sales_token.as_deref(), Some("alt-token"));
}

#[tokio::test]
async fn test_unreachable_service_yields_errors_not_abort() {
    let reports = tempfile::tempdir().unwrap();
    let config = Config::defaults()
        .base_url("http://127.0.0.1:9/api")
        .timeout(Duration::from_secs(2))
        .report_dir(reports.path());

    let outcome = run_all(&config).await.unwrap();
    let summary = outcome.summary();

    assert_eq!(summary.total, 22);
    assert_eq!(summary.errors, 22);
    assert!(outcome.session.results().iter().all(|r| r.status_code.is_none()));
}
