//! Narrative Markdown report.

use chrono::{DateTime, Local};
use serde_json::Value;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::summary::Summary;
use crate::harness::types::HarnessResult;
use crate::payloads::{self, TIMESTAMP_PLACEHOLDER};
use crate::runner::{Classification, ProbeResult};

/// Characters of pretty-printed response kept per section
pub const SAMPLE_LIMIT: usize = 500;

pub fn status_icon(classification: Classification) -> &'static str {
    match classification {
        Classification::Pass => "✅",
        Classification::Skip => "⚠️",
        Classification::Fail | Classification::Error => "❌",
    }
}

pub fn render(
    base_url: &str,
    results: &[ProbeResult],
    generated: DateTime<Local>,
    json_file: &str,
) -> String {
    let summary = Summary::from_results(results);
    let mut md = String::new();

    let _ = writeln!(md, "# Lead Management Service - Comprehensive API Test Report\n");
    let _ = writeln!(md, "**Generated:** {}", generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(md, "**Base URL:** {base_url}\n");

    let _ = writeln!(md, "## Test Summary\n");
    let _ = writeln!(md, "- **Total Tests:** {}", summary.total);
    let _ = writeln!(md, "- **Passed:** {}", summary.count_with_share(Classification::Pass));
    let _ = writeln!(md, "- **Failed:** {}", summary.count_with_share(Classification::Fail));
    let _ = writeln!(md, "- **Errors:** {}", summary.count_with_share(Classification::Error));
    let _ = writeln!(md, "- **Skipped:** {}\n", summary.skipped);

    let _ = writeln!(md, "## Endpoint Test Details\n");
    for result in results {
        write_section(&mut md, result);
    }

    let _ = writeln!(md, "## Sample Data Used\n");
    let _ = writeln!(md, "The following sample data was used in the test cases:\n");
    write_sample(&mut md, "Lead Creation Sample", &payloads::lead_create(TIMESTAMP_PLACEHOLDER));
    write_sample(&mut md, "Lead Update Sample", &payloads::lead_update());
    write_sample(&mut md, "Comment Sample", &payloads::comment());

    let _ = writeln!(md, "## API Endpoints Tested\n");
    let _ = writeln!(md, "| Method | Endpoint | Status | Response Time (ms) |");
    let _ = writeln!(md, "|--------|----------|--------|-------------------|");
    for result in results {
        let _ = writeln!(
            md,
            "| {} | {} | {} {} | {:.2} |",
            result.method,
            result.endpoint,
            status_icon(result.classification),
            result.status_display(),
            result.response_time_ms
        );
    }

    let _ = writeln!(md, "\n## Notes\n");
    let _ = writeln!(
        md,
        "- Tests marked with ⚠️ indicate expected behavior (e.g., authentication required, business rules)"
    );
    let _ = writeln!(md, "- All timestamps are generated dynamically to ensure unique test data");
    let _ = writeln!(
        md,
        "- The comprehensive JSON report with full request/response data is available in `{json_file}`"
    );
    md
}

fn write_section(md: &mut String, result: &ProbeResult) {
    let _ = writeln!(
        md,
        "### {} {} {}\n",
        status_icon(result.classification),
        result.method,
        result.endpoint
    );
    let _ = writeln!(md, "- **Expected Status:** {}", result.expected_status);
    let _ = writeln!(md, "- **Actual Status:** {}", result.status_display());
    let _ = writeln!(md, "- **Response Time:** {:.2} ms", result.response_time_ms);
    let _ = writeln!(md, "- **Test Status:** {}\n", result.classification);

    if let Some(body) = result.response_body.as_ref().filter(|b| has_content(b)) {
        let _ = writeln!(md, "**Response Sample:**\n");
        let _ = writeln!(md, "```json");
        let _ = writeln!(md, "{}", response_sample(body));
        let _ = writeln!(md, "```\n");
    }

    if let Some(error) = &result.error_message {
        let _ = writeln!(md, "**Error:** {error}\n");
    }

    let _ = writeln!(md, "---\n");
}

/// Null, empty containers and empty strings carry nothing worth sampling
fn has_content(body: &Value) -> bool {
    match body {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Pretty JSON cut at [`SAMPLE_LIMIT`] characters with a truncation marker
pub fn response_sample(body: &Value) -> String {
    let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
    if pretty.chars().count() <= SAMPLE_LIMIT {
        return pretty;
    }
    let mut cut: String = pretty.chars().take(SAMPLE_LIMIT).collect();
    cut.push_str("\n... (truncated)");
    cut
}

fn write_sample(md: &mut String, title: &str, payload: &Value) {
    let _ = writeln!(md, "### {title}\n");
    let _ = writeln!(md, "```json");
    let _ = writeln!(md, "{}", serde_json::to_string_pretty(payload).unwrap_or_default());
    let _ = writeln!(md, "```\n");
}

/// Render and write the report, replacing any previous file
pub fn write(
    path: &Path,
    base_url: &str,
    results: &[ProbeResult],
    generated: DateTime<Local>,
    json_file: &str,
) -> HarnessResult<()> {
    fs::write(path, render(base_url, results, generated, json_file))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::HttpMethod;
    use serde_json::json;

    fn result(endpoint: &str, classification: Classification, body: Option<Value>) -> ProbeResult {
        ProbeResult {
            endpoint: endpoint.to_string(),
            method: HttpMethod::Get,
            status_code: Some(if classification == Classification::Pass { 200 } else { 401 }),
            expected_status: 200,
            classification,
            response_time_ms: 18.456,
            error_message: (classification != Classification::Pass)
                .then(|| "Authentication required (got 401)".to_string()),
            response_body: body,
        }
    }

    #[test]
    fn test_render_sections_and_table() {
        let results = vec![
            result("/leads", Classification::Pass, Some(json!({"success": true}))),
            result("/leads/new", Classification::Fail, None),
            result("/leads/1/escalate", Classification::Skip, None),
        ];
        let md = render("http://localhost/api", &results, Local::now(), "test_report.json");

        assert!(md.contains("### ✅ GET /leads\n"));
        assert!(md.contains("### ❌ GET /leads/new\n"));
        assert!(md.contains("### ⚠️ GET /leads/1/escalate\n"));
        assert!(md.contains("- **Test Status:** SKIP"));
        assert!(md.contains("**Error:** Authentication required (got 401)"));
        assert!(md.contains("| GET | /leads | ✅ 200 | 18.46 |"));
        assert!(md.contains("- **Passed:** 1 (33.3%)"));
    }

    #[test]
    fn test_render_appendix_payloads() {
        let md = render("http://x", &[], Local::now(), "test_report.json");
        assert!(md.contains("### Lead Creation Sample"));
        assert!(md.contains("\"leadName\": \"Test Lead [timestamp]\""));
        assert!(md.contains("### Lead Update Sample"));
        assert!(md.contains("\"leadName\": \"Updated Test Lead\""));
        assert!(md.contains("### Comment Sample"));
        assert!(md.contains("\"commentText\": \"Test comment from automated test script\""));
    }

    #[test]
    fn test_render_empty_run() {
        let md = render("http://x", &[], Local::now(), "test_report.json");
        assert!(md.contains("- **Total Tests:** 0"));
        assert!(md.contains("- **Passed:** 0\n"));
        assert!(!md.contains("NaN"));
    }

    #[test]
    fn test_empty_bodies_have_no_sample() {
        let results = vec![
            result("/leads/1", Classification::Pass, Some(json!({}))),
            result("/leads/2", Classification::Pass, Some(json!([]))),
            result("/leads/3", Classification::Pass, Some(Value::Null)),
            result("/leads/4", Classification::Pass, Some(json!({"id": 4}))),
        ];
        let md = render("http://x/api", &results, Local::now(), "test_report.json");
        assert_eq!(md.matches("**Response Sample:**").count(), 1);
        assert!(md.contains("\"id\": 4"));
    }

    #[test]
    fn test_response_sample_truncation() {
        let small = json!({"a": 1});
        assert!(!response_sample(&small).contains("truncated"));

        let big = json!({"data": "y".repeat(1200)});
        let sample = response_sample(&big);
        assert!(sample.ends_with("\n... (truncated)"));
        assert_eq!(sample.chars().count(), SAMPLE_LIMIT + "\n... (truncated)".chars().count());
    }
}
