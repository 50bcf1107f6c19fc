use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::runner::{Classification, ProbeResult};

/// Counters derived from the ordered result list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
    /// "NN.N%" or "0%" for an empty run
    pub success_rate: String,
    pub avg_response_time_ms: f64,
}

impl Summary {
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let count = |c: Classification| results.iter().filter(|r| r.classification == c).count();
        let total = results.len();
        let passed = count(Classification::Pass);

        let avg = if total > 0 {
            results.iter().map(|r| r.response_time_ms).sum::<f64>() / total as f64
        } else {
            0.0
        };

        Self {
            total,
            passed,
            failed: count(Classification::Fail),
            errors: count(Classification::Error),
            skipped: count(Classification::Skip),
            success_rate: match percentage(passed, total) {
                Some(p) => format!("{p:.1}%"),
                None => "0%".to_string(),
            },
            avg_response_time_ms: (avg * 100.0).round() / 100.0,
        }
    }

    pub fn count(&self, classification: Classification) -> usize {
        match classification {
            Classification::Pass => self.passed,
            Classification::Fail => self.failed,
            Classification::Error => self.errors,
            Classification::Skip => self.skipped,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.errors > 0
    }

    /// "N (PP.P%)", or just "N" when there are no results
    pub fn count_with_share(&self, classification: Classification) -> String {
        let n = self.count(classification);
        match percentage(n, self.total) {
            Some(p) => format!("{n} ({p:.1}%)"),
            None => n.to_string(),
        }
    }
}

/// Share of `part` in `total`, or None when `total` is zero
pub fn percentage(part: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| part as f64 / total as f64 * 100.0)
}

/// Console summary: counters, average latency and a block per FAIL/ERROR
pub fn render_console(summary: &Summary, results: &[ProbeResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nSummary:");
    let _ = writeln!(out, "  Total Tests: {}", summary.total);
    let _ = writeln!(out, "  ✓ Passed: {}", summary.count_with_share(Classification::Pass));
    let _ = writeln!(out, "  ✗ Failed: {}", summary.count_with_share(Classification::Fail));
    let _ = writeln!(out, "  ⚠ Errors: {}", summary.count_with_share(Classification::Error));
    let _ = writeln!(out, "  ⊘ Skipped: {}", summary.skipped);
    let _ = writeln!(out, "\nAverage Response Time: {:.2} ms", summary.avg_response_time_ms);

    if summary.has_failures() {
        let rule = "=".repeat(80);
        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(out, "FAILED/ERROR TESTS DETAILS:");
        let _ = writeln!(out, "{rule}");
        for result in results.iter().filter(|r| r.classification.is_failure()) {
            let _ = writeln!(out, "\n❌ {} {}", result.method, result.endpoint);
            let _ = writeln!(
                out,
                "   Expected: {}, Got: {}",
                result.expected_status,
                result.status_display()
            );
            let _ = writeln!(out, "   Response Time: {:.2} ms", result.response_time_ms);
            if let Some(error) = &result.error_message {
                let _ = writeln!(out, "   Error: {error}");
            }
            if let Some(message) = result.api_message() {
                let _ = writeln!(out, "   API Message: {message}");
            }
        }
    }
    out
}
