use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::summary::Summary;
use crate::harness::types::HarnessResult;
use crate::runner::ProbeResult;

/// Structured report: run metadata, counters and every result in call order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub timestamp: DateTime<Local>,
    pub base_url: String,
    pub summary: Summary,
    pub results: Vec<ProbeResult>,
}

impl JsonReport {
    pub fn new(base_url: &str, results: &[ProbeResult], timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            base_url: base_url.to_string(),
            summary: Summary::from_results(results),
            results: results.to_vec(),
        }
    }

    pub fn to_pretty_json(&self) -> HarnessResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report, replacing any previous file
    pub fn write(&self, path: &Path) -> HarnessResult<()> {
        fs::write(path, self.to_pretty_json()?)?;
        Ok(())
    }
}
