//! Report generation: console summary, JSON report and Markdown report.
//!
//! All three outputs are derived from the session's ordered result list and
//! nothing else.

pub mod json;
pub mod markdown;
pub mod summary;

use chrono::Local;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::config::ReportSettings;
use crate::harness::types::HarnessResult;
use crate::session::RunSession;

pub use json::JsonReport;
pub use summary::{Summary, percentage, render_console};

/// Locations of the written artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

/// Print the console summary and write both report files.
///
/// File-system errors are returned to the caller.
pub fn generate(session: &RunSession, settings: &ReportSettings) -> HarnessResult<ReportPaths> {
    let results = session.results();
    let now = Local::now();

    let report = JsonReport::new(&session.base_url, results, now);
    print!("{}", render_console(&report.summary, results));

    fs::create_dir_all(&settings.dir)?;

    let json_path = settings.json_path();
    report.write(&json_path)?;
    println!("\n✓ Detailed report saved to: {}", json_path.display());

    let markdown_path = settings.markdown_path();
    markdown::write(&markdown_path, &session.base_url, results, now, &settings.json_file)?;
    println!("\n✓ Comprehensive report saved to: {}", markdown_path.display());

    info!(json = %json_path.display(), markdown = %markdown_path.display(), "reports written");
    Ok(ReportPaths {
        json: json_path,
        markdown: markdown_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_generate_empty_session_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ReportSettings {
            dir: dir.path().join("reports"),
            ..ReportSettings::defaults()
        };
        let session = RunSession::new("http://localhost/api");

        let paths = generate(&session, &settings).unwrap();
        let json: Value = serde_json::from_str(&fs::read_to_string(&paths.json).unwrap()).unwrap();
        assert_eq!(json["summary"]["total"], 0);
        assert!(fs::read_to_string(&paths.markdown).unwrap().contains("Total Tests:** 0"));
    }

    #[test]
    fn test_generate_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ReportSettings {
            dir: dir.path().to_path_buf(),
            ..ReportSettings::defaults()
        };
        fs::write(settings.json_path(), "stale contents that are not json").unwrap();

        generate(&RunSession::new("http://x"), &settings).unwrap();
        let text = fs::read_to_string(settings.json_path()).unwrap();
        assert!(serde_json::from_str::<Value>(&text).is_ok());
    }

    #[test]
    fn test_generate_fails_when_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();
        let settings = ReportSettings {
            dir: blocker,
            ..ReportSettings::defaults()
        };
        assert!(generate(&RunSession::new("http://x"), &settings).is_err());
    }
}
