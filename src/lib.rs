//! Leads Smoke - smoke-test harness for the lead management HTTP API.
//!
//! This crate provides:
//! - A probe executor that records exactly one classified result per call
//! - The named probe catalog (auth, leads, workflow, history)
//! - Phase orchestration that never aborts on a failing probe
//! - Console, JSON and Markdown reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use leads_smoke::config::Config;
//!
//! # async fn demo() -> Result<(), leads_smoke::HarnessError> {
//! let config = Config::defaults().base_url("http://localhost:8080/api");
//! let outcome = leads_smoke::run_all(&config).await?;
//! println!("{} probes recorded", outcome.session.results().len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod harness;
pub mod payloads;
pub mod report;
pub mod runner;
pub mod session;

// Re-export result types
pub use runner::{Classification, HttpMethod, ProbeResult};

// Re-export harness entry points
pub use harness::{
    Credentials, HarnessError, HarnessResult, ProbeOutcome, RunOutcome, execute, run_all,
};

pub use client::{ApiClient, ApiRequest, ApiResponse, TransportError};
pub use envelope::ApiEnvelope;
pub use report::{JsonReport, ReportPaths, Summary};
pub use session::{FALLBACK_LEAD_ID, RunSession};
