use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Username/password pair for the login probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Role a login is performed for (used in narration only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    SalesPerson,
    SalesManager,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::SalesPerson => f.write_str("SALES_PERSON"),
            Role::SalesManager => f.write_str("SALES_MANAGER"),
        }
    }
}

/// Sections of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Authentication,
    LeadManagement,
    Workflow,
    History,
    Report,
}

impl Phase {
    pub fn title(&self) -> &'static str {
        match self {
            Phase::Authentication => "AUTHENTICATION TESTS",
            Phase::LeadManagement => "LEAD MANAGEMENT TESTS",
            Phase::Workflow => "WORKFLOW OPERATIONS TESTS",
            Phase::History => "LEAD HISTORY TESTS",
            Phase::Report => "TEST REPORT",
        }
    }
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that abort a run.
///
/// Probe failures never show up here; they are recorded as results.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Report file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
