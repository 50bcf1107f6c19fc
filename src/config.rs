//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for the smoke harness, supporting:
//! - Environment variables for every configurable value
//! - Defaults that point at the hosted lead management API
//! - Builder-style overrides applied from the command line
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `LEADS_SMOKE_BASE_URL` | API base URL | `https://leads-api.ivdata.dev/api` |
//! | `API_TOKEN` | Bearer token for the sales-person role | unset |
//! | `MANAGER_TOKEN` | Bearer token for the manager role | unset |
//! | `LEADS_SMOKE_TIMEOUT` | Per-request timeout in seconds | `30` |
//! | `LEADS_SMOKE_REPORT_DIR` | Directory the reports are written to | `.` |
//! | `LEADS_SMOKE_JSON_REPORT` | File name of the JSON report | `test_report.json` |
//! | `LEADS_SMOKE_MARKDOWN_REPORT` | File name of the Markdown report | `ENDPOINT_TEST_REPORT.md` |
//! | `LEADS_SMOKE_SALES_USER` | Sales-person login | `emily.johnson` |
//! | `LEADS_SMOKE_SALES_PASSWORD` | Sales-person password | `password123` |
//! | `LEADS_SMOKE_MANAGER_USER` | Manager login | `sarah.anderson` |
//! | `LEADS_SMOKE_MANAGER_PASSWORD` | Manager password | `password123` |
//!
//! # Example
//!
//! ```bash
//! # Point the harness at a local service and keep reports out of the repo
//! export LEADS_SMOKE_BASE_URL="http://localhost:8080/api"
//! export LEADS_SMOKE_REPORT_DIR="/tmp/leads-smoke"
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use crate::harness::types::Credentials;

// ============================================================================
// Default Values
// ============================================================================

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://leads-api.ivdata.dev/api";

/// Default per-request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default report directory
pub const DEFAULT_REPORT_DIR: &str = ".";

/// Default structured report file name
pub const DEFAULT_JSON_REPORT: &str = "test_report.json";

/// Default narrative report file name
pub const DEFAULT_MARKDOWN_REPORT: &str = "ENDPOINT_TEST_REPORT.md";

/// Default sales-person credentials
pub const DEFAULT_SALES_USER: &str = "emily.johnson";
pub const DEFAULT_SALES_PASSWORD: &str = "password123";

/// Default manager credentials
pub const DEFAULT_MANAGER_USER: &str = "sarah.anderson";
pub const DEFAULT_MANAGER_PASSWORD: &str = "password123";

/// Sales-person login tried when neither role could authenticate
pub const ALTERNATE_SALES_USER: &str = "sales1";
pub const ALTERNATE_SALES_PASSWORD: &str = "password123";

// ============================================================================
// Environment Variable Names
// ============================================================================

pub const ENV_BASE_URL: &str = "LEADS_SMOKE_BASE_URL";
pub const ENV_API_TOKEN: &str = "API_TOKEN";
pub const ENV_MANAGER_TOKEN: &str = "MANAGER_TOKEN";
pub const ENV_TIMEOUT: &str = "LEADS_SMOKE_TIMEOUT";
pub const ENV_REPORT_DIR: &str = "LEADS_SMOKE_REPORT_DIR";
pub const ENV_JSON_REPORT: &str = "LEADS_SMOKE_JSON_REPORT";
pub const ENV_MARKDOWN_REPORT: &str = "LEADS_SMOKE_MARKDOWN_REPORT";
pub const ENV_SALES_USER: &str = "LEADS_SMOKE_SALES_USER";
pub const ENV_SALES_PASSWORD: &str = "LEADS_SMOKE_SALES_PASSWORD";
pub const ENV_MANAGER_USER: &str = "LEADS_SMOKE_MANAGER_USER";
pub const ENV_MANAGER_PASSWORD: &str = "LEADS_SMOKE_MANAGER_PASSWORD";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for a harness run
#[derive(Debug, Clone)]
pub struct Config {
    /// API base URL, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Pre-issued sales-person token
    pub api_token: Option<String>,
    /// Pre-issued manager token
    pub manager_token: Option<String>,
    /// Whether to run the login/register phase
    pub with_auth: bool,
    /// Report output settings
    pub reports: ReportSettings,
    /// Logins used by the authentication phase
    pub accounts: AccountSettings,
}

/// Where the two report artifacts land
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub dir: PathBuf,
    pub json_file: String,
    pub markdown_file: String,
}

/// Logins for the two roles the harness exercises
#[derive(Debug, Clone)]
pub struct AccountSettings {
    pub sales: Credentials,
    pub manager: Credentials,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            base_url: normalize_base_url(
                &env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            ),
            timeout: Duration::from_secs(
                env::var(ENV_TIMEOUT)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            api_token: non_empty_var(ENV_API_TOKEN),
            manager_token: non_empty_var(ENV_MANAGER_TOKEN),
            with_auth: false,
            reports: ReportSettings::from_env(),
            accounts: AccountSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_token: None,
            manager_token: None,
            with_auth: false,
            reports: ReportSettings::defaults(),
            accounts: AccountSettings::defaults(),
        }
    }

    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(base_url.as_ref());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tokens(mut self, api_token: Option<String>, manager_token: Option<String>) -> Self {
        self.api_token = api_token.filter(|t| !t.trim().is_empty());
        self.manager_token = manager_token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_auth(mut self, with_auth: bool) -> Self {
        self.with_auth = with_auth;
        self
    }

    pub fn report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reports.dir = dir.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ReportSettings {
    pub fn from_env() -> Self {
        Self {
            dir: PathBuf::from(
                env::var(ENV_REPORT_DIR).unwrap_or_else(|_| DEFAULT_REPORT_DIR.to_string()),
            ),
            json_file: env::var(ENV_JSON_REPORT)
                .unwrap_or_else(|_| DEFAULT_JSON_REPORT.to_string()),
            markdown_file: env::var(ENV_MARKDOWN_REPORT)
                .unwrap_or_else(|_| DEFAULT_MARKDOWN_REPORT.to_string()),
        }
    }

    pub fn defaults() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_REPORT_DIR),
            json_file: DEFAULT_JSON_REPORT.to_string(),
            markdown_file: DEFAULT_MARKDOWN_REPORT.to_string(),
        }
    }

    /// Full path of the JSON report
    pub fn json_path(&self) -> PathBuf {
        self.dir.join(&self.json_file)
    }

    /// Full path of the Markdown report
    pub fn markdown_path(&self) -> PathBuf {
        self.dir.join(&self.markdown_file)
    }
}

impl AccountSettings {
    pub fn from_env() -> Self {
        Self {
            sales: Credentials::new(
                env::var(ENV_SALES_USER).unwrap_or_else(|_| DEFAULT_SALES_USER.to_string()),
                env::var(ENV_SALES_PASSWORD).unwrap_or_else(|_| DEFAULT_SALES_PASSWORD.to_string()),
            ),
            manager: Credentials::new(
                env::var(ENV_MANAGER_USER).unwrap_or_else(|_| DEFAULT_MANAGER_USER.to_string()),
                env::var(ENV_MANAGER_PASSWORD)
                    .unwrap_or_else(|_| DEFAULT_MANAGER_PASSWORD.to_string()),
            ),
        }
    }

    pub fn defaults() -> Self {
        Self {
            sales: Credentials::new(DEFAULT_SALES_USER, DEFAULT_SALES_PASSWORD),
            manager: Credentials::new(DEFAULT_MANAGER_USER, DEFAULT_MANAGER_PASSWORD),
        }
    }

    /// Fixed sales-person account; not affected by the sales overrides
    pub fn alternate_sales(&self) -> Credentials {
        Credentials::new(ALTERNATE_SALES_USER, ALTERNATE_SALES_PASSWORD)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Strip trailing slashes so paths can be appended with a leading `/`
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
