use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use leads_smoke::config::{
    self, DEFAULT_BASE_URL, ENV_API_TOKEN, ENV_BASE_URL, ENV_MANAGER_TOKEN,
};
use leads_smoke::{Summary, run_all};

/// Leads Smoke - exercise every lead management endpoint and report the results
#[derive(Parser, Debug)]
#[command(
    name = "leads-smoke",
    about = "Smoke-test harness for the lead management HTTP API",
    after_help = "ENVIRONMENT VARIABLES:\n\
        LEADS_SMOKE_BASE_URL           API base URL\n\
        API_TOKEN                      Sales-person bearer token\n\
        MANAGER_TOKEN                  Manager bearer token\n\
        LEADS_SMOKE_TIMEOUT            Per-request timeout (seconds)\n\
        LEADS_SMOKE_REPORT_DIR         Directory for test_report.json and ENDPOINT_TEST_REPORT.md\n\
        LEADS_SMOKE_SALES_USER         Sales-person login for --with-auth\n\
        LEADS_SMOKE_MANAGER_USER       Manager login for --with-auth"
)]
struct Args {
    /// API base URL
    #[arg(env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Sales-person bearer token
    #[arg(env = ENV_API_TOKEN, hide_env_values = true)]
    token: Option<String>,

    /// Manager bearer token
    #[arg(env = ENV_MANAGER_TOKEN, hide_env_values = true)]
    manager_token: Option<String>,

    /// Run the login/register probes before the lead probes
    #[arg(long)]
    with_auth: bool,

    /// Directory the reports are written to (default: current directory)
    #[arg(long, short = 'o')]
    report_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, short = 't')]
    timeout: Option<u64>,

    /// Exit with status 1 when any probe is FAIL or ERROR
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("leads_smoke={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Strict runs fail the process on any FAIL or ERROR; otherwise writing the
/// reports is success.
fn fails_run(strict: bool, summary: &Summary) -> bool {
    strict && summary.has_failures()
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut cfg = config::get()
        .clone()
        .base_url(&args.base_url)
        .tokens(args.token, args.manager_token)
        .with_auth(args.with_auth);
    if let Some(dir) = args.report_dir {
        cfg = cfg.report_dir(dir);
    }
    if let Some(secs) = args.timeout {
        cfg = cfg.timeout(Duration::from_secs(secs));
    }

    let outcome = run_all(&cfg).await?;
    if fails_run(args.strict, &outcome.summary()) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let args = Args::try_parse_from(["leads-smoke"]).unwrap();
        if std::env::var_os(ENV_BASE_URL).is_none() {
            assert_eq!(args.base_url, DEFAULT_BASE_URL);
        }
        assert!(!args.with_auth);
        assert!(!args.strict);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_flags_and_options() {
        let args = Args::try_parse_from([
            "leads-smoke",
            "http://localhost:8080/api",
            "--with-auth",
            "--strict",
            "-o",
            "/tmp/reports",
            "-t",
            "5",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.base_url, "http://localhost:8080/api");
        assert!(args.with_auth);
        assert!(args.strict);
        assert_eq!(args.report_dir, Some(PathBuf::from("/tmp/reports")));
        assert_eq!(args.timeout, Some(5));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_positional_tokens_override_env() {
        // only this test touches the token variables
        unsafe {
            std::env::set_var(ENV_API_TOKEN, "env-sales");
            std::env::set_var(ENV_MANAGER_TOKEN, "env-manager");
        }

        let argv = ["leads-smoke", "http://x/api", "cli-sales", "cli-manager"];
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.token.as_deref(), Some("cli-sales"));
        assert_eq!(args.manager_token.as_deref(), Some("cli-manager"));

        let args = Args::try_parse_from(["leads-smoke", "http://x/api"]).unwrap();
        assert_eq!(args.token.as_deref(), Some("env-sales"));
        assert_eq!(args.manager_token.as_deref(), Some("env-manager"));

        unsafe {
            std::env::remove_var(ENV_API_TOKEN);
            std::env::remove_var(ENV_MANAGER_TOKEN);
        }
    }

    #[test]
    fn test_only_strict_runs_with_failures_fail() {
        let clean = Summary {
            total: 2,
            passed: 1,
            skipped: 1,
            ..Summary::default()
        };
        let failing = Summary {
            total: 2,
            passed: 1,
            errors: 1,
            ..Summary::default()
        };

        assert!(fails_run(true, &failing));
        assert!(!fails_run(false, &failing));
        assert!(!fails_run(true, &clean));
    }
}
