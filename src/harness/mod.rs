pub mod executor;
pub mod orchestrator;
pub mod probes;
pub mod types;

pub use executor::{ProbeOutcome, execute};
pub use orchestrator::{RunOutcome, run_all};
pub use types::{Credentials, HarnessError, HarnessResult, Phase, Role};
