//! Run session state for a single harness invocation.
//!
//! Holds everything the probes share:
//! - The base URL requests are issued against
//! - Role-scoped bearer tokens
//! - The lead id discovered or created during the run
//! - The ordered list of probe results (append-only)

use crate::runner::{Classification, ProbeResult};

/// Lead id substituted when no lead was discovered or created
pub const FALLBACK_LEAD_ID: i64 = 1;

#[derive(Debug, Clone, Default)]
pub struct RunSession {
    /// Base URL, without a trailing slash
    pub base_url: String,
    /// Token for the sales-person role
    pub sales_token: Option<String>,
    /// Token for the manager role
    pub manager_token: Option<String>,
    /// Lead id reused by dependent probes
    pub lead_id: Option<i64>,
    results: Vec<ProbeResult>,
}

impl RunSession {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_tokens(
        mut self,
        sales_token: Option<String>,
        manager_token: Option<String>,
    ) -> Self {
        self.sales_token = sales_token;
        self.manager_token = manager_token;
        self
    }

    /// Token used for lead, workflow and history probes
    pub fn active_token(&self) -> Option<&str> {
        self.sales_token.as_deref().or(self.manager_token.as_deref())
    }

    pub fn has_token(&self) -> bool {
        self.active_token().is_some()
    }

    /// Remember a lead id only if none is held yet
    pub fn remember_lead_if_unset(&mut self, id: Option<i64>) {
        if self.lead_id.is_none() {
            self.lead_id = id;
        }
    }

    /// Held lead id, or the fallback literal
    pub fn lead_id_or_fallback(&self) -> i64 {
        self.lead_id.unwrap_or(FALLBACK_LEAD_ID)
    }

    /// Append a result and return its index
    pub fn record(&mut self, result: ProbeResult) -> usize {
        self.results.push(result);
        self.results.len() - 1
    }

    /// Turn an already-recorded FAIL into SKIP.
    ///
    /// Returns false (and changes nothing) for any other classification.
    pub fn reclassify_as_skip(&mut self, index: usize) -> bool {
        match self.results.get_mut(index) {
            Some(result) if result.classification == Classification::Fail => {
                result.classification = Classification::Skip;
                true
            }
            _ => false,
        }
    }

    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::HttpMethod;

    fn result(classification: Classification) -> ProbeResult {
        ProbeResult {
            endpoint: "/leads/1/escalate".to_string(),
            method: HttpMethod::Post,
            status_code: Some(400),
            expected_status: 200,
            classification,
            response_time_ms: 3.0,
            error_message: None,
            response_body: None,
        }
    }

    #[test]
    fn test_active_token_prefers_sales() {
        let session = RunSession::new("http://x").with_tokens(Some("s".into()), Some("m".into()));
        assert_eq!(session.active_token(), Some("s"));

        let session = RunSession::new("http://x").with_tokens(None, Some("m".into()));
        assert_eq!(session.active_token(), Some("m"));

        assert!(!RunSession::new("http://x").has_token());
    }

    #[test]
    fn test_record_preserves_order() {
        let mut session = RunSession::new("http://x");
        assert_eq!(session.record(result(Classification::Pass)), 0);
        assert_eq!(session.record(result(Classification::Fail)), 1);
        let kinds: Vec<_> = session.results().iter().map(|r| r.classification).collect();
        assert_eq!(kinds, vec![Classification::Pass, Classification::Fail]);
    }

    #[test]
    fn test_reclassify_only_touches_fail() {
        let mut session = RunSession::new("http://x");
        let fail = session.record(result(Classification::Fail));
        let error = session.record(result(Classification::Error));

        assert!(session.reclassify_as_skip(fail));
        assert!(!session.reclassify_as_skip(error));
        assert!(!session.reclassify_as_skip(99));
        assert_eq!(session.results()[0].classification, Classification::Skip);
        assert_eq!(session.results()[1].classification, Classification::Error);
    }

    #[test]
    fn test_lead_id_memory() {
        let mut session = RunSession::new("http://x");
        assert_eq!(session.lead_id_or_fallback(), FALLBACK_LEAD_ID);
        session.remember_lead_if_unset(Some(5));
        session.remember_lead_if_unset(Some(9));
        assert_eq!(session.lead_id, Some(5));
    }
}
