use crate::{
    credential::Credential,
    models::{ProbePayload, ProbeRequest, ProbeResult},
    probe::{fetch_json, missing_field, Probe},
    transport::HttpTransport,
};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tracing::info;

/// Lists the provider's models to confirm the API key is accepted.
pub struct CapabilityListProbe {
    transport: Arc<dyn HttpTransport>,
    credential: Option<Credential>,
    api_base: String,
    keyword: String,
    timeout: Duration,
}

impl CapabilityListProbe {
    pub const NAME: &'static str = "Basic API Access";

    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credential: Option<Credential>,
        api_base: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            credential,
            api_base: api_base.trim_end_matches('/').to_string(),
            keyword: "realtime".to_string(),
            timeout,
        }
    }

    /// Keyword used to pick out interesting models; matching is case-insensitive.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    fn matching(&self, ids: &[String]) -> Vec<String> {
        let keyword = self.keyword.to_lowercase();
        ids.iter()
            .filter(|id| id.to_lowercase().contains(&keyword))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Probe for CapabilityListProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requires_credential(&self) -> bool {
        true
    }

    async fn run(&self) -> ProbeResult {
        let Some(credential) = &self.credential else {
            return ProbeResult::skipped(Self::NAME);
        };

        let request = ProbeRequest::get(format!("{}/v1/models", self.api_base), self.timeout)
            .bearer(credential);

        let (status, body) = match fetch_json(self.transport.as_ref(), &request).await {
            Ok(response) => response,
            Err(outcome) => return ProbeResult::new(Self::NAME, outcome),
        };

        let Some(entries) = body.get("data").and_then(|data| data.as_array()) else {
            return ProbeResult::new(Self::NAME, missing_field(status, "data", &body));
        };

        let ids: Vec<String> = entries
            .iter()
            .filter_map(|entry| entry.get("id").and_then(|id| id.as_str()))
            .map(str::to_string)
            .collect();
        let matching = self.matching(&ids);

        info!(
            models = ids.len(),
            matching = ?matching,
            keyword = %self.keyword,
            "API key valid"
        );

        ProbeResult::success(Self::NAME, ProbePayload::Models { ids, matching })
    }
}
