use crate::{
    models::{ProbeOutcome, ProbePayload, ProbeRequest, ProbeResult},
    probe::{fetch_json, Probe},
    transport::HttpTransport,
};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

pub const LOCAL_SERVER_HINT: &str = "Cannot reach the local server. Is it running? (npm run dev)";

/// Asks the local development server for a token. Needs no credential.
pub struct LocalHealthProbe {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    character: String,
    timeout: Duration,
}

impl LocalHealthProbe {
    pub const NAME: &'static str = "Local Server Token Endpoint";

    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: &str,
        character: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            character: character.to_string(),
            timeout,
        }
    }

    fn token_url(&self) -> Result<String, String> {
        reqwest::Url::parse_with_params(
            &format!("{}/token", self.base_url),
            &[("character", self.character.as_str())],
        )
        .map(String::from)
        .map_err(|e| format!("invalid local server URL {}: {}", self.base_url, e))
    }
}

#[async_trait]
impl Probe for LocalHealthProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requires_credential(&self) -> bool {
        false
    }

    async fn run(&self) -> ProbeResult {
        let url = match self.token_url() {
            Ok(url) => url,
            Err(message) => return ProbeResult::transport_error(Self::NAME, message),
        };

        let request = ProbeRequest::get(url, self.timeout);
        match fetch_json(self.transport.as_ref(), &request).await {
            Ok((status, value)) => {
                info!(status, character = %self.character, "Local token endpoint responded");
                ProbeResult::success(Self::NAME, ProbePayload::Json { value })
            }
            Err(outcome @ ProbeOutcome::TransportError { .. }) => {
                warn!(url = %request.url, "{}", LOCAL_SERVER_HINT);
                ProbeResult::new(Self::NAME, outcome).with_note(LOCAL_SERVER_HINT)
            }
            Err(outcome) => ProbeResult::new(Self::NAME, outcome),
        }
    }
}
