use crate::{
    config::Config,
    credential::Credential,
    models::{ClientSecret, ProbeOutcome, ProbePayload, ProbeRequest, ProbeResult, ResponseBody, SessionPayload},
    probe::{fetch_json, missing_field, Probe},
    transport::HttpTransport,
};
use async_trait::async_trait;
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

/// Body sent to the realtime sessions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRequest {
    pub model: String,
    pub voice: String,
    pub temperature: f64,
    pub max_response_output_tokens: u32,
    pub instructions: String,
}

impl SessionRequest {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.session_model.clone(),
            voice: config.voice.clone(),
            temperature: config.temperature,
            max_response_output_tokens: config.max_response_output_tokens,
            instructions: config.instructions.clone(),
        }
    }
}

/// Creates an ephemeral realtime session and checks that a client secret comes back.
pub struct EphemeralSessionProbe {
    transport: Arc<dyn HttpTransport>,
    credential: Option<Credential>,
    api_base: String,
    session: SessionRequest,
    timeout: Duration,
}

impl EphemeralSessionProbe {
    pub const NAME: &'static str = "Realtime Sessions API";

    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credential: Option<Credential>,
        api_base: &str,
        session: SessionRequest,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            credential,
            api_base: api_base.trim_end_matches('/').to_string(),
            session,
            timeout,
        }
    }
}

#[async_trait]
impl Probe for EphemeralSessionProbe {
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

        let body = match serde_json::to_value(&self.session) {
            Ok(body) => body,
            Err(e) => {
                return ProbeResult::transport_error(
                    Self::NAME,
                    format!("could not encode session request: {}", e),
                )
            }
        };
        let url = format!("{}/v1/realtime/sessions", self.api_base);
        debug!(url = %url, payload = %body, "Creating realtime session");

        let request = ProbeRequest::post(url, body, self.timeout).bearer(credential);

        let (status, body) = match fetch_json(self.transport.as_ref(), &request).await {
            Ok(response) => response,
            Err(outcome) => return ProbeResult::new(Self::NAME, outcome),
        };

        let Some(raw_secret) = body.get("client_secret") else {
            return ProbeResult::new(Self::NAME, missing_field(status, "client_secret", &body));
        };

        let (client_secret, expires_at) = match serde_json::from_value(raw_secret.clone()) {
            Ok(ClientSecret::Plain(value)) => (value, None),
            Ok(ClientSecret::Detailed { value, expires_at }) => (value, expires_at),
            Err(_) => {
                return ProbeResult::new(
                    Self::NAME,
                    ProbeOutcome::HttpError {
                        status,
                        body: ResponseBody::Text(format!(
                            "`client_secret` has no usable value: {}",
                            raw_secret
                        )),
                    },
                )
            }
        };

        let payload = SessionPayload {
            client_secret,
            expires_at,
            session_id: body.get("id").and_then(|v| v.as_str()).map(str::to_string),
            model: body.get("model").and_then(|v| v.as_str()).map(str::to_string),
        };

        info!(
            session_id = payload.session_id.as_deref().unwrap_or("-"),
            secret = %payload.secret_preview(),
            expires_at = ?payload.expires_at,
            "Realtime session created"
        );

        ProbeResult::success(Self::NAME, ProbePayload::Session(payload))
    }
}
