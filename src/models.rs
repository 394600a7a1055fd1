use crate::credential::Credential;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// One HTTP call, fully described before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl ProbeRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    pub fn post(url: impl Into<String>, body: Value, timeout: Duration) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
            timeout,
        }
    }

    pub fn bearer(mut self, credential: &Credential) -> Self {
        self.headers
            .push(("Authorization".to_string(), credential.bearer()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Error body as returned by the server: JSON when it parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw.to_string()),
        }
    }
}

impl std::fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{}", value),
            ResponseBody::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Success,
    HttpError { status: u16, body: ResponseBody },
    TransportError { message: String },
    SkippedMissingCredential,
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success)
    }
}

/// `client_secret` arrives either as a bare string or as an object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ClientSecret {
    Plain(String),
    Detailed {
        value: String,
        #[serde(default)]
        expires_at: Option<i64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionPayload {
    /// Only the preview is ever serialized.
    #[serde(rename = "client_secret_preview", serialize_with = "serialize_preview")]
    pub client_secret: String,
    pub expires_at: Option<i64>,
    pub session_id: Option<String>,
    pub model: Option<String>,
}

impl SessionPayload {
    pub fn secret_preview(&self) -> String {
        preview(&self.client_secret)
    }
}

fn preview(secret: &str) -> String {
    let head: String = secret.chars().take(10).collect();
    format!("{}...", head)
}

fn serialize_preview<S: serde::Serializer>(secret: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&preview(secret))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbePayload {
    Models { ids: Vec<String>, matching: Vec<String> },
    Session(SessionPayload),
    Json { value: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub name: String,
    pub outcome: ProbeOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ProbePayload>,
    /// Hint for the reader, e.g. how to start a local server that was unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub latency_ms: Option<u64>,
}

impl ProbeResult {
    pub fn new(name: impl Into<String>, outcome: ProbeOutcome) -> Self {
        Self {
            name: name.into(),
            outcome,
            payload: None,
            note: None,
            latency_ms: None,
        }
    }

    pub fn success(name: impl Into<String>, payload: ProbePayload) -> Self {
        Self {
            payload: Some(payload),
            ..Self::new(name, ProbeOutcome::Success)
        }
    }

    pub fn skipped(name: impl Into<String>) -> Self {
        Self::new(name, ProbeOutcome::SkippedMissingCredential)
    }

    pub fn transport_error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            name,
            ProbeOutcome::TransportError {
                message: message.into(),
            },
        )
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_success()
    }
}
