use crate::{
    models::{ProbeOutcome, ProbeRequest, ProbeResult, ResponseBody},
    transport::HttpTransport,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

/// One HTTP exchange against one service, classified into a `ProbeOutcome`.
/// A probe that needs the credential and has none is skipped without
/// touching the network.
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;

    fn requires_credential(&self) -> bool;

    /// Always yields a result; failures are encoded in the outcome.
    async fn run(&self) -> ProbeResult;
}

/// Send `request` and return the status and JSON body of a 2xx response.
///
/// Anything else is turned into the outcome the probe should report.
pub(crate) async fn fetch_json(
    transport: &dyn HttpTransport,
    request: &ProbeRequest,
) -> std::result::Result<(u16, Value), ProbeOutcome> {
    let response = match transport.execute(request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(url = %request.url, error_code = e.error_code(), "Request failed: {}", e);
            return Err(ProbeOutcome::TransportError {
                message: e.to_string(),
            });
        }
    };

    debug!(status = response.status, headers = ?response.headers, "Response headers");

    if !response.is_success() {
        warn!(url = %request.url, status = response.status, "Request returned an error status");
        return Err(ProbeOutcome::HttpError {
            status: response.status,
            body: ResponseBody::parse(&response.body),
        });
    }

    serde_json::from_str(&response.body)
        .map(|value| (response.status, value))
        .map_err(|e| ProbeOutcome::HttpError {
            status: response.status,
            body: ResponseBody::Text(format!("response is not valid JSON: {}", e)),
        })
}

/// Failure for a 2xx body that lacks a field the probe depends on.
pub(crate) fn missing_field(status: u16, field: &str, body: &Value) -> ProbeOutcome {
    let keys = body
        .as_object()
        .map(|object| object.keys().cloned().collect::<Vec<_>>().join(", "))
        .unwrap_or_default();
    ProbeOutcome::HttpError {
        status,
        body: ResponseBody::Text(format!(
            "response is missing `{}` (available keys: [{}])",
            field, keys
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ProbeError,
        models::HttpResponse,
        transport::MockHttpTransport,
    };
    use serde_json::json;
    use std::time::Duration;

    fn request() -> ProbeRequest {
        ProbeRequest::get("http://localhost:1/x", Duration::from_secs(1))
    }

    fn respond(status: u16, body: &str) -> MockHttpTransport {
        let body = body.to_string();
        let mut transport = MockHttpTransport::new();
        transport.expect_execute().times(1).returning(move |_| {
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.clone(),
            })
        });
        transport
    }

    #[tokio::test]
    async fn test_fetch_json_success() {
        let transport = respond(200, r#"{"ok":true}"#);
        let (status, value) = fetch_json(&transport, &request()).await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_fetch_json_error_status_keeps_raw_text() {
        let transport = respond(502, "Bad Gateway");
        let outcome = fetch_json(&transport, &request()).await.unwrap_err();
        assert_eq!(
            outcome,
            ProbeOutcome::HttpError {
                status: 502,
                body: ResponseBody::Text("Bad Gateway".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_json_non_json_success_body() {
        let transport = respond(200, "<html></html>");
        match fetch_json(&transport, &request()).await.unwrap_err() {
            ProbeOutcome::HttpError { status, body: ResponseBody::Text(text) } => {
                assert_eq!(status, 200);
                assert!(text.starts_with("response is not valid JSON"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_json_timeout() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Err(ProbeError::Timeout));

        let outcome = fetch_json(&transport, &request()).await.unwrap_err();
        assert_eq!(
            outcome,
            ProbeOutcome::TransportError {
                message: "timeout".to_string()
            }
        );
    }

    #[test]
    fn test_missing_field_lists_keys() {
        let outcome = missing_field(200, "data", &json!({"object": "list"}));
        assert_eq!(
            outcome,
            ProbeOutcome::HttpError {
                status: 200,
                body: ResponseBody::Text(
                    "response is missing `data` (available keys: [object])".to_string()
                )
            }
        );
    }
}
