use realtime_probe::config::{Config, ProbeKind};
use realtime_probe::credential::Credential;
use realtime_probe::error::ProbeError;
use realtime_probe::models::{ProbeOutcome, ProbeResult, ResponseBody};
use realtime_probe::report::render;
use std::path::PathBuf;

fn base_config() -> Config {
    Config {
        env_file: PathBuf::from(".env"),
        credential_var: "OPENAI_API_KEY".to_string(),
        api_base: "https://api.openai.com".to_string(),
        local_url: "http://localhost:3000".to_string(),
        character: "default".to_string(),
        model_filter: "realtime".to_string(),
        session_model: "gpt-4o-realtime-preview-2024-12-17".to_string(),
        voice: "sage".to_string(),
        temperature: 0.8,
        max_response_output_tokens: 4096,
        instructions: "You are a helpful assistant for testing.".to_string(),
        list_timeout_secs: 10,
        session_timeout_secs: 30,
        local_timeout_secs: 5,
        only: Vec::new(),
        json: false,
        exit_zero: false,
    }
}

#[test]
fn test_config_validation() {
    let mut config = base_config();
    assert!(config.validate().is_ok());

    // Unparsable local server URL
    config.local_url = "not a url".to_string();
    assert!(config.validate().is_err());
    config.local_url = "http://localhost:3000".to_string();

    // Empty credential variable name
    config.credential_var = String::new();
    assert!(config.validate().is_err());
    config.credential_var = "OPENAI_API_KEY".to_string();

    // Output token cap
    config.max_response_output_tokens = 0;
    assert!(config.validate().is_err());
    config.max_response_output_tokens = 4096;

    // Timeouts
    config.list_timeout_secs = 0;
    assert!(config.validate().is_err());
    config.list_timeout_secs = 10;

    assert!(config.validate().is_ok());
}

#[test]
fn test_probe_selection() {
    let mut config = base_config();
    assert_eq!(
        config.selected_probes(),
        vec![ProbeKind::Models, ProbeKind::Session, ProbeKind::LocalToken]
    );

    config.only = vec![ProbeKind::LocalToken, ProbeKind::Session, ProbeKind::LocalToken];
    assert_eq!(
        config.selected_probes(),
        vec![ProbeKind::Session, ProbeKind::LocalToken]
    );
}

#[test]
fn test_config_display_has_no_secret() {
    let text = base_config().to_string();
    assert!(text.contains("Credential variable: OPENAI_API_KEY"));
    assert!(text.contains("Timeouts: list=10s, session=30s, local=5s"));
}

#[test]
fn test_error_codes() {
    assert_eq!(ProbeError::Timeout.error_code(), "TIMEOUT");
    assert_eq!(
        ProbeError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string()
        }
        .error_code(),
        "INVALID_URL"
    );
    assert!(ProbeError::Connect("refused".to_string()).is_connection_failure());
}

#[test]
fn test_credential_is_masked_in_results() {
    let credential = Credential::new("sk-proj-0123456789abcdefghij").unwrap();
    let masked = format!("{:?}", credential);
    assert!(masked.contains("sk-proj-0123"));
    assert!(!masked.contains("abcdefghij"));
}

#[test]
fn test_only_success_passes() {
    let results = vec![
        ProbeResult::skipped("Basic API Access"),
        ProbeResult::transport_error("Local Server Token Endpoint", "timeout"),
        ProbeResult::new(
            "Realtime Sessions API",
            ProbeOutcome::HttpError {
                status: 500,
                body: ResponseBody::Text("boom".to_string()),
            },
        ),
    ];

    let summary = render(&results);
    assert_eq!(summary.passed, 0);
    assert_eq!(summary.total, 3);
    assert!(!summary.is_success());
    assert!(summary.to_string().ends_with("Result: 0/3 probes passed"));
}

#[test]
fn test_empty_run_is_success() {
    let summary = render(&[]);
    assert!(summary.is_success());
    assert!(summary.to_string().ends_with("Result: 0/0 probes passed"));
}
