use crate::{
    capability_probe::CapabilityListProbe,
    config::{Config, ProbeKind},
    credential::{load_credential, Credential},
    local_health_probe::LocalHealthProbe,
    probe::Probe,
    report::{render, Summary},
    runner::run_all,
    session_probe::{EphemeralSessionProbe, SessionRequest},
    transport::{HttpTransport, ReqwestTransport},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the selected probes in canonical order.
pub fn build_probes(
    config: &Config,
    credential: Option<Credential>,
    transport: Arc<dyn HttpTransport>,
) -> Vec<Box<dyn Probe>> {
    let probes: Vec<Box<dyn Probe>> = config
        .selected_probes()
        .into_iter()
        .map(|kind| -> Box<dyn Probe> {
            match kind {
                ProbeKind::Models => Box::new(
                    CapabilityListProbe::new(
                        transport.clone(),
                        credential.clone(),
                        &config.api_base,
                        config.list_timeout(),
                    )
                    .with_keyword(config.model_filter.clone()),
                ),
                ProbeKind::Session => Box::new(EphemeralSessionProbe::new(
                    transport.clone(),
                    credential.clone(),
                    &config.api_base,
                    SessionRequest::from_config(config),
                    config.session_timeout(),
                )),
                ProbeKind::LocalToken => Box::new(LocalHealthProbe::new(
                    transport.clone(),
                    &config.local_url,
                    &config.character,
                    config.local_timeout(),
                )),
            }
        })
        .collect();

    if credential.is_none() {
        for probe in probes.iter().filter(|p| p.requires_credential()) {
            warn!(
                probe = probe.name(),
                key = %config.credential_var,
                "No credential, probe will be skipped"
            );
        }
    }

    probes
}

/// Run every selected probe against `transport` and summarize the results.
pub async fn run_probes(
    config: &Config,
    credential: Option<Credential>,
    transport: Arc<dyn HttpTransport>,
) -> Summary {
    let probes = build_probes(config, credential, transport);
    let results = run_all(&probes).await;
    render(&results)
}

/// Load the credential, run the probes over HTTP and print the report.
pub async fn run_with_config(config: Config) -> anyhow::Result<Summary> {
    config.validate()?;
    info!("{}", config);

    let credential = load_credential(&config.credential_var);
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new()?);

    let summary = run_probes(&config, credential, transport).await;

    if config.json {
        println!("{}", summary.to_json()?);
    } else {
        println!("{}", summary);
    }

    Ok(summary)
}
