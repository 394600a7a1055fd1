use crate::{models::ProbeResult, probe::Probe};
use futures::FutureExt;
use std::{any::Any, panic::AssertUnwindSafe, time::Instant};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Run `probes` one after another, in order.
///
/// Returns exactly one result per probe. A probe that panics is reported as a
/// transport error and the remaining probes still run.
pub async fn run_all(probes: &[Box<dyn Probe>]) -> Vec<ProbeResult> {
    let run_id = Uuid::new_v4();
    info!(run_id = %run_id, probes = probes.len(), "Starting probe run");

    let mut results = Vec::with_capacity(probes.len());
    for (index, probe) in probes.iter().enumerate() {
        let span = info_span!("probe", run_id = %run_id, index, probe = probe.name());
        let result = run_one(&**probe).instrument(span).await;
        results.push(result);
    }

    let passed = results.iter().filter(|r| r.passed()).count();
    info!(run_id = %run_id, passed, total = results.len(), "Probe run finished");
    results
}

async fn run_one(probe: &dyn Probe) -> ProbeResult {
    let started = Instant::now();

    let mut result = match AssertUnwindSafe(probe.run()).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let message = panic_message(&*panic);
            error!(probe = probe.name(), "Probe crashed: {}", message);
            ProbeResult::transport_error(probe.name(), format!("probe panicked: {}", message))
        }
    };

    result.latency_ms = Some(started.elapsed().as_millis() as u64);
    result
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
