use crate::models::{ProbeOutcome, ProbePayload, ProbeResult};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

const RULE: &str = "==================================================";
const MAX_BODY_CHARS: usize = 300;

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub results: Vec<ProbeResult>,
    pub passed: usize,
    pub total: usize,
    pub success: bool,
}

/// Aggregate probe results. A probe passes only on `Success`.
pub fn render(results: &[ProbeResult]) -> Summary {
    let passed = results.iter().filter(|r| r.passed()).count();
    let total = results.len();
    Summary {
        results: results.to_vec(),
        passed,
        total,
        success: passed == total,
    }
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "PROBE SUMMARY")?;
        writeln!(f, "{}", RULE)?;

        for result in &self.results {
            let status = if result.passed() { "PASS" } else { "FAIL" };
            match result.latency_ms {
                Some(ms) => writeln!(f, "{}  {} ({} ms)", status, result.name, ms)?,
                None => writeln!(f, "{}  {}", status, result.name)?,
            }
            writeln!(f, "      {}", describe(result))?;
            if let Some(note) = &result.note {
                writeln!(f, "      hint: {}", note)?;
            }
        }

        writeln!(f)?;
        if self.success {
            writeln!(f, "All probes passed. The realtime integration should work.")?;
        } else {
            writeln!(f, "Some probes failed. Check the details above.")?;
        }
        write!(f, "Result: {}/{} probes passed", self.passed, self.total)
    }
}

/// One-line explanation of a probe result.
pub fn describe(result: &ProbeResult) -> String {
    match &result.outcome {
        ProbeOutcome::Success => match &result.payload {
            Some(ProbePayload::Models { ids, matching }) => {
                let matching = if matching.is_empty() {
                    "none".to_string()
                } else {
                    matching.join(", ")
                };
                format!("{} models available; matching: {}", ids.len(), matching)
            }
            Some(ProbePayload::Session(session)) => {
                let expiry = session
                    .expires_at
                    .and_then(|secs| format_timestamp(secs, &chrono::Local))
                    .unwrap_or_else(|| "no expiry given".to_string());
                format!(
                    "client secret {} (expires: {})",
                    session.secret_preview(),
                    expiry
                )
            }
            Some(ProbePayload::Json { value }) => {
                format!("response: {}", truncate(&value.to_string()))
            }
            None => "ok".to_string(),
        },
        ProbeOutcome::HttpError { status, body } => {
            format!("HTTP {}: {}", status, truncate(&body.to_string()))
        }
        ProbeOutcome::TransportError { message } => {
            format!("transport error (no HTTP response): {}", message)
        }
        ProbeOutcome::SkippedMissingCredential => {
            "skipped: API credential not available".to_string()
        }
    }
}

fn format_timestamp<Tz: TimeZone>(secs: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: fmt::Display,
{
    DateTime::<Utc>::from_timestamp(secs, 0).map(|time| {
        time.with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    })
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_BODY_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_BODY_CHARS).collect();
    format!("{}...", head)
}
