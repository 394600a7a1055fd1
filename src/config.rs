use crate::credential::load_env_file;
use clap::{Parser, ValueEnum};
use std::{ffi::OsString, fmt, path::PathBuf, time::Duration};

pub const ENV_FILE_VAR: &str = "PROBE_ENV_FILE";
pub const DEFAULT_ENV_FILE: &str = ".env";

/// The probes this tool knows how to run, in their default order.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// List the provider's models
    Models,
    /// Create an ephemeral realtime session
    Session,
    /// Ask the local development server for a token
    LocalToken,
}

impl ProbeKind {
    pub const ALL: [ProbeKind; 3] = [ProbeKind::Models, ProbeKind::Session, ProbeKind::LocalToken];
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Check realtime API access and the local token endpoint", long_about = None)]
pub struct Config {
    /// Optional key=value file loaded into the environment before anything else
    #[arg(long, env = "PROBE_ENV_FILE", default_value = ".env")]
    pub env_file: PathBuf,

    /// Environment variable holding the provider API key
    #[arg(long, env = "PROBE_CREDENTIAL_VAR", default_value = "OPENAI_API_KEY")]
    pub credential_var: String,

    #[arg(long, env = "OPENAI_API_BASE", default_value = "https://api.openai.com")]
    pub api_base: String,

    #[arg(long, env = "LOCAL_SERVER_URL", default_value = "http://localhost:3000")]
    pub local_url: String,

    /// Character requested from the local token endpoint
    #[arg(long, env = "PROBE_CHARACTER", default_value = "default")]
    pub character: String,

    /// Case-insensitive keyword used to highlight models in the listing
    #[arg(long, env = "PROBE_MODEL_FILTER", default_value = "realtime")]
    pub model_filter: String,

    #[arg(long, env = "REALTIME_MODEL", default_value = "gpt-4o-realtime-preview-2024-12-17")]
    pub session_model: String,

    #[arg(long, env = "REALTIME_VOICE", default_value = "sage")]
    pub voice: String,

    #[arg(long, env = "REALTIME_TEMPERATURE", default_value = "0.8")]
    pub temperature: f64,

    #[arg(long, env = "REALTIME_MAX_OUTPUT_TOKENS", default_value = "4096")]
    pub max_response_output_tokens: u32,

    #[arg(
        long,
        env = "REALTIME_INSTRUCTIONS",
        default_value = "You are a helpful assistant for testing."
    )]
    pub instructions: String,

    #[arg(long, env = "PROBE_LIST_TIMEOUT_SECS", default_value = "10")]
    pub list_timeout_secs: u64,

    #[arg(long, env = "PROBE_SESSION_TIMEOUT_SECS", default_value = "30")]
    pub session_timeout_secs: u64,

    #[arg(long, env = "PROBE_LOCAL_TIMEOUT_SECS", default_value = "5")]
    pub local_timeout_secs: u64,

    /// Run only these probes (comma separated); all probes when omitted
    #[arg(long, value_enum, value_delimiter = ',')]
    pub only: Vec<ProbeKind>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Exit with status 0 even when probes fail
    #[arg(long)]
    pub exit_zero: bool,
}

impl Config {
    /// Load the env file, then parse `args`, so settings from the file reach
    /// every `env` fallback.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        load_env_file(&env_file_path(&args));
        Self::parse_from(args)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.credential_var.trim().is_empty() {
            anyhow::bail!("Credential variable name must not be empty");
        }

        for (name, url) in [("API base", &self.api_base), ("Local server", &self.local_url)] {
            if let Err(e) = reqwest::Url::parse(url) {
                anyhow::bail!("{} URL '{}' is invalid: {}", name, url, e);
            }
        }

        if self.model_filter.trim().is_empty() {
            anyhow::bail!("Model filter must not be empty");
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!("Temperature must be between 0.0 and 2.0");
        }

        if self.max_response_output_tokens == 0 {
            anyhow::bail!("Max response output tokens must be greater than 0");
        }

        if self.list_timeout_secs == 0
            || self.session_timeout_secs == 0
            || self.local_timeout_secs == 0
        {
            anyhow::bail!("Timeouts must be greater than 0");
        }

        Ok(())
    }

    /// Selected probes in canonical order, deduplicated.
    pub fn selected_probes(&self) -> Vec<ProbeKind> {
        if self.only.is_empty() {
            return ProbeKind::ALL.to_vec();
        }
        ProbeKind::ALL
            .into_iter()
            .filter(|kind| self.only.contains(kind))
            .collect()
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    pub fn local_timeout(&self) -> Duration {
        Duration::from_secs(self.local_timeout_secs)
    }
}

/// `--env-file` from the arguments, else `PROBE_ENV_FILE`, else `.env`.
pub fn env_file_path(args: &[OsString]) -> PathBuf {
    let mut args = args.iter().skip(1).map(|arg| arg.to_str());
    while let Some(arg) = args.next() {
        match arg {
            Some("--") => break,
            Some("--env-file") => {
                if let Some(Some(path)) = args.next() {
                    return PathBuf::from(path);
                }
            }
            Some(arg) => {
                if let Some(path) = arg.strip_prefix("--env-file=") {
                    return PathBuf::from(path);
                }
            }
            None => {}
        }
    }

    std::env::var_os(ENV_FILE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Env file: {}", self.env_file.display())?;
        writeln!(f, "  Credential variable: {}", self.credential_var)?;
        writeln!(f, "  API base: {}", self.api_base)?;
        writeln!(f, "  Local server: {} (character: {})", self.local_url, self.character)?;
        writeln!(f, "  Session model: {} (voice: {})", self.session_model, self.voice)?;
        writeln!(f, "  Timeouts: list={}s, session={}s, local={}s",
            self.list_timeout_secs,
            self.session_timeout_secs,
            self.local_timeout_secs)?;
        Ok(())
    }
}
