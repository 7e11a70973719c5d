use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::error::{ConsoleError, ConsoleResult};

const DEFAULT_API_URL: &str = "http://127.0.0.1:3001";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeout: Duration,
}

impl ConsoleConfig {
    pub fn load() -> ConsoleResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConsoleResult<Self> {
        let api_url = lookup("MES_API_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());

        let session_file = lookup("MES_SESSION_FILE")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_session_file(&lookup));

        let timeout_secs = match lookup("MES_HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|error| {
                ConsoleError::Config(format!("invalid MES_HTTP_TIMEOUT_SECS '{value}': {error}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConsoleError::Config(
                "MES_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_url,
            session_file,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn default_session_file(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    match lookup("HOME").filter(|value| !value.trim().is_empty()) {
        Some(home) => PathBuf::from(home).join(".mes").join("session.json"),
        None => PathBuf::from(".mes-session.json"),
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
