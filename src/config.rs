use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{MgmtError, Result};

// --- CLIENT ---

/// Everything a [`crate::ManagementClient`] needs, fixed at construction.
///
/// The client itself never consults the environment; [`Config::load`] is an
/// explicit opt-in used by the probe binary.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URI of the management API, e.g. `http://localhost:15672/api/`.
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Default per-request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

// --- CONFIG AGGREGATOR (probe binary) ---

#[derive(Debug, Clone)]
pub struct Config {
    pub client: ClientConfig,
    pub log_level: String,
}

impl Config {
    /// Reads `.env` (if any) then `MGMT_*` variables, falling back to a local
    /// broker with the default guest account.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let timeout_ms: u64 = get_env("MGMT_TIMEOUT_MS", "10000")?;
        let mut client = ClientConfig::new(
            get_env::<String>("MGMT_URL",      "http://127.0.0.1:15672/api/")?,
            get_env::<String>("MGMT_USER",     "guest")?,
            get_env::<String>("MGMT_PASSWORD", "guest")?,
        );
        if timeout_ms > 0 {
            client = client.with_timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            client,
            log_level: get_env("MGMT_LOG", "info")?,
        })
    }
}

// --- PRIVATE HELPER ---

fn get_env<T: std::str::FromStr>(key: &str, default: &str) -> Result<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| MgmtError::InvalidConfig(format!("{} must be valid", key)))
}
