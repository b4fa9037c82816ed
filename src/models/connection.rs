use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::utils::utils_time::millis_to_utc;

/// A client connection. `name` is the handle for lookups and closure.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConnectionInfo {
    pub name: String,
    pub node: String,
    pub host: String,
    pub port: u64,
    pub peer_host: String,
    pub peer_port: u64,
    pub ssl: bool,
    pub protocol: String,
    pub user: String,
    pub vhost: String,
    pub state: String,
    pub channels: u64,
    pub auth_mechanism: String,
    /// Milliseconds since the Unix epoch, 0 when the broker omits it.
    pub connected_at: u64,
}

impl ConnectionInfo {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }

    pub fn connected_at_utc(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.connected_at)
    }
}
