use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VhostInfo {
    pub name: String,
    pub description: String,
    pub tracing: bool,
    pub messages: u64,
    pub messages_ready: u64,
    pub messages_unacknowledged: u64,
}
