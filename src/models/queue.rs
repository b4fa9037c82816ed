use serde::Serialize;

/// A queue, keyed by `(vhost, name)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueueInfo {
    pub name: String,
    pub vhost: String,
    pub node: String,
    pub state: String,
    pub durable: bool,
    pub auto_delete: bool,
    pub exclusive: bool,
    pub messages: u64,
    pub messages_ready: u64,
    pub messages_unacknowledged: u64,
    pub consumers: u64,
    pub memory: u64,
}

impl QueueInfo {
    pub fn is_idle(&self) -> bool {
        self.messages == 0 && self.consumers == 0
    }
}
