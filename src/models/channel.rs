use serde::Serialize;

/// A channel on some connection. Channel numbers are only unique per
/// connection, so `(connection_name, number)` is the identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChannelInfo {
    pub name: String,
    pub connection_name: String,
    pub number: u64,
    pub consumer_count: u64,
    pub node: String,
    pub state: String,
    pub transactional: bool,
    pub confirm: bool,
    pub user: String,
    pub vhost: String,
    pub prefetch_count: u64,
    pub messages_unacknowledged: u64,
    pub messages_unconfirmed: u64,
}

impl ChannelInfo {
    pub fn uses_publisher_confirms(&self) -> bool {
        self.confirm
    }

    pub fn has_consumers(&self) -> bool {
        self.consumer_count > 0
    }
}
