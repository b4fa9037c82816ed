use serde::Serialize;

/// Cluster-wide summary returned by `GET /api/overview`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Overview {
    pub node: String,
    pub cluster_name: String,
    pub management_version: String,
    pub broker_version: String,
    pub erlang_version: String,
    pub erlang_full_version: String,
    pub statistics_db_node: String,
    pub message_stats: MessageStats,
    pub queue_totals: QueueTotals,
    pub object_totals: ObjectTotals,
    pub listeners: Vec<Listener>,
    pub contexts: Vec<Context>,
    pub exchange_types: Vec<ExchangeType>,
}

impl Overview {
    pub fn supports_exchange_type(&self, name: &str) -> bool {
        self.exchange_types.iter().any(|t| t.name == name)
    }

    pub fn listeners_for<'a>(
        &'a self,
        protocol: &'a str,
    ) -> impl Iterator<Item = &'a Listener> + 'a {
        self.listeners.iter().filter(move |l| l.protocol == protocol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RateDetails {
    pub rate: f64,
}

/// Message counters since the statistics database started, each with the
/// current per-second rate.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MessageStats {
    pub publish: u64,
    pub publish_details: RateDetails,
    pub deliver: u64,
    pub deliver_details: RateDetails,
    pub deliver_get: u64,
    pub deliver_get_details: RateDetails,
    pub redeliver: u64,
    pub redeliver_details: RateDetails,
    pub ack: u64,
    pub ack_details: RateDetails,
    pub return_unroutable: u64,
    pub return_unroutable_details: RateDetails,
    pub confirm: u64,
    pub confirm_details: RateDetails,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueueTotals {
    pub messages: u64,
    pub messages_ready: u64,
    pub messages_unacknowledged: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ObjectTotals {
    pub connections: u64,
    pub channels: u64,
    pub exchanges: u64,
    pub queues: u64,
    pub consumers: u64,
}

/// A protocol listener bound on some node.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Listener {
    pub node: String,
    pub protocol: String,
    pub ip_address: String,
    pub port: u64,
}

/// A web context (management UI, plugins).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Context {
    pub node: String,
    pub description: String,
    pub path: String,
    pub port: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExchangeType {
    pub name: String,
    pub description: String,
    pub enabled: bool,
}
