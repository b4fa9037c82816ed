//! One `Decode` impl per entity kind. Field names follow the broker's JSON.

use serde_json::Value;

use super::{Decode, FieldCursor};
use crate::error::Result;
use crate::models::*;

// ========================================
// OVERVIEW
// ========================================

impl Decode for Overview {
    const KIND: &'static str = "overview";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            node: c.required_str("node")?,
            cluster_name: c.string("cluster_name")?,
            management_version: c.string("management_version")?,
            broker_version: c.string("rabbitmq_version")?,
            erlang_version: c.string("erlang_version")?,
            erlang_full_version: c.string("erlang_full_version")?,
            statistics_db_node: c.string("statistics_db_node")?,
            message_stats: c.nested("message_stats")?,
            queue_totals: c.nested("queue_totals")?,
            object_totals: c.nested("object_totals")?,
            listeners: c.list("listeners")?,
            contexts: c.list("contexts")?,
            exchange_types: c.list("exchange_types")?,
        })
    }
}

impl Decode for RateDetails {
    const KIND: &'static str = "rate details";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self { rate: c.f64("rate")? })
    }
}

impl Decode for MessageStats {
    const KIND: &'static str = "message stats";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            publish: c.u64("publish")?,
            publish_details: c.nested("publish_details")?,
            deliver: c.u64("deliver")?,
            deliver_details: c.nested("deliver_details")?,
            deliver_get: c.u64("deliver_get")?,
            deliver_get_details: c.nested("deliver_get_details")?,
            redeliver: c.u64("redeliver")?,
            redeliver_details: c.nested("redeliver_details")?,
            ack: c.u64("ack")?,
            ack_details: c.nested("ack_details")?,
            return_unroutable: c.u64("return_unroutable")?,
            return_unroutable_details: c.nested("return_unroutable_details")?,
            confirm: c.u64("confirm")?,
            confirm_details: c.nested("confirm_details")?,
        })
    }
}

impl Decode for QueueTotals {
    const KIND: &'static str = "queue totals";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            messages: c.u64("messages")?,
            messages_ready: c.u64("messages_ready")?,
            messages_unacknowledged: c.u64("messages_unacknowledged")?,
        })
    }
}

impl Decode for ObjectTotals {
    const KIND: &'static str = "object totals";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            connections: c.u64("connections")?,
            channels: c.u64("channels")?,
            exchanges: c.u64("exchanges")?,
            queues: c.u64("queues")?,
            consumers: c.u64("consumers")?,
        })
    }
}

impl Decode for Listener {
    const KIND: &'static str = "listener";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            node: c.string("node")?,
            protocol: c.string("protocol")?,
            ip_address: c.string("ip_address")?,
            port: c.u64("port")?,
        })
    }
}

impl Decode for Context {
    const KIND: &'static str = "context";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            node: c.string("node")?,
            description: c.string("description")?,
            path: c.string("path")?,
            port: c.u64("port")?,
        })
    }
}

impl Decode for ExchangeType {
    const KIND: &'static str = "exchange type";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            name: c.required_str("name")?,
            description: c.string("description")?,
            enabled: c.bool("enabled")?,
        })
    }
}

// ========================================
// NODES
// ========================================

impl Decode for NodeInfo {
    const KIND: &'static str = "node";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            name: c.required_str("name")?,
            node_type: NodeType::parse(&c.string("type")?),
            running: c.bool("running")?,
            fd_used: c.u64("fd_used")?,
            fd_total: c.u64("fd_total")?,
            sockets_used: c.u64("sockets_used")?,
            sockets_total: c.u64("sockets_total")?,
            proc_used: c.u64("proc_used")?,
            proc_total: c.u64("proc_total")?,
            run_queue: c.u64("run_queue")?,
            processors: c.u64("processors")?,
            mem_used: c.u64("mem_used")?,
            mem_limit: c.u64("mem_limit")?,
            mem_alarm: c.bool("mem_alarm")?,
            disk_free: c.u64("disk_free")?,
            disk_free_limit: c.u64("disk_free_limit")?,
            disk_free_alarm: c.bool("disk_free_alarm")?,
            uptime: c.u64("uptime")?,
            auth_mechanisms: c.list("auth_mechanisms")?,
            applications: c.list("applications")?,
        })
    }
}

impl Decode for AuthMechanism {
    const KIND: &'static str = "auth mechanism";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            name: c.required_str("name")?,
            description: c.string("description")?,
            enabled: c.bool("enabled")?,
        })
    }
}

impl Decode for ErlangApp {
    const KIND: &'static str = "application";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            name: c.required_str("name")?,
            description: c.string("description")?,
            version: c.string("version")?,
        })
    }
}

// ========================================
// CONNECTIONS & CHANNELS
// ========================================

impl Decode for ConnectionInfo {
    const KIND: &'static str = "connection";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            name: c.required_str("name")?,
            node: c.string("node")?,
            host: c.string("host")?,
            port: c.u64("port")?,
            peer_host: c.string("peer_host")?,
            peer_port: c.u64("peer_port")?,
            ssl: c.bool("ssl")?,
            protocol: c.string("protocol")?,
            user: c.string("user")?,
            vhost: c.string("vhost")?,
            state: c.string("state")?,
            channels: c.u64("channels")?,
            auth_mechanism: c.string("auth_mechanism")?,
            connected_at: c.u64("connected_at")?,
        })
    }
}

impl Decode for ChannelInfo {
    const KIND: &'static str = "channel";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        // The owning connection is part of the channel's identity.
        let connection_name = match c.cursor("connection_details")? {
            Some(details) => details.required_str("name")?,
            None => {
                return Err(crate::error::MgmtError::malformed(
                    Self::KIND,
                    "missing required field 'connection_details'",
                ))
            }
        };
        Ok(Self {
            name: c.string("name")?,
            connection_name,
            number: c.required_u64("number")?,
            consumer_count: c.u64("consumer_count")?,
            node: c.string("node")?,
            state: c.string("state")?,
            transactional: c.bool("transactional")?,
            confirm: c.bool("confirm")?,
            user: c.string("user")?,
            vhost: c.string("vhost")?,
            prefetch_count: c.u64("prefetch_count")?,
            messages_unacknowledged: c.u64("messages_unacknowledged")?,
            messages_unconfirmed: c.u64("messages_unconfirmed")?,
        })
    }
}

// ========================================
// IDENTITY, VHOSTS, QUEUES
// ========================================

impl Decode for WhoAmI {
    const KIND: &'static str = "whoami";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            name: c.required_str("name")?,
            tags: c.string_list("tags")?,
        })
    }
}

impl Decode for VhostInfo {
    const KIND: &'static str = "vhost";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            name: c.required_str("name")?,
            description: c.string("description")?,
            tracing: c.bool("tracing")?,
            messages: c.u64("messages")?,
            messages_ready: c.u64("messages_ready")?,
            messages_unacknowledged: c.u64("messages_unacknowledged")?,
        })
    }
}

impl Decode for QueueInfo {
    const KIND: &'static str = "queue";

    fn decode(value: &Value) -> Result<Self> {
        let c = FieldCursor::new(Self::KIND, value)?;
        Ok(Self {
            name: c.required_str("name")?,
            vhost: c.required_str("vhost")?,
            node: c.string("node")?,
            state: c.string("state")?,
            durable: c.bool("durable")?,
            auto_delete: c.bool("auto_delete")?,
            exclusive: c.bool("exclusive")?,
            messages: c.u64("messages")?,
            messages_ready: c.u64("messages_ready")?,
            messages_unacknowledged: c.u64("messages_unacknowledged")?,
            consumers: c.u64("consumers")?,
            memory: c.u64("memory")?,
        })
    }
}
