//! Resource Client: the public face of the crate.
//!
//! Every method is one executor round trip followed by one decode. The
//! client holds no mutable state, so a single instance (or its clones) can
//! serve any number of concurrent calls. Two concurrent list calls may see
//! different cluster snapshots; that is expected.

pub mod executor;

use std::time::Duration;

use reqwest::Url;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::decode::{decode_list, Decode};
use crate::error::{MgmtError, Result};
use crate::models::*;
use executor::{ApiRequest, Reply, RequestExecutor};

/// Header the broker records as the close reason shown to the peer.
const CLOSE_REASON_HEADER: &str = "X-Reason";

#[derive(Debug, Clone)]
pub struct ManagementClient {
    executor: RequestExecutor,
}

impl ManagementClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            executor: RequestExecutor::new(&config)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        self.executor.base_url()
    }

    /// A clone of this client whose requests give up after `timeout`.
    ///
    /// A timed-out mutation has no outcome guarantee: the broker may or may
    /// not have applied it.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            executor: self.executor.with_timeout(timeout),
        }
    }

    // ========================================
    // PLUMBING
    // ========================================

    async fn fetch<T: Decode>(&self, segments: &[&str]) -> Result<T> {
        match self.executor.execute(ApiRequest::get(segments)).await? {
            Reply::Json(body) => T::decode(&body),
            Reply::Empty => Err(MgmtError::malformed(T::KIND, "empty response body")),
        }
    }

    async fn fetch_list<T: Decode>(&self, segments: &[&str]) -> Result<Vec<T>> {
        match self.executor.execute(ApiRequest::get(segments)).await? {
            Reply::Json(body) => decode_list(&body),
            Reply::Empty => Err(MgmtError::malformed(T::KIND, "empty response body")),
        }
    }

    // ========================================
    // CLUSTER
    // ========================================

    pub async fn get_overview(&self) -> Result<Overview> {
        self.fetch(&["overview"]).await
    }

    /// Asks the broker to publish and consume a test message on `vhost`.
    ///
    /// Any answer from the broker other than `{"status": "ok"}` is `false`,
    /// including rejections and 5xx replies. Only authentication failures,
    /// transport failures and undecodable bodies are errors.
    pub async fn aliveness_test(&self, vhost: &str) -> Result<bool> {
        match self
            .executor
            .execute(ApiRequest::get(&["aliveness-test", vhost]))
            .await
        {
            Ok(Reply::Json(body)) => Ok(body.get("status").and_then(Value::as_str) == Some("ok")),
            Ok(Reply::Empty) => Ok(false),
            Err(MgmtError::RequestRejected { status, reason, .. }) => {
                tracing::info!(vhost, status, %reason, "aliveness test rejected");
                Ok(false)
            }
            Err(MgmtError::BrokerUnavailable { status: Some(status), reason }) => {
                tracing::info!(vhost, status, %reason, "aliveness test failed on broker");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn who_am_i(&self) -> Result<WhoAmI> {
        self.fetch(&["whoami"]).await
    }

    // ========================================
    // NODES
    // ========================================

    /// Nodes in the broker's order.
    pub async fn get_nodes(&self) -> Result<Vec<NodeInfo>> {
        self.fetch_list(&["nodes"]).await
    }

    /// Unknown names surface as `RequestRejected` with status 404.
    pub async fn get_node(&self, name: &str) -> Result<NodeInfo> {
        self.fetch(&["nodes", name]).await
    }

    // ========================================
    // CONNECTIONS
    // ========================================

    pub async fn get_connections(&self) -> Result<Vec<ConnectionInfo>> {
        self.fetch_list(&["connections"]).await
    }

    pub async fn get_connection(&self, name: &str) -> Result<ConnectionInfo> {
        self.fetch(&["connections", name]).await
    }

    /// Asks the broker to force-close a connection.
    ///
    /// Returns once the broker has accepted the request. The connection
    /// itself terminates asynchronously; only its peer observes that, so
    /// a later `get_connection` may still find it for a short while.
    pub async fn close_connection(&self, name: &str) -> Result<()> {
        self.request_close(ApiRequest::delete(&["connections", name]), name)
            .await
    }

    /// Like [`close_connection`](Self::close_connection), with a reason the
    /// broker passes on to the peer.
    pub async fn close_connection_with_reason(&self, name: &str, reason: &str) -> Result<()> {
        let request = ApiRequest::delete(&["connections", name])
            .header(CLOSE_REASON_HEADER, header_safe(reason));
        self.request_close(request, name).await
    }

    async fn request_close(&self, request: ApiRequest<'_>, name: &str) -> Result<()> {
        self.executor.execute(request).await?;
        tracing::info!(connection = name, "connection close accepted by broker");
        Ok(())
    }

    pub async fn get_connection_channels(&self, name: &str) -> Result<Vec<ChannelInfo>> {
        self.fetch_list(&["connections", name, "channels"]).await
    }

    // ========================================
    // CHANNELS
    // ========================================

    /// Channels across all connections. Channel numbers repeat between
    /// connections; every entry is kept.
    pub async fn get_channels(&self) -> Result<Vec<ChannelInfo>> {
        self.fetch_list(&["channels"]).await
    }

    pub async fn get_channel(&self, name: &str) -> Result<ChannelInfo> {
        self.fetch(&["channels", name]).await
    }

    // ========================================
    // VHOSTS & QUEUES
    // ========================================

    pub async fn get_vhosts(&self) -> Result<Vec<VhostInfo>> {
        self.fetch_list(&["vhosts"]).await
    }

    pub async fn get_vhost(&self, name: &str) -> Result<VhostInfo> {
        self.fetch(&["vhosts", name]).await
    }

    pub async fn get_queues(&self) -> Result<Vec<QueueInfo>> {
        self.fetch_list(&["queues"]).await
    }

    pub async fn get_queues_in(&self, vhost: &str) -> Result<Vec<QueueInfo>> {
        self.fetch_list(&["queues", vhost]).await
    }

    pub async fn get_queue(&self, vhost: &str, name: &str) -> Result<QueueInfo> {
        self.fetch(&["queues", vhost, name]).await
    }
}

/// Header values cannot carry control characters.
fn header_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
