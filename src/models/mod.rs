//! Typed snapshots of broker resources.
//!
//! Plain data: decoding lives in [`crate::decode`], fetching in
//! [`crate::client`]. Accessors here never touch the network.

pub mod channel;
pub mod connection;
pub mod identity;
pub mod node;
pub mod overview;
pub mod queue;
pub mod vhost;

pub use channel::ChannelInfo;
pub use connection::ConnectionInfo;
pub use identity::WhoAmI;
pub use node::{AuthMechanism, ErlangApp, NodeInfo, NodeType};
pub use overview::{
    Context, ExchangeType, Listener, MessageStats, ObjectTotals, Overview, QueueTotals,
    RateDetails,
};
pub use queue::QueueInfo;
pub use vhost::VhostInfo;
