//! Typed client for a message broker's HTTP management API.
//!
//! ```no_run
//! use rabbit_mgmt::{ClientConfig, ManagementClient};
//!
//! # async fn run() -> rabbit_mgmt::Result<()> {
//! let client = ManagementClient::new(ClientConfig::new(
//!     "http://localhost:15672/api/",
//!     "guest",
//!     "guest",
//! ))?;
//!
//! for node in client.get_nodes().await? {
//!     println!("{} uses {} of {} bytes", node.name, node.mem_used, node.mem_limit);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod models;
pub mod utils;

pub use client::ManagementClient;
pub use config::ClientConfig;
pub use error::{MgmtError, Result};
