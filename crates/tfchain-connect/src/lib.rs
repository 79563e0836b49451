//! tfchain Connect: connection-checked invocation of chain storage queries
//!
//! This crate provides the client side of every tfchain lookup: it owns the link
//! to a chain node and guarantees that a storage accessor only runs against a
//! live, validated session.
//!
//! # Architecture
//!
//! - **ConnectionManager**: Implements `QueryClient` on top of any `Transport`
//! - **RpcTransport**: JSON-RPC 2.0 over HTTP
//! - **MemoryTransport**: In-process chain state for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tfchain_connect::{ConnectionManager, RpcTransport};
//!
//! fn example() -> anyhow::Result<()> {
//!     let transport = RpcTransport::new("http://127.0.0.1:9933", Duration::from_secs(10))?;
//!     let client = Arc::new(ConnectionManager::new(transport));
//!
//!     // Hand `client` to every accessor that needs it
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod manager;
pub mod memory;
pub mod rpc;
pub mod transport;

pub use error::ConnectError;
pub use manager::{ConnectionManager, ConnectionStatus};
pub use memory::MemoryTransport;
pub use rpc::{RpcTransport, DEFAULT_STORAGE_QUERY_METHOD};
pub use transport::{Session, Transport};
