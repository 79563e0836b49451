//! Transport: the wire-level collaborator behind a ConnectionManager

use async_trait::async_trait;
use serde_json::Value;
use std::time::SystemTime;
use tfchain_interface::StorageAccessor;

use crate::error::ConnectError;

/// A validated link to a chain node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Chain name reported by the node (e.g. "TFchain Mainnet")
    pub chain: String,

    /// Node software version
    pub node_version: String,

    /// When the session was opened
    pub opened_at: SystemTime,
}

impl Session {
    pub fn new(chain: impl Into<String>, node_version: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            node_version: node_version.into(),
            opened_at: SystemTime::now(),
        }
    }
}

/// Wire protocol used to reach a chain node
///
/// Implementations own key serialization and routing; the manager only hands
/// them the accessor and positional key arguments.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Address of the node, for logging
    fn endpoint(&self) -> &str;

    /// Open and validate a session
    async fn open(&self) -> Result<Session, ConnectError>;

    /// Resolve `accessor(args)` against chain state
    ///
    /// Returns `Ok(None)` when no entry is stored under the key.
    async fn query(
        &self,
        session: &Session,
        accessor: &StorageAccessor,
        args: &[Value],
    ) -> Result<Option<Value>, ConnectError>;
}
