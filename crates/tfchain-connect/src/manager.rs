//! ConnectionManager: connection-checked invocation of storage queries

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tfchain_interface::{QueryClient, QueryError, RawResult, StorageAccessor};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::ConnectError;
use crate::transport::{Session, Transport};

/// Status of the link to the chain node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No session yet, or the last one was dropped
    Disconnected,
    /// A validated session is cached
    Connected,
    /// The last connection attempt failed
    Failed,
}

struct ConnectionState {
    session: Option<Arc<Session>>,
    status: ConnectionStatus,
}

/// Owner of the connection that every accessor queries through
///
/// Responsibilities:
/// - Establish the session lazily on the first query
/// - Reuse the cached session for later queries
/// - Drop the session when the link is lost, so the next query reconnects
///
/// The manager never retries on its own; a failed query is reported once and
/// retrying is up to the caller. It is the only component that mutates
/// connection state. Share it with `Arc`.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use tfchain_connect::{ConnectionManager, RpcTransport};
/// use tfchain_interface::{QueryClient, StorageAccessor};
///
/// # async fn example() -> anyhow::Result<()> {
/// let transport = RpcTransport::new("http://127.0.0.1:9933", Duration::from_secs(10))?;
/// let manager = ConnectionManager::new(transport);
///
/// const FARMS: StorageAccessor = StorageAccessor::new("tfgridModule", "farms");
/// let raw = manager.check_connection_and_apply(&FARMS, &[serde_json::Value::from(1)]).await?;
/// println!("{:?}", raw.to_primitive()?);
/// # Ok(())
/// # }
/// ```
pub struct ConnectionManager<T: Transport> {
    transport: T,
    state: RwLock<ConnectionState>,
}

impl<T: Transport> ConnectionManager<T> {
    /// Create a manager; no connection is made until it is needed
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: RwLock::new(ConnectionState {
                session: None,
                status: ConnectionStatus::Disconnected,
            }),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Open a fresh session, replacing any cached one
    pub async fn connect(&self) -> Result<Arc<Session>, ConnectError> {
        let mut state = self.state.write().await;
        self.open_locked(&mut state).await
    }

    /// Return the cached session, connecting first if there is none
    pub async fn session(&self) -> Result<Arc<Session>, ConnectError> {
        {
            let state = self.state.read().await;
            if let Some(session) = &state.session {
                debug!("Reusing session to {}", session.chain);
                return Ok(session.clone());
            }
        }

        let mut state = self.state.write().await;
        // Another task may have connected while we waited for the lock
        if let Some(session) = &state.session {
            return Ok(session.clone());
        }
        self.open_locked(&mut state).await
    }

    async fn open_locked(&self, state: &mut ConnectionState) -> Result<Arc<Session>, ConnectError> {
        info!("Connecting to chain node at {}", self.transport.endpoint());

        match self.transport.open().await {
            Ok(session) => {
                let session = Arc::new(session);
                state.session = Some(session.clone());
                state.status = ConnectionStatus::Connected;
                info!(
                    "Connected to {} (node {})",
                    session.chain, session.node_version
                );
                Ok(session)
            }
            Err(e) => {
                state.session = None;
                state.status = ConnectionStatus::Failed;
                warn!(
                    "Connection to {} failed: {}",
                    self.transport.endpoint(),
                    e
                );
                Err(e)
            }
        }
    }

    pub async fn status(&self) -> ConnectionStatus {
        self.state.read().await.status
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.session.is_some()
    }

    /// Drop the cached session; the next query reconnects
    pub async fn disconnect(&self) {
        info!("Disconnecting from {}", self.transport.endpoint());

        let mut state = self.state.write().await;
        state.session = None;
        state.status = ConnectionStatus::Disconnected;
    }

    /// Drop `lost` unless it has already been replaced by a newer session
    async fn drop_session(&self, lost: &Arc<Session>) {
        let mut state = self.state.write().await;
        if state
            .session
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, lost))
        {
            state.session = None;
            state.status = ConnectionStatus::Disconnected;
        }
    }
}

#[async_trait]
impl<T: Transport> QueryClient for ConnectionManager<T> {
    async fn check_connection_and_apply(
        &self,
        accessor: &StorageAccessor,
        args: &[Value],
    ) -> Result<RawResult, QueryError> {
        let session = self
            .session()
            .await
            .map_err(|e| QueryError::Connection(e.to_string()))?;

        debug!("Applying {} with key {:?}", accessor, args);

        match self.transport.query(&session, accessor, args).await {
            Ok(encoded) => Ok(RawResult::new(*accessor, encoded)),
            Err(e) if e.is_connection_loss() => {
                warn!("Lost connection while querying {}: {}", accessor, e);
                self.drop_session(&session).await;
                Err(QueryError::Connection(e.to_string()))
            }
            Err(e) => Err(QueryError::remote(accessor, e.to_string())),
        }
    }
}
