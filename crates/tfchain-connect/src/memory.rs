//! MemoryTransport: in-process chain state for tests and local tooling

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use tfchain_interface::StorageAccessor;

use crate::error::ConnectError;
use crate::transport::{Session, Transport};

/// Transport backed by an in-memory map of storage entries
///
/// Entries are keyed by accessor and the JSON rendering of the key arguments.
/// The node can be taken offline to exercise connection failures, and every
/// `open` / `query` is counted.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tfchain_connect::MemoryTransport;
/// use tfchain_interface::StorageAccessor;
///
/// const FARMS: StorageAccessor = StorageAccessor::new("tfgridModule", "farms");
///
/// let transport = MemoryTransport::new("Local Chain");
/// transport.insert(&FARMS, &[json!(1)], json!({ "id": 1 }));
/// assert_eq!(transport.query_count(), 0);
/// ```
pub struct MemoryTransport {
    chain: String,
    entries: RwLock<HashMap<(StorageAccessor, String), Value>>,
    rejected: RwLock<HashMap<(StorageAccessor, String), String>>,
    online: AtomicBool,
    opens: AtomicUsize,
    queries: AtomicUsize,
}

impl MemoryTransport {
    pub fn new(chain: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            entries: RwLock::new(HashMap::new()),
            rejected: RwLock::new(HashMap::new()),
            online: AtomicBool::new(true),
            opens: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    fn key(accessor: &StorageAccessor, args: &[Value]) -> (StorageAccessor, String) {
        (*accessor, Value::from(args.to_vec()).to_string())
    }

    /// Store `value` under `accessor(args)`
    pub fn insert(&self, accessor: &StorageAccessor, args: &[Value], value: Value) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(Self::key(accessor, args), value);
    }

    pub fn remove(&self, accessor: &StorageAccessor, args: &[Value]) -> Option<Value> {
        let mut entries = self.entries.write().unwrap();
        entries.remove(&Self::key(accessor, args))
    }

    /// Make the node answer `accessor(args)` with a JSON-RPC error
    pub fn reject(&self, accessor: &StorageAccessor, args: &[Value], message: impl Into<String>) {
        let mut rejected = self.rejected.write().unwrap();
        rejected.insert(Self::key(accessor, args), message.into());
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> Result<(), ConnectError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ConnectError::ConnectionFailed {
                endpoint: self.endpoint().to_string(),
                reason: "node is offline".to_string(),
            })
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn endpoint(&self) -> &str {
        "memory://"
    }

    async fn open(&self) -> Result<Session, ConnectError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.ensure_online()?;
        Ok(Session::new(self.chain.clone(), env!("CARGO_PKG_VERSION")))
    }

    async fn query(
        &self,
        _session: &Session,
        accessor: &StorageAccessor,
        args: &[Value],
    ) -> Result<Option<Value>, ConnectError> {
        self.ensure_online()?;
        self.queries.fetch_add(1, Ordering::SeqCst);

        let key = Self::key(accessor, args);
        if let Some(message) = self.rejected.read().unwrap().get(&key) {
            return Err(ConnectError::Rpc {
                code: -32602,
                message: message.clone(),
            });
        }

        Ok(self.entries.read().unwrap().get(&key).cloned())
    }
}
