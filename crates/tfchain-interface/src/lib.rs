//! tfchain Interface: the seam between typed accessors and chain connections
//!
//! This crate defines the `QueryClient` trait, which mediates every remote storage
//! lookup, together with the handle and result types that flow through it.
//!
//! # Architecture
//!
//! A lookup is split into three steps:
//!
//! 1. **Invocation**: `QueryClient::check_connection_and_apply` runs a storage accessor
//!    against a live connection and hands back the encoded value untouched
//! 2. **Primitive decoding**: `RawResult::to_primitive` turns that value into a plain
//!    value tree (camelCase keys, byte-vectors as text)
//! 3. **Validation**: `decode_entity` converts the tree into a typed entity, reporting
//!    any mismatch as `QueryError::DecodeShape`
//!
//! # Example
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use tfchain_interface::{decode_entity, QueryClient, StorageAccessor};
//!
//! #[derive(Deserialize)]
//! struct Twin {
//!     id: u32,
//! }
//!
//! const TWINS: StorageAccessor = StorageAccessor::new("tfgridModule", "twins");
//!
//! async fn twin<C: QueryClient>(client: &C, id: u32) -> tfchain_interface::Result<Twin> {
//!     let raw = client.check_connection_and_apply(&TWINS, &[serde_json::Value::from(id)]).await?;
//!     decode_entity(raw.to_primitive()?, "Twin")
//! }
//! ```

mod primitive;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure kinds surfaced by a query
///
/// Callers can always tell "could not reach the chain" (`Connection`) apart from
/// "the chain rejected or errored on this query" (`RemoteQuery`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Remote query {accessor} failed: {reason}")]
    RemoteQuery { accessor: String, reason: String },

    #[error("Decoded value does not match {entity} shape: {reason}")]
    DecodeShape { entity: &'static str, reason: String },
}

impl QueryError {
    pub fn remote(accessor: &StorageAccessor, reason: impl Into<String>) -> Self {
        QueryError::RemoteQuery {
            accessor: accessor.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, QueryError::Connection(_))
    }

    pub fn is_remote_query(&self) -> bool {
        matches!(self, QueryError::RemoteQuery { .. })
    }

    pub fn is_decode_shape(&self) -> bool {
        matches!(self, QueryError::DecodeShape { .. })
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;

/// Opaque handle naming one key-space in the chain's state store
///
/// Accessors are passed through to the connection unmodified; they carry no
/// state and are cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageAccessor {
    pallet: &'static str,
    item: &'static str,
}

impl StorageAccessor {
    pub const fn new(pallet: &'static str, item: &'static str) -> Self {
        Self { pallet, item }
    }

    /// Module (pallet) that owns the storage item, e.g. `tfgridModule`
    pub fn pallet(&self) -> &'static str {
        self.pallet
    }

    /// Storage item inside the pallet, e.g. `farms`
    pub fn item(&self) -> &'static str {
        self.item
    }
}

impl fmt::Display for StorageAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.pallet, self.item)
    }
}

/// Remote-encoded result of a storage lookup, exactly as the connection returned it
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    accessor: StorageAccessor,
    encoded: Option<Value>,
}

impl RawResult {
    /// Wrap an encoded value. `None` means no entry is stored under the key.
    pub fn new(accessor: StorageAccessor, encoded: Option<Value>) -> Self {
        Self { accessor, encoded }
    }

    pub fn accessor(&self) -> &StorageAccessor {
        &self.accessor
    }

    pub fn encoded(&self) -> Option<&Value> {
        self.encoded.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.encoded, None | Some(Value::Null))
    }

    /// Decode into a plain value tree
    ///
    /// # Errors
    ///
    /// Returns `QueryError::RemoteQuery` when the store held no entry, so a missing
    /// record never turns into a zero-filled entity.
    pub fn to_primitive(&self) -> Result<Value> {
        match &self.encoded {
            Some(value) if !value.is_null() => Ok(primitive::to_primitive(value)),
            _ => Err(QueryError::remote(
                &self.accessor,
                "no entry stored under the requested key",
            )),
        }
    }
}

/// Validating conversion of a plain value tree into a typed entity
pub fn decode_entity<T: DeserializeOwned>(value: Value, entity: &'static str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| QueryError::DecodeShape {
        entity,
        reason: e.to_string(),
    })
}

/// Connection-aware client that every typed accessor calls through
///
/// # Thread Safety
///
/// Implementations are shared across arbitrarily many accessors and must be
/// `Send + Sync`.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Apply `accessor` with the positional key `args` against a live connection
    ///
    /// Implementations verify (or establish) the connection first and must not
    /// issue the remote call when no connection can be obtained.
    ///
    /// # Errors
    ///
    /// - `QueryError::Connection` if no live connection is available
    /// - `QueryError::RemoteQuery` if the chain rejected the call
    async fn check_connection_and_apply(
        &self,
        accessor: &StorageAccessor,
        args: &[Value],
    ) -> Result<RawResult>;
}

#[async_trait]
impl<T: QueryClient + ?Sized> QueryClient for Arc<T> {
    async fn check_connection_and_apply(
        &self,
        accessor: &StorageAccessor,
        args: &[Value],
    ) -> Result<RawResult> {
        (**self).check_connection_and_apply(accessor, args).await
    }
}
