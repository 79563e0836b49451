//! RpcTransport: JSON-RPC 2.0 over HTTP

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tfchain_interface::StorageAccessor;
use tracing::debug;

use crate::error::ConnectError;
use crate::transport::{Session, Transport};

/// JSON-RPC method used for storage lookups unless configured otherwise
pub const DEFAULT_STORAGE_QUERY_METHOD: &str = "tfchain_queryStorage";

/// Transport that talks JSON-RPC to a node (or storage gateway) over HTTP
///
/// Storage lookups are sent as `method(pallet, item, args)` and the node is
/// expected to answer with the stored value as JSON, or `null` when absent.
/// Session validation uses the standard `system_chain` and `system_version`
/// calls.
///
/// This struct is cheaply cloneable (reqwest's client is an Arc internally).
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use tfchain_connect::{ConnectionManager, RpcTransport};
///
/// # fn example() -> anyhow::Result<()> {
/// let transport = RpcTransport::new("http://127.0.0.1:9933", Duration::from_secs(10))?;
/// let manager = ConnectionManager::new(transport);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RpcTransport {
    http: reqwest::Client,
    endpoint: String,
    query_method: String,
    next_id: Arc<AtomicU64>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    /// `Some(Value::Null)` for `"result": null`, `None` when the field is absent
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl RpcTransport {
    /// Build a transport for `endpoint`
    ///
    /// `timeout` bounds every HTTP exchange; a timed-out call surfaces as a
    /// connection loss.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ConnectError> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConnectError::InvalidEndpoint(endpoint));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            query_method: DEFAULT_STORAGE_QUERY_METHOD.to_string(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Use a different JSON-RPC method for storage lookups
    pub fn with_query_method(mut self, method: impl Into<String>) -> Self {
        self.query_method = method.into();
        self
    }

    pub fn query_method(&self) -> &str {
        &self.query_method
    }

    fn request_body(&self, method: &str, params: Value) -> Value {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ConnectError> {
        let body = self.request_body(method, params);
        debug!("JSON-RPC -> {} {}", self.endpoint, method);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ConnectError::ConnectionFailed {
                        endpoint: self.endpoint.clone(),
                        reason: e.to_string(),
                    }
                } else {
                    ConnectError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectError::HttpStatus(status.as_u16()));
        }

        let envelope: RpcResponse = response.json().await?;
        into_result(envelope)
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn into_result(envelope: RpcResponse) -> Result<Value, ConnectError> {
    match (envelope.result, envelope.error) {
        (_, Some(error)) => Err(ConnectError::Rpc {
            code: error.code,
            message: error.message,
        }),
        (Some(result), None) => Ok(result),
        (None, None) => Err(ConnectError::InvalidResponse(
            "response carries neither result nor error".to_string(),
        )),
    }
}

#[async_trait]
impl Transport for RpcTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn open(&self) -> Result<Session, ConnectError> {
        let chain = self.call("system_chain", json!([])).await?;
        let chain = chain
            .as_str()
            .ok_or_else(|| ConnectError::InvalidResponse(format!("system_chain: {}", chain)))?
            .to_string();

        let version = self.call("system_version", json!([])).await?;
        let version = version.as_str().unwrap_or_default().to_string();

        Ok(Session::new(chain, version))
    }

    async fn query(
        &self,
        session: &Session,
        accessor: &StorageAccessor,
        args: &[Value],
    ) -> Result<Option<Value>, ConnectError> {
        debug!(
            "Querying {} on {} with {} key argument(s)",
            accessor,
            session.chain,
            args.len()
        );

        let params = json!([accessor.pallet(), accessor.item(), args]);
        let value = self.call(&self.query_method, params).await?;

        Ok(if value.is_null() { None } else { Some(value) })
    }
}
