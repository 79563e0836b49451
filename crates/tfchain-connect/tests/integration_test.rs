//! Integration tests for tfchain-connect
//!
//! These tests drive `ConnectionManager` through the `QueryClient` seam using
//! the in-memory transport. The live-node test at the bottom is ignored by default.

use serde_json::json;
use std::sync::Arc;
use tfchain_connect::{ConnectionManager, ConnectionStatus, MemoryTransport};
use tfchain_interface::{QueryClient, StorageAccessor};

const FARMS: StorageAccessor = StorageAccessor::new("tfgridModule", "farms");

fn manager_with_farm() -> ConnectionManager<MemoryTransport> {
    let transport = MemoryTransport::new("Local Chain");
    transport.insert(&FARMS, &[json!(7)], json!({ "id": 7, "name": "0x616c706861" }));
    ConnectionManager::new(transport)
}

#[tokio::test]
async fn test_first_query_connects() {
    let manager = manager_with_farm();
    assert!(!manager.is_connected().await);

    let raw = manager
        .check_connection_and_apply(&FARMS, &[json!(7)])
        .await
        .unwrap();

    assert_eq!(raw.accessor(), &FARMS);
    assert_eq!(raw.encoded(), Some(&json!({ "id": 7, "name": "0x616c706861" })));
    assert_eq!(manager.status().await, ConnectionStatus::Connected);
    assert_eq!(manager.transport().open_count(), 1);
}

#[tokio::test]
async fn test_result_is_returned_unchanged() {
    let manager = manager_with_farm();

    let raw = manager
        .check_connection_and_apply(&FARMS, &[json!(7)])
        .await
        .unwrap();

    // Decoding is the caller's step, not the invoker's
    assert_eq!(raw.encoded().unwrap()["name"], "0x616c706861");
    assert_eq!(raw.to_primitive().unwrap()["name"], "alpha");
}

#[tokio::test]
async fn test_missing_entry_is_empty_result() {
    let manager = manager_with_farm();

    let raw = manager
        .check_connection_and_apply(&FARMS, &[json!(99)])
        .await
        .unwrap();

    assert!(raw.is_empty());
    assert!(raw.to_primitive().unwrap_err().is_remote_query());
}

#[tokio::test]
async fn test_offline_node_fails_without_querying() {
    let manager = manager_with_farm();
    manager.transport().set_online(false);

    let err = manager
        .check_connection_and_apply(&FARMS, &[json!(7)])
        .await
        .unwrap_err();

    assert!(err.is_connection());
    assert_eq!(manager.transport().query_count(), 0);
    assert_eq!(manager.status().await, ConnectionStatus::Failed);
}

#[tokio::test]
async fn test_rejected_query_is_remote_error_and_keeps_session() {
    let manager = manager_with_farm();
    manager.transport().reject(&FARMS, &[json!("x")], "Invalid key");

    let err = manager
        .check_connection_and_apply(&FARMS, &[json!("x")])
        .await
        .unwrap_err();

    assert!(err.is_remote_query());
    assert!(err.to_string().contains("tfgridModule.farms"));
    assert!(manager.is_connected().await);
}

#[tokio::test]
async fn test_reconnects_after_node_returns() {
    let manager = manager_with_farm();
    manager
        .check_connection_and_apply(&FARMS, &[json!(7)])
        .await
        .unwrap();

    manager.transport().set_online(false);
    let err = manager
        .check_connection_and_apply(&FARMS, &[json!(7)])
        .await
        .unwrap_err();
    assert!(err.is_connection());
    assert!(!manager.is_connected().await);

    manager.transport().set_online(true);
    manager
        .check_connection_and_apply(&FARMS, &[json!(7)])
        .await
        .unwrap();
    assert_eq!(manager.transport().open_count(), 2);
}

#[tokio::test]
async fn test_concurrent_queries_share_one_session() {
    let manager = Arc::new(manager_with_farm());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .check_connection_and_apply(&FARMS, &[json!(7)])
                    .await
                    .map(|raw| raw.is_empty())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(false));
    }

    assert_eq!(manager.transport().open_count(), 1);
    assert_eq!(manager.transport().query_count(), 8);
}

// NOTE: Requires a node (or storage gateway) on localhost:9933
#[tokio::test]
#[ignore]
async fn test_live_node_session() {
    use std::time::Duration;
    use tfchain_connect::RpcTransport;

    let transport = RpcTransport::new("http://127.0.0.1:9933", Duration::from_secs(10)).unwrap();
    let manager = ConnectionManager::new(transport);

    match manager.connect().await {
        Ok(session) => println!("Connected to {} ({})", session.chain, session.node_version),
        Err(e) => panic!("Connection failed: {}", e),
    }
}
