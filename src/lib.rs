/*!
 * tfchain-client - typed read access to tfchain storage
 *
 * Accessors are plain values built around a shared, explicitly injected
 * connection:
 * - Connection-checked invocation of every storage query
 * - Validating decode of chain records into typed entities
 * - TOML configuration with environment overrides
 * - Structured logging via tracing
 *
 * ```rust,no_run
 * use tfchain_client::{ClientConfig, QueryFarms, QueryFarmsGetOptions};
 *
 * # async fn example() -> anyhow::Result<()> {
 * let config = ClientConfig::default().with_env_overrides();
 * tfchain_client::logging::init_logging(&config)?;
 *
 * let farms = QueryFarms::new(config.build_manager()?);
 * let farm = farms.get(QueryFarmsGetOptions { id: 1 }).await?;
 * println!("farm {} has {} public IPs", farm.name, farm.public_ips.len());
 * # Ok(())
 * # }
 * ```
 */

pub mod config;
pub mod error;
pub mod farms;
pub mod logging;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::{ClientConfig, LogLevel};
pub use error::{QueryError, Result, TfchainError};
pub use farms::{
    Certification, Farm, FarmingPolicyLimits, ParseCertificationError, QueryFarms,
    QueryFarmsGetOptions,
};
pub use tfchain_connect::{ConnectionManager, ConnectionStatus, RpcTransport};
pub use tfchain_interface::{QueryClient, RawResult, StorageAccessor};
pub use types::PublicIp;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
