/*!
 * Farms: typed read access to `tfgridModule.farms`
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tfchain_interface::{decode_entity, QueryClient, QueryError};
use thiserror::Error;
use tracing::debug;

use crate::storage;
use crate::types::PublicIp;

const ENTITY: &str = "Farm";

/// Certification level of a farm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Certification {
    Certified,
    NotCertified,
}

impl Certification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Certification::Certified => "Certified",
            Certification::NotCertified => "NotCertified",
        }
    }
}

impl fmt::Display for Certification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown farm certification: {0}")]
pub struct ParseCertificationError(String);

impl FromStr for Certification {
    type Err = ParseCertificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Certified" => Ok(Certification::Certified),
            "NotCertified" => Ok(Certification::NotCertified),
            other => Err(ParseCertificationError(other.to_string())),
        }
    }
}

/// Limits a farming policy imposes on the farm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FarmingPolicyLimits {
    pub farming_policy_id: u32,

    /// Compute-unit limit
    pub cu: u64,

    /// Storage-unit limit
    pub su: u64,

    /// Expiry as stored on chain. Whether 0 means "never" is up to the caller.
    pub end: u64,

    pub node_count: u32,

    pub node_certification: bool,
}

/// Snapshot of one farm record at query time
///
/// A fresh `QueryFarms::get` produces a fresh value; nothing is updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Farm {
    /// Schema version of the stored record (0 when the record omits it)
    #[serde(default)]
    pub version: u32,

    pub id: u32,

    /// Display name, not guaranteed unique
    pub name: String,

    pub twin_id: u32,

    pub pricing_policy_id: u32,

    pub certification: Certification,

    /// In chain-assigned order
    pub public_ips: Vec<PublicIp>,

    pub dedicated_farm: bool,

    pub farming_policy_limits: FarmingPolicyLimits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFarmsGetOptions {
    pub id: u32,
}

/// Point lookups of farms by id
///
/// Holds only a shared reference to the client; every `get` is a fresh remote
/// round trip.
///
/// # Example
///
/// ```rust,no_run
/// use tfchain_client::{ClientConfig, QueryFarms, QueryFarmsGetOptions};
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = ClientConfig::default().build_manager()?;
/// let farms = QueryFarms::new(client);
///
/// let farm = farms.get(QueryFarmsGetOptions { id: 1 }).await?;
/// println!("{} ({})", farm.name, farm.certification);
/// # Ok(())
/// # }
/// ```
pub struct QueryFarms<C: QueryClient + ?Sized> {
    client: Arc<C>,
}

impl<C: QueryClient + ?Sized> Clone for QueryFarms<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: QueryClient + ?Sized> QueryFarms<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Fetch and decode the farm stored under `options.id`
    ///
    /// # Errors
    ///
    /// - `QueryError::Connection` if the chain cannot be reached
    /// - `QueryError::RemoteQuery` if the query is rejected or no farm has this id
    /// - `QueryError::DecodeShape` if the stored record is not a well-formed farm
    pub async fn get(&self, options: QueryFarmsGetOptions) -> Result<Farm, QueryError> {
        debug!("Fetching farm {}", options.id);

        let raw = self
            .client
            .check_connection_and_apply(&storage::FARMS, &[Value::from(options.id)])
            .await?;

        let farm: Farm = decode_entity(raw.to_primitive()?, ENTITY)?;
        if farm.id != options.id {
            return Err(QueryError::DecodeShape {
                entity: ENTITY,
                reason: format!(
                    "requested farm {} but the record carries id {}",
                    options.id, farm.id
                ),
            });
        }

        debug!("Fetched farm {} ({})", farm.id, farm.name);
        Ok(farm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use async_trait::async_trait;
    use serde_json::json;
    use tfchain_interface::{RawResult, StorageAccessor};

    /// Answers every query with the same encoded value
    struct FixedClient(Value);

    #[async_trait]
    impl QueryClient for FixedClient {
        async fn check_connection_and_apply(
            &self,
            accessor: &StorageAccessor,
            _args: &[Value],
        ) -> Result<RawResult, QueryError> {
            Ok(RawResult::new(*accessor, Some(self.0.clone())))
        }
    }

    fn encoded_farm(id: u32, certification: &str) -> Value {
        json!({
            "version": 4,
            "id": id,
            "name": "0x616c706861",
            "twin_id": 3,
            "pricing_policy_id": 1,
            "certification": certification,
            "public_ips": [],
            "dedicated_farm": false,
            "farming_policy_limits": {
                "farming_policy_id": 1,
                "cu": 10,
                "su": 5,
                "end": 0,
                "node_count": 2,
                "node_certification": true
            }
        })
    }

    #[test]
    fn test_certification_strings() {
        assert_eq!(Certification::Certified.to_string(), "Certified");
        assert_eq!(
            "NotCertified".parse::<Certification>(),
            Ok(Certification::NotCertified)
        );
        assert!("Gold".parse::<Certification>().is_err());
        assert_eq!(
            serde_json::to_value(Certification::NotCertified).unwrap(),
            json!("NotCertified")
        );
    }

    #[tokio::test]
    async fn test_get_decodes_record() {
        init_test_logging();
        let farms = QueryFarms::new(Arc::new(FixedClient(encoded_farm(7, "Certified"))));

        let farm = farms.get(QueryFarmsGetOptions { id: 7 }).await.unwrap();
        assert_eq!(farm.version, 4);
        assert_eq!(farm.name, "alpha");
        assert_eq!(farm.certification, Certification::Certified);
        assert_eq!(farm.farming_policy_limits.node_count, 2);
    }

    #[tokio::test]
    async fn test_unknown_certification_is_decode_error() {
        let farms = QueryFarms::new(Arc::new(FixedClient(encoded_farm(7, "Gold"))));

        let err = farms.get(QueryFarmsGetOptions { id: 7 }).await.unwrap_err();
        assert!(err.is_decode_shape());
    }

    #[tokio::test]
    async fn test_id_mismatch_is_decode_error() {
        let farms = QueryFarms::new(Arc::new(FixedClient(encoded_farm(8, "Certified"))));

        let err = farms.get(QueryFarmsGetOptions { id: 7 }).await.unwrap_err();
        assert!(matches!(err, QueryError::DecodeShape { entity: "Farm", .. }));
    }

    #[tokio::test]
    async fn test_missing_field_is_decode_error() {
        let mut encoded = encoded_farm(7, "Certified");
        encoded.as_object_mut().unwrap().remove("farming_policy_limits");
        let farms = QueryFarms::new(Arc::new(FixedClient(encoded)));

        let err = farms.get(QueryFarmsGetOptions { id: 7 }).await.unwrap_err();
        assert!(err.is_decode_shape());
    }

    #[tokio::test]
    async fn test_unexpected_field_is_decode_error() {
        let mut encoded = encoded_farm(7, "Certified");
        encoded["owner"] = json!("5D4...");
        let farms = QueryFarms::new(Arc::new(FixedClient(encoded)));

        let err = farms.get(QueryFarmsGetOptions { id: 7 }).await.unwrap_err();
        assert!(err.is_decode_shape());
    }

    #[tokio::test]
    async fn test_clashing_keys_are_decode_error() {
        let mut encoded = encoded_farm(7, "Certified");
        encoded["twinId"] = json!(4);
        let farms = QueryFarms::new(Arc::new(FixedClient(encoded)));

        let err = farms.get(QueryFarmsGetOptions { id: 7 }).await.unwrap_err();
        assert!(err.is_decode_shape());
    }
}
