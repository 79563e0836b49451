/*!
 * Value types shared by several tfchain entities
 */

use serde::{Deserialize, Serialize};

/// Public IP address bound to a farm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PublicIp {
    /// Address in CIDR notation, e.g. `185.206.122.33/24`
    pub ip: String,

    pub gateway: String,

    /// Contract currently holding the address (0 when free)
    pub contract_id: u64,
}

impl PublicIp {
    pub fn is_reserved(&self) -> bool {
        self.contract_id != 0
    }
}
