/*!
 * Storage accessors for the tfchain key-spaces read by this crate
 */

use tfchain_interface::StorageAccessor;

/// `tfgridModule.farms`, keyed by farm id
pub const FARMS: StorageAccessor = StorageAccessor::new("tfgridModule", "farms");
