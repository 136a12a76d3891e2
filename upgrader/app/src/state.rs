use {
    upgrader_storage::{BigEndian, Item, Map},
    upgrader_types::{BlockInfo, Plan},
};

/// The upgrade currently scheduled, if any.
pub const PLAN: Item<Plan> = Item::new("plan");

/// Upgrades that have been applied: name => height at which it was applied.
///
/// The height is stored as 8 big-endian bytes.
pub const DONE: Map<&str, u64, BigEndian> = Map::new("done");

/// The most recent block that was finalized by the host.
pub const LAST_FINALIZED_BLOCK: Item<BlockInfo> = Item::new("last_finalized_block");
