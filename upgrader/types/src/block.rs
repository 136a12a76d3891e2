use {
    crate::Timestamp,
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

/// Information about the block currently being processed.
#[derive(
    Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct BlockInfo {
    pub height: u64,
    pub timestamp: Timestamp,
}
