//! Protocol constants for the masternode payment voting subsystem.
//!
//! Centralizes the magic numbers from §6 of the specification into named
//! constants, grouped by concern the way the rest of this crate groups them.

/// Vote pool sizing and consensus thresholds.
pub mod payments {
    /// Size of the top-ranked masternode set allowed to cast payment votes.
    pub const SIGS_TOTAL: u32 = 10;

    /// Votes required on a payee before a block is required to pay it.
    pub const SIGS_REQUIRED: u32 = 6;

    /// Votes may target up to this many blocks past the cached tip.
    pub const FUTURE_WINDOW: i64 = 20;

    /// Lookahead used when scheduling this node's own payment votes.
    pub const BACK_WINDOW: i64 = 8;

    /// Rank is computed against the block `VOTE_REF_OFFSET` blocks before the vote height.
    pub const VOTE_REF_OFFSET: i64 = 101;

    /// Default floor for the retention window, before the registry-size-scaled term.
    pub const MIN_BLOCKS_TO_STORE: i64 = 5000;

    /// Multiplier applied to registry size when computing the storage limit.
    pub const STORAGE_COEFFICIENT: f64 = 1.25;

    /// Number of tiers paid per block (primary/secondary/tertiary).
    pub const TIER_COUNT: usize = 3;
}

/// Wire-protocol and gossip limits.
pub mod network {
    /// Maximum number of `Inv` entries per `GETDATA` batch.
    pub const MAX_INV_SZ: usize = 50_000;

    /// How long a peer's sync-request fulfillment is remembered before it may ask again.
    pub const FULFILLMENT_TTL_SECS: u64 = 3600;

    /// Misbehavior weight applied for a duplicate sync request within the TTL window.
    pub const MISBEHAVIOR_DUPLICATE_SYNC: u32 = 20;

    /// Misbehavior weight applied for an out-of-bounds rank on a future vote.
    pub const MISBEHAVIOR_BAD_RANK: u32 = 20;

    /// Misbehavior weight applied for a bad signature on a future vote while fully synced.
    pub const MISBEHAVIOR_BAD_SIG: u32 = 20;

    /// Asset id used in `SYNCSTATUSCOUNT` responses for the payment-vote asset.
    pub const MNW_ASSET_ID: u32 = 0x02;
}

/// Legacy compatibility constants that must never change.
pub mod legacy {
    use crate::types::Outpoint;

    /// The historical broadcast-bug outpoint, exempted from rank-based banning.
    /// See §9: preserved exactly to avoid splitting from the live network.
    pub fn invalid_masternode_outpoint() -> Outpoint {
        Outpoint {
            txid: [0u8; 32],
            index: 0xFFFF_FFFF,
        }
    }
}
