//! Consumed external interfaces (§6).
//!
//! The subsystem never owns the masternode list, the peer transport, chain
//! storage, or signature primitives — it calls out to the host through these
//! narrow traits. Per §5, registry and peer calls are synchronous method
//! calls; no I/O happens inside the core, so none of these are `async fn`.

use crate::types::{Hash256, MasternodeInfo, Outpoint, ScriptBytes};

/// The live masternode list: membership, heartbeats, and rank computation.
/// Consumed, never redesigned here (§1 Non-goals).
pub trait MasternodeRegistry {
    /// Look up a masternode's identity by its collateral outpoint.
    fn info_by_outpoint(&self, outpoint: &Outpoint) -> Option<MasternodeInfo>;

    /// The next masternode in the payment queue for `(height, tier)`, and the
    /// number of candidates considered. `ignore_inactive` mirrors the
    /// original `GetNextMasternodeInQueueForPayment` flag: when true, nodes
    /// that are not currently active are skipped.
    fn next_in_queue(
        &self,
        height: i64,
        ignore_inactive: bool,
        tier: usize,
    ) -> Option<(MasternodeInfo, u32)>;

    /// This voter's rank at `ref_height` under `min_protocol`, or `None` if
    /// the rank cannot currently be computed (e.g. registry snapshot at that
    /// height is unavailable).
    fn rank(&self, outpoint: &Outpoint, ref_height: i64, min_protocol: u32) -> Option<u32>;

    /// The top-ranked masternodes at `ref_height`, best rank first.
    fn top_ranks(&self, ref_height: i64, min_protocol: u32) -> Vec<(u32, MasternodeInfo)>;

    /// Number of masternodes currently tracked, used to size the storage limit.
    fn size(&self) -> u32;

    /// Request gossip about an unknown masternode from a specific peer.
    fn ask_for(&self, outpoint: &Outpoint, peer: PeerId);
}

/// Governance-triggered superblocks with an alternative payout schema.
/// Consumed, never redesigned here (§1 Non-goals).
pub trait SuperblockOracle {
    fn is_triggered(&self, height: i64) -> bool;
    fn validate(&self, tx: &crate::types::PaymentTx, height: i64, expected: u64, actual: u64) -> bool;
    fn required_payments_string(&self, height: i64) -> String;
}

/// Signed, network-wide feature flags.
pub trait SporkBus {
    fn is_active(&self, spork_id: SporkId) -> bool;
    fn spork_public_key(&self) -> [u8; 32];
    fn spork_public_address(&self) -> ScriptBytes;
}

/// Identifies a network peer. Opaque to this subsystem.
pub type PeerId = u64;

/// Inventory/messaging/misbehavior-scoring transport.
pub trait PeerBus {
    fn relay_inventory(&self, inv: crate::wire::Inv);
    fn push_message(&self, peer: PeerId, message: crate::wire::OutboundMessage);
    fn misbehave(&self, peer: PeerId, weight: u32);
}

/// Read-only view of the active chain.
pub trait ChainView {
    fn tip(&self) -> (i64, Hash256);
    fn block_hash_at(&self, height: i64) -> Option<Hash256>;
    fn cached_tip_height(&self) -> i64;
}

/// Signature primitives, kept outside this subsystem (§1 Non-goals).
pub trait Signer {
    fn sign(&self, msg: &[u8], priv_key: &[u8]) -> Result<Vec<u8>, SigningError>;
    fn verify(&self, pubkey: &[u8], msg: &[u8], sig: &[u8]) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    #[error("signing failed")]
    SigningFailed,
}

/// Spork identifiers relevant to this subsystem. Other sporks the host may
/// define are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SporkId {
    /// SPORK_8: masternode payment enforcement is active.
    MasternodePaymentEnforcement,
    /// SPORK_10: new votes must come from protocol-version-updated nodes.
    PayUpdatedNodes,
    /// SPORK_13: tolerate the legacy (pre-superblock) budget window.
    OldSuperblockFlag,
}

/// Pure function mapping `(tier, block_reward)` to the tier's payment amount.
/// Owned by chain parameters (out of scope, §1) but must be pure so election
/// and shaping stay deterministic (§8 invariant 4).
pub trait PaymentSchedule {
    fn masternode_payment(&self, tier: usize, block_reward: u64) -> u64;
}
