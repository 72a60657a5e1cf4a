//! Network protocol payloads (§6 wire-level).
//!
//! These are the message bodies this subsystem hands to and receives from the
//! host's `PeerBus`. Framing, handshake, and transport are the host's concern.

use serde::{Deserialize, Serialize};

use crate::types::{Hash256, Outpoint, ScriptBytes};

/// Inventory type tag, mirrors the original `MSG_MASTERNODE_PAYMENT_VOTE`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InvType {
    PaymentVote,
    /// Requests the block at a low-data height, not a vote — used by
    /// `request_low_data_blocks`.
    PaymentBlock,
}

/// One inventory announcement: a type and the hash of the advertised item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Inv {
    pub inv_type: InvType,
    pub hash: Hash256,
}

/// `MNWSYNC`: a peer's request to be sent the votes it is missing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncRequest {
    /// Number of votes the peer believes it still needs, purely informational.
    pub count_needed: u32,
}

/// `MNW`: a single payment vote on the wire.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteMessage {
    pub voter_outpoint: Outpoint,
    pub height: i64,
    pub payee: ScriptBytes,
    pub signature: Vec<u8>,
}

/// `SYNCSTATUSCOUNT`: progress report sent back to a syncing peer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncStatusCount {
    pub asset_id: u32,
    pub count: u32,
}

/// `GETDATA`: a batched follow-up request for specific inventory items.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetData {
    pub items: Vec<Inv>,
}

/// Messages this subsystem may ask the `PeerBus` to deliver to a peer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutboundMessage {
    Vote(VoteMessage),
    /// Announces a single inventory item the sender already has, e.g. a
    /// verified vote sent in answer to a sync request. Not a request for
    /// data — see `GetData` for that.
    Inv(Inv),
    SyncStatus(SyncStatusCount),
    GetData(GetData),
}

/// Messages this subsystem accepts from the host's message dispatcher.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum InboundMessage {
    SyncRequest(SyncRequest),
    Vote(VoteMessage),
}
