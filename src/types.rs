//! Core data types for the masternode payment voting subsystem (§3).

use serde::{Deserialize, Serialize};

/// 32-byte digest, used for txids, vote hashes, and block hashes alike.
pub type Hash256 = [u8; 32];

/// Raw signature bytes. Ed25519 signatures are fixed at 64 bytes, but the
/// type carries a `Vec<u8>` so alternate `Signer` impls (e.g. test doubles)
/// aren't forced into that width.
pub type SignatureBytes = Vec<u8>;

/// Block height. Signed because reference heights (`height - VOTE_REF_OFFSET`)
/// and window bounds (`cached_tip - storage_limit`) can go negative near
/// genesis; arithmetic on it should use checked/saturating operators rather
/// than assuming positivity.
pub type Height = i64;

/// Identifies the collateral UTXO of a masternode.
///
/// Note: the teacher's own `types::OutPoint` (see `masternode_registry.rs`)
/// names the second field `vout`; this type calls it `index` to track the
/// specification's vocabulary. The two are the same concept.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Outpoint {
    pub txid: Hash256,
    pub index: u32,
}

impl Outpoint {
    /// Short display form used as part of a `PaymentVote`'s signed message:
    /// `<txid-hex>-<index>`, matching `COutPoint::ToStringShort()` from the
    /// original implementation.
    pub fn short_string(&self) -> String {
        format!("{}-{}", hex::encode(self.txid), self.index)
    }
}

/// Opaque payment-destination script, compared bytewise.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptBytes(pub Vec<u8>);

impl ScriptBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Renders the script as a minimal ASM-like string for inclusion in the
    /// canonical vote-signing message. We do not implement a full script
    /// interpreter (out of scope, §1) — this is a stable hex rendering that
    /// any observer can recompute identically, which is all §4.A requires.
    pub fn to_asm_string(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for ScriptBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Minimal view of masternode identity and eligibility, as supplied by the
/// host's `MasternodeRegistry` implementation (§3).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MasternodeInfo {
    pub outpoint: Outpoint,
    pub collateral_pubkey_hash: Hash256,
    pub signing_pubkey: [u8; 32],
    pub protocol_version: u32,
}

/// One spendable output in the payment-bearing transaction `BlockShaper`
/// operates on. The surrounding transaction format (inputs, locktime, script
/// interpreter) is out of scope (§1); this is the minimal shape the payment
/// logic needs to read and rewrite, mirroring the teacher's own
/// `TxOutput { value, script_pubkey }` (`types.rs`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxOutput {
    pub value: u64,
    pub script_pubkey: ScriptBytes,
}

impl TxOutput {
    pub fn new(value: u64, script_pubkey: ScriptBytes) -> Self {
        Self {
            value,
            script_pubkey,
        }
    }
}

/// The payment-bearing transaction view `BlockShaper` builds and inspects.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentTx {
    pub outputs: Vec<TxOutput>,
}

impl PaymentTx {
    pub fn new(outputs: Vec<TxOutput>) -> Self {
        Self { outputs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outpoint_short_string_matches_dash_format() {
        let op = Outpoint {
            txid: [0xab; 32],
            index: 7,
        };
        assert_eq!(op.short_string(), format!("{}-7", hex::encode([0xab; 32])));
    }

    #[test]
    fn legacy_sentinel_outpoint_is_all_zero_with_max_index() {
        let sentinel = crate::constants::legacy::invalid_masternode_outpoint();
        assert_eq!(sentinel.txid, [0u8; 32]);
        assert_eq!(sentinel.index, 0xFFFF_FFFF);
    }
}
