//! Component D: produces the ordered list of winning payees for a height
//! (§4.D).

use crate::constants::payments::TIER_COUNT;
use crate::interfaces::{MasternodeRegistry, SporkBus};
use crate::types::ScriptBytes;

/// Where a tier's payee came from. Collapses the original's per-tier
/// inheritance into one tagged variant (§9).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayeeSource {
    Elected(crate::types::MasternodeInfo),
    Failover,
}

pub struct PayeeElector;

impl PayeeElector {
    /// For each tier in `0..TIER_COUNT`, asks the registry for the next
    /// masternode in that tier's payment queue at `height`. A tier with no
    /// queued masternode falls back to the spork-derived failover payee so a
    /// missing masternode never stalls payouts.
    pub fn elect(
        height: i64,
        registry: &impl MasternodeRegistry,
        sporks: &impl SporkBus,
    ) -> [ScriptBytes; TIER_COUNT] {
        let failover = sporks.spork_public_address();
        let mut out = [failover.clone(), failover.clone(), failover];
        for (tier, slot) in out.iter_mut().enumerate() {
            if let Some((info, _queue_count)) = registry.next_in_queue(height, true, tier) {
                *slot = script_for_pkh(&info.collateral_pubkey_hash);
            }
        }
        out
    }
}

/// Standard pay-to-pubkey-hash rendering: `OP_DUP OP_HASH160 <pkh> OP_EQUALVERIFY
/// OP_CHECKSIG`, expressed as raw bytes since the script interpreter is out of
/// scope (§1). `0x76 0xa9 0x14 <20 bytes of pkh> 0x88 0xac`.
fn script_for_pkh(pkh: &crate::types::Hash256) -> ScriptBytes {
    let mut bytes = Vec::with_capacity(25);
    bytes.push(0x76);
    bytes.push(0xa9);
    bytes.push(0x14);
    bytes.extend_from_slice(&pkh[..20]);
    bytes.push(0x88);
    bytes.push(0xac);
    ScriptBytes::new(bytes)
}
