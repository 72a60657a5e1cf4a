//! Component F: stateless-ish predicates applied to an inbound vote before
//! it is admitted (§4.F).
//!
//! All checks are pure except for the registry-refresh and ban side effects,
//! which the original requires to be idempotent; we satisfy that simply by
//! never retrying a side effect within a single `validate` call.

use crate::constants::network::{MISBEHAVIOR_BAD_RANK, MISBEHAVIOR_BAD_SIG};
use crate::constants::payments::{FUTURE_WINDOW, SIGS_TOTAL};
use crate::constants::legacy::invalid_masternode_outpoint;
use crate::error::VoteCheckError;
use crate::interfaces::{MasternodeRegistry, PeerBus, PeerId, Signer};
use crate::payment_vote::PaymentVote;

/// Minimum protocol version accepted for legacy-height votes vs. votes at or
/// past the validation tip, when the "pay updated nodes" spork is active.
pub struct ProtocolGate {
    pub legacy_min: u32,
    pub upgraded_min: u32,
    pub pay_updated_nodes_active: bool,
}

impl ProtocolGate {
    fn min_for(&self, vote_height: i64, validation_height: i64) -> u32 {
        if self.pay_updated_nodes_active && vote_height >= validation_height {
            self.upgraded_min
        } else {
            self.legacy_min
        }
    }
}

pub struct VoteValidator;

impl VoteValidator {
    /// Runs the full §4.F check sequence against `vote`. `relaying_peer` is
    /// the peer that delivered this vote on the wire, used only for
    /// misbehavior scoring.
    #[allow(clippy::too_many_arguments)]
    pub fn validate(
        vote: &PaymentVote,
        validation_height: i64,
        storage_limit: i64,
        fully_synced: bool,
        relaying_peer: PeerId,
        gate: &ProtocolGate,
        registry: &impl MasternodeRegistry,
        peers: &impl PeerBus,
        signer: &impl Signer,
    ) -> Result<(), VoteCheckError> {
        // 1. Registry lookup.
        let info = match registry.info_by_outpoint(&vote.voter_outpoint) {
            Some(info) => info,
            None => {
                registry.ask_for(&vote.voter_outpoint, relaying_peer);
                return Err(VoteCheckError::UnknownVoter);
            }
        };

        // 2. Protocol version gate.
        let min_protocol = gate.min_for(vote.height, validation_height);
        if info.protocol_version < min_protocol {
            return Err(VoteCheckError::StaleProtocol);
        }

        // 3. Rank check, against the registry snapshot 101 blocks earlier.
        let ref_height = vote.height - crate::constants::payments::VOTE_REF_OFFSET;
        let is_future_vote = vote.height > validation_height;
        let is_legacy_sentinel = vote.voter_outpoint == invalid_masternode_outpoint();
        match registry.rank(&vote.voter_outpoint, ref_height, min_protocol) {
            None => return Err(VoteCheckError::BadRank),
            Some(rank) => {
                if rank > SIGS_TOTAL {
                    if rank > 2 * SIGS_TOTAL && is_future_vote && !is_legacy_sentinel {
                        peers.misbehave(relaying_peer, MISBEHAVIOR_BAD_RANK);
                    }
                    return Err(VoteCheckError::BadRank);
                }
            }
        }

        // 4. Signature check.
        if vote.verify_signature(signer, &info.signing_pubkey).is_err() {
            if fully_synced && is_future_vote {
                peers.misbehave(relaying_peer, MISBEHAVIOR_BAD_SIG);
            }
            registry.ask_for(&vote.voter_outpoint, relaying_peer);
            return Err(VoteCheckError::BadSig);
        }

        // 5. Window check.
        if vote.height < validation_height - storage_limit || vote.height > validation_height + FUTURE_WINDOW {
            return Err(VoteCheckError::OutOfWindow);
        }

        Ok(())
    }
}
