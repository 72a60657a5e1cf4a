//! Component H: reacts to new-tip events (§4.H).
//!
//! Owns the per-voter, per-height voting state machine:
//! `Idle -> Electing(h) -> Signing(h, payee) -> Admitting(vote) -> Relaying(vote) -> Idle`.

use crate::constants::payments::SIGS_TOTAL;
use crate::interfaces::{MasternodeRegistry, PeerBus, Signer, SporkBus};
use crate::payee_elector::PayeeElector;
use crate::payment_vote::PaymentVote;
use crate::types::Outpoint;
use crate::vote_store::{storage_limit, VoteStore};
use crate::vote_validator::ProtocolGate;
use crate::wire::Inv;

/// This node's identity as a masternode, if it is one. `lite_mode` nodes
/// never cast their own votes even if they hold a masternode identity.
pub struct SelfIdentity {
    pub outpoint: Outpoint,
    pub priv_key: Vec<u8>,
    pub is_masternode: bool,
    pub lite_mode: bool,
}

/// Diagnostic snapshot of where `react_to_tip` got to, for logging/tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipOutcome {
    NoWinnerToSign,
    SigningFailed,
    NotAdmitted,
    Relayed,
    NotAVoter,
}

pub struct TipDriver;

impl TipDriver {
    /// On a new tip at height `h`: updates `cached_tip_height`, prunes the
    /// vote store, checks the previous target height's votes for misses, and
    /// — if this node is an active masternode — casts its own vote for the
    /// upcoming target height.
    #[allow(clippy::too_many_arguments)]
    pub async fn react_to_tip(
        new_tip_height: i64,
        identity: &SelfIdentity,
        gate: &ProtocolGate,
        min_blocks_to_store: i64,
        vote_store: &VoteStore,
        registry: &impl MasternodeRegistry,
        sporks: &impl SporkBus,
        peers: &impl PeerBus,
        signer: &impl Signer,
    ) -> TipOutcome {
        let limit = storage_limit(registry.size(), min_blocks_to_store);
        vote_store.prune(new_tip_height, limit).await;

        let future = new_tip_height + 10;
        Self::check_previous_block_votes(future - 1, registry, vote_store).await;

        if !identity.is_masternode || identity.lite_mode {
            return TipOutcome::NotAVoter;
        }

        let payees = PayeeElector::elect(future, registry, sporks);
        let payee = payees[0].clone();
        if payee.as_slice().is_empty() {
            return TipOutcome::NoWinnerToSign;
        }

        let mut vote = PaymentVote::new(identity.outpoint, future, payee);
        if vote.sign(signer, &identity.priv_key).is_err() {
            return TipOutcome::SigningFailed;
        }

        let admitted = vote_store
            .admit(
                vote.clone(),
                new_tip_height,
                registry.size(),
                min_blocks_to_store,
                true,
                0,
                gate,
                registry,
                peers,
                signer,
            )
            .await;

        if !admitted {
            return TipOutcome::NotAdmitted;
        }

        peers.relay_inventory(Inv {
            inv_type: crate::wire::InvType::PaymentVote,
            hash: vote.hash(),
        });
        TipOutcome::Relayed
    }

    /// For each of the top `SIGS_TOTAL` masternodes at `target_height - 101`,
    /// bumps its miss counter if no stored vote for `target_height` came from it.
    async fn check_previous_block_votes(
        target_height: i64,
        registry: &impl MasternodeRegistry,
        vote_store: &VoteStore,
    ) {
        let ref_height = target_height - crate::constants::payments::VOTE_REF_OFFSET;
        let top = registry.top_ranks(ref_height, 0);
        let voters_with_votes = vote_store.voters_at(target_height).await;

        for (_rank, info) in top.into_iter().take(SIGS_TOTAL as usize) {
            if !voters_with_votes.contains(&info.outpoint) {
                vote_store.bump_miss_counter(&info.outpoint).await;
            }
        }
    }
}
