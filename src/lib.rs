//! Masternode payment voting subsystem.
//!
//! Elects, per block height, up to three masternodes (primary/secondary/
//! tertiary tiers) that must receive fixed per-tier payment outputs in that
//! block's coinbase or coinstake transaction; collects, verifies, stores,
//! and gossips the payment votes cast by the top-ranked masternodes in the
//! active set; and determines at validation time whether a candidate
//! block's payment outputs match the winners elected by the vote pool.
//!
//! # Glossary
//!
//! - **Masternode**: a node holding a locked collateral UTXO that provides
//!   network services and is eligible for tiered block rewards.
//! - **Payee**: the output script that must appear in a block's payment
//!   output at a given height.
//! - **Tier**: one of three parallel payout queues with distinct reward sizes.
//! - **Spork**: a signed, network-wide feature flag controlled by a
//!   configured public key.
//! - **Superblock**: a governance-scheduled block with an alternative
//!   payout schema.
//! - **Storage limit**: `max(registry_size * coefficient, MIN_BLOCKS_TO_STORE)`;
//!   the retention window for votes and tallies.
//! - **Legacy sentinel outpoint**: `(all-zero txid, 0xFFFFFFFF)`, treated
//!   specially to preserve historical broadcast-bug compatibility.

pub mod block_shaper;
pub mod config;
pub mod constants;
pub mod error;
pub mod interfaces;
pub mod message_handler;
pub mod payee_elector;
pub mod payee_tally;
pub mod payment_schedule;
pub mod payment_vote;
pub mod tip_driver;
pub mod types;
pub mod vote_store;
pub mod vote_validator;
pub mod wire;

use std::sync::Arc;

use tracing::{debug, info};

use config::PaymentsConfig;
use error::PaymentsError;
use interfaces::{ChainView, MasternodeRegistry, PaymentSchedule, PeerBus, PeerId, Signer, SporkBus, SporkId, SuperblockOracle};
use message_handler::MessageHandler;
use payment_vote::PaymentVote;
use tip_driver::{SelfIdentity, TipDriver, TipOutcome};
use types::PaymentTx;
use vote_store::VoteStore;
use vote_validator::ProtocolGate;

/// Owns every piece of process-wide state for the subsystem, generic over
/// the host's concrete implementations of the consumed interfaces (§6). The
/// host constructs exactly one `PaymentsCore` and shares it behind an `Arc`,
/// the way the teacher's `MessageContext` composes its own `Arc<Blockchain>`
/// and friends — generics instead of `Option<Arc<..>>` fields because every
/// dependency here is mandatory.
pub struct PaymentsCore<R, S, P, B, C, Sg> {
    config: PaymentsConfig,
    state: VoteStore,
    messages: MessageHandler,
    registry: R,
    superblocks: S,
    sporks: P,
    peers: B,
    chain: C,
    signer: Sg,
}

impl<R, S, P, B, C, Sg> PaymentsCore<R, S, P, B, C, Sg>
where
    R: MasternodeRegistry,
    S: SuperblockOracle,
    P: SporkBus,
    B: PeerBus,
    C: ChainView,
    Sg: Signer,
{
    pub fn new(
        config: PaymentsConfig,
        registry: R,
        superblocks: S,
        sporks: P,
        peers: B,
        chain: C,
        signer: Sg,
    ) -> Self {
        info!(superblock_start = config.superblock_start_height, "payments core initialized");
        Self {
            config,
            state: VoteStore::new(),
            messages: MessageHandler::new(),
            registry,
            superblocks,
            sporks,
            peers,
            chain,
            signer,
        }
    }

    fn gate(&self) -> ProtocolGate {
        ProtocolGate {
            legacy_min: self.config.legacy_min_protocol_version,
            upgraded_min: self.config.upgraded_min_protocol_version,
            pay_updated_nodes_active: self.sporks.is_active(SporkId::PayUpdatedNodes),
        }
    }

    /// Reacts to a new chain tip: prunes stale state, checks miss counters
    /// for the previous target height, and casts this node's own vote if it
    /// is an active masternode.
    pub async fn on_new_tip(&self, new_tip_height: i64, identity: &SelfIdentity) -> TipOutcome {
        let lite_mode = identity.lite_mode || !self.config.enabled;
        let identity = SelfIdentity {
            outpoint: identity.outpoint,
            priv_key: identity.priv_key.clone(),
            is_masternode: identity.is_masternode,
            lite_mode,
        };
        let outcome = TipDriver::react_to_tip(
            new_tip_height,
            &identity,
            &self.gate(),
            self.config.min_blocks_to_store,
            &self.state,
            &self.registry,
            &self.sporks,
            &self.peers,
            &self.signer,
        )
        .await;
        debug!(new_tip_height, ?outcome, "tip driver reacted");
        outcome
    }

    /// Handles an inbound `MNWSYNC` from `peer`.
    pub async fn handle_sync_request(
        &self,
        peer: PeerId,
        cached_tip_height: i64,
        fully_synced: bool,
    ) -> Result<(), PaymentsError> {
        self.messages
            .handle_sync_request(peer, cached_tip_height, fully_synced, &self.state, &self.peers)
            .await
            .map_err(PaymentsError::from)
    }

    /// Handles an inbound `MNW` vote relayed by `peer`.
    pub async fn handle_vote(
        &self,
        vote: PaymentVote,
        relaying_peer: PeerId,
        cached_tip_height: i64,
        fully_synced: bool,
    ) -> bool {
        self.messages
            .handle_vote(
                vote,
                relaying_peer,
                cached_tip_height,
                self.config.min_blocks_to_store,
                fully_synced,
                &self.gate(),
                &self.state,
                &self.registry,
                &self.peers,
                &self.signer,
            )
            .await
    }

    /// Builds the payment-bearing outputs for a block being produced at `height`.
    pub fn fill_payments(
        &self,
        tx: &mut PaymentTx,
        height: i64,
        block_reward: u64,
        is_proof_of_stake: bool,
        schedule: &impl PaymentSchedule,
    ) {
        block_shaper::BlockShaper::fill_payments(
            tx,
            height,
            block_reward,
            is_proof_of_stake,
            &self.registry,
            &self.sporks,
            schedule,
        );
    }

    /// Validates a candidate block's payment outputs.
    pub async fn validate_payments(
        &self,
        tx: &PaymentTx,
        height: i64,
        expected_reward: u64,
        actual_reward: u64,
    ) -> Result<(), PaymentsError> {
        block_shaper::BlockShaper::validate_payments(
            tx,
            height,
            expected_reward,
            actual_reward,
            self.config.superblock_start_height,
            self.config.old_budget_window_end_height,
            &self.state,
            &self.superblocks,
            &self.sporks,
        )
        .await
        .map_err(PaymentsError::from)
    }

    /// Requests sync for low-data (low-vote-confidence) blocks near the tip.
    pub async fn request_low_data_blocks(&self, peer: PeerId, cached_tip_height: i64) {
        self.messages
            .request_low_data_blocks(
                peer,
                cached_tip_height,
                self.registry.size(),
                self.config.min_blocks_to_store,
                &self.state,
                &self.chain,
                &self.peers,
            )
            .await;
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }
}

/// Convenience alias for the common case where a host shares one core
/// across tasks.
pub type SharedPaymentsCore<R, S, P, B, C, Sg> = Arc<PaymentsCore<R, S, P, B, C, Sg>>;
