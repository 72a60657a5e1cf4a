//! Component C: process-wide vote and tally state (§4.C, §5).
//!
//! Three logical locks guard disjoint state: `L_votes` over `votes_by_hash`
//! and `last_vote_height`, `L_tallies` over `tallies_by_height` and
//! `miss_counters`, and `L_payees` — realized as a `RwLock` per
//! `BlockPayeeTally` nested inside the map guarded by `L_tallies` — over a
//! single tally's payee list. When an operation needs both `L_tallies` and
//! `L_votes`, it takes `L_tallies` first. No raw lock handle is exposed
//! outside this module; every operation below is the atomic section.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::constants::payments::STORAGE_COEFFICIENT;
use crate::interfaces::{MasternodeRegistry, PeerBus, PeerId, Signer};
use crate::payee_tally::BlockPayeeTally;
use crate::payment_vote::PaymentVote;
use crate::types::{Hash256, Height, Outpoint};
use crate::vote_validator::{ProtocolGate, VoteValidator};

/// `max(registry_size * STORAGE_COEFFICIENT, min_blocks_to_store)`. The floor
/// is the host's configured `PaymentsConfig::min_blocks_to_store`, not a
/// fixed constant, so deployments can widen or narrow retention.
pub fn storage_limit(registry_size: u32, min_blocks_to_store: i64) -> i64 {
    let scaled = (registry_size as f64 * STORAGE_COEFFICIENT) as i64;
    scaled.max(min_blocks_to_store)
}

#[derive(Default)]
struct VotesDomain {
    votes_by_hash: HashMap<Hash256, PaymentVote>,
    last_vote_height: HashMap<Outpoint, Height>,
}

#[derive(Default)]
struct TalliesDomain {
    tallies_by_height: HashMap<Height, Arc<RwLock<BlockPayeeTally>>>,
    miss_counters: HashMap<Outpoint, u32>,
}

pub struct VoteStore {
    votes: RwLock<VotesDomain>,
    tallies: RwLock<TalliesDomain>,
}

impl Default for VoteStore {
    fn default() -> Self {
        Self {
            votes: RwLock::new(VotesDomain::default()),
            tallies: RwLock::new(TalliesDomain::default()),
        }
    }
}

impl VoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and admits `vote`. Returns `false` (without error) for a
    /// vote whose hash is already present — duplicates are dropped silently,
    /// not surfaced as an error, per §7. Runs `VoteValidator::validate`
    /// (registry lookup, protocol gate, rank check and ban) before gating on
    /// `can_vote`, so a repeat-height vote with a bad rank or signature is
    /// still rank/signature-checked and its relaying peer still banned,
    /// matching the original's ordering of the rank check ahead of the
    /// one-vote-per-height check. This is the single `can_vote` call for a
    /// given vote — callers must not pre-check `can_vote` themselves.
    #[allow(clippy::too_many_arguments)]
    pub async fn admit(
        &self,
        vote: PaymentVote,
        validation_height: i64,
        registry_size: u32,
        min_blocks_to_store: i64,
        fully_synced: bool,
        relaying_peer: PeerId,
        gate: &ProtocolGate,
        registry: &impl MasternodeRegistry,
        peers: &impl PeerBus,
        signer: &impl Signer,
    ) -> bool {
        let hash = vote.hash();

        {
            let mut votes = self.votes.write().await;
            if votes.votes_by_hash.contains_key(&hash) {
                return false;
            }
            let mut unverified = vote.clone();
            unverified.verified = false;
            votes.votes_by_hash.insert(hash, unverified);
        }

        let limit = storage_limit(registry_size, min_blocks_to_store);
        let result = VoteValidator::validate(
            &vote,
            validation_height,
            limit,
            fully_synced,
            relaying_peer,
            gate,
            registry,
            peers,
            signer,
        );

        if result.is_err() {
            self.votes.write().await.votes_by_hash.remove(&hash);
            return false;
        }

        if !self.can_vote(&vote.voter_outpoint, vote.height).await {
            self.votes.write().await.votes_by_hash.remove(&hash);
            return false;
        }

        self.tally(vote.height).await.write().await.add(hash, &vote.payee);
        let mut votes = self.votes.write().await;
        if let Some(entry) = votes.votes_by_hash.get_mut(&hash) {
            entry.verified = true;
        }
        true
    }

    pub async fn has_verified(&self, hash: &Hash256) -> bool {
        self.votes
            .read()
            .await
            .votes_by_hash
            .get(hash)
            .map(|v| v.verified)
            .unwrap_or(false)
    }

    /// One-vote-per-(voter, height) rule: the first call for a given height
    /// succeeds and remembers it; any further call for the same height fails.
    pub async fn can_vote(&self, voter: &Outpoint, height: Height) -> bool {
        let mut votes = self.votes.write().await;
        if votes.last_vote_height.get(voter) == Some(&height) {
            return false;
        }
        votes.last_vote_height.insert(*voter, height);
        true
    }

    /// Removes every vote and tally whose height falls more than `limit`
    /// blocks behind `cached_tip_height`.
    pub async fn prune(&self, cached_tip_height: Height, limit: i64) {
        let stale_hashes = {
            let mut tallies = self.tallies.write().await;
            let stale_heights: Vec<Height> = tallies
                .tallies_by_height
                .keys()
                .filter(|h| cached_tip_height - **h > limit)
                .copied()
                .collect();

            let mut hashes = Vec::new();
            for height in &stale_heights {
                if let Some(tally) = tallies.tallies_by_height.remove(height) {
                    hashes.extend(tally.read().await.payees.iter().flat_map(|e| e.vote_hashes.iter().copied()));
                }
            }
            hashes
        };

        let mut votes = self.votes.write().await;
        for hash in stale_hashes {
            votes.votes_by_hash.remove(&hash);
        }
    }

    /// Gets or lazily creates the tally for `height`.
    pub async fn tally(&self, height: Height) -> Arc<RwLock<BlockPayeeTally>> {
        let mut tallies = self.tallies.write().await;
        tallies
            .tallies_by_height
            .entry(height)
            .or_insert_with(|| Arc::new(RwLock::new(BlockPayeeTally::new(height))))
            .clone()
    }

    /// Read-only access to an existing tally, without creating one.
    pub async fn existing_tally(&self, height: Height) -> Option<Arc<RwLock<BlockPayeeTally>>> {
        self.tallies.read().await.tallies_by_height.get(&height).cloned()
    }

    /// The set of voter outpoints with an admitted vote at `height`, used by
    /// `TipDriver::check_previous_block_votes` to find non-voters.
    pub async fn voters_at(&self, height: Height) -> std::collections::HashSet<Outpoint> {
        let Some(tally) = self.existing_tally(height).await else {
            return std::collections::HashSet::new();
        };
        let hashes: Vec<Hash256> = tally
            .read()
            .await
            .payees
            .iter()
            .flat_map(|e| e.vote_hashes.iter().copied())
            .collect();

        let votes = self.votes.read().await;
        hashes
            .into_iter()
            .filter_map(|h| votes.votes_by_hash.get(&h).map(|v| v.voter_outpoint))
            .collect()
    }

    pub async fn bump_miss_counter(&self, voter: &Outpoint) {
        let mut tallies = self.tallies.write().await;
        *tallies.miss_counters.entry(*voter).or_insert(0) += 1;
    }

    pub async fn miss_counter(&self, voter: &Outpoint) -> u32 {
        self.tallies
            .read()
            .await
            .miss_counters
            .get(voter)
            .copied()
            .unwrap_or(0)
    }
}
