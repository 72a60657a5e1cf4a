//! Component G: inbound message dispatcher and outbound sync producer (§4.G).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::constants::network::{FULFILLMENT_TTL_SECS, MAX_INV_SZ, MISBEHAVIOR_DUPLICATE_SYNC, MNW_ASSET_ID};
use crate::constants::payments::{FUTURE_WINDOW, SIGS_REQUIRED};
use crate::error::MessageError;
use crate::interfaces::{MasternodeRegistry, PeerBus, PeerId, Signer};
use crate::payment_vote::PaymentVote;
use crate::vote_store::{storage_limit, VoteStore};
use crate::vote_validator::ProtocolGate;
use crate::wire::{GetData, Inv, InvType, OutboundMessage, SyncStatusCount};

/// Tracks the most recent `MNWSYNC` fulfillment per peer so a repeat request
/// inside `FULFILLMENT_TTL_SECS` is treated as misbehavior instead of
/// answered again.
pub struct MessageHandler {
    last_fulfilled: Mutex<HashMap<PeerId, Instant>>,
}

impl Default for MessageHandler {
    fn default() -> Self {
        Self {
            last_fulfilled: Mutex::new(HashMap::new()),
        }
    }
}

impl MessageHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles an inbound `MNWSYNC`. Sends every verified vote for heights in
    /// `[cached_tip_height, cached_tip_height + FUTURE_WINDOW]` as inventory,
    /// then a terminal sync-status-count message. Inclusive upper bound to
    /// match `VoteValidator`'s admission window exactly — see DESIGN.md for
    /// why the two were made consistent instead of leaving the historical
    /// off-by-one in place.
    pub async fn handle_sync_request(
        &self,
        peer: PeerId,
        cached_tip_height: i64,
        fully_synced: bool,
        vote_store: &VoteStore,
        peers: &impl PeerBus,
    ) -> Result<(), MessageError> {
        if !fully_synced {
            return Err(MessageError::NotSynced);
        }

        {
            let mut fulfilled = self.last_fulfilled.lock().await;
            if let Some(last) = fulfilled.get(&peer) {
                if last.elapsed() < Duration::from_secs(FULFILLMENT_TTL_SECS) {
                    peers.misbehave(peer, MISBEHAVIOR_DUPLICATE_SYNC);
                    return Err(MessageError::DuplicateSyncRequest);
                }
            }
            fulfilled.insert(peer, Instant::now());
        }

        let mut count = 0u32;
        for height in cached_tip_height..=(cached_tip_height + FUTURE_WINDOW) {
            if let Some(tally) = vote_store.existing_tally(height).await {
                let tally = tally.read().await;
                for entry in &tally.payees {
                    for hash in &entry.vote_hashes {
                        if vote_store.has_verified(hash).await {
                            peers.push_message(
                                peer,
                                OutboundMessage::Inv(Inv {
                                    inv_type: InvType::PaymentVote,
                                    hash: *hash,
                                }),
                            );
                            count += 1;
                        }
                    }
                }
            }
        }

        peers.push_message(
            peer,
            OutboundMessage::SyncStatus(SyncStatusCount {
                asset_id: MNW_ASSET_ID,
                count,
            }),
        );
        Ok(())
    }

    /// Handles an inbound `MNW` vote. Admits it into the store; on success,
    /// relays it to all peers as inventory.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_vote(
        &self,
        vote: PaymentVote,
        relaying_peer: PeerId,
        cached_tip_height: i64,
        min_blocks_to_store: i64,
        fully_synced: bool,
        gate: &ProtocolGate,
        vote_store: &VoteStore,
        registry: &impl MasternodeRegistry,
        peers: &impl PeerBus,
        signer: &impl Signer,
    ) -> bool {
        let hash = vote.hash();
        if vote_store.has_verified(&hash).await {
            return false;
        }

        let admitted = vote_store
            .admit(
                vote,
                cached_tip_height,
                registry.size(),
                min_blocks_to_store,
                fully_synced,
                relaying_peer,
                gate,
                registry,
                peers,
                signer,
            )
            .await;

        if admitted {
            peers.relay_inventory(Inv {
                inv_type: InvType::PaymentVote,
                hash,
            });
        }
        admitted
    }

    /// Walks back from the chain tip for up to `storage_limit(registry_size)`
    /// blocks, requesting any height with no tally, or no payee at
    /// `SIGS_REQUIRED` votes, in batches of at most `MAX_INV_SZ`.
    #[allow(clippy::too_many_arguments)]
    pub async fn request_low_data_blocks(
        &self,
        peer: PeerId,
        cached_tip_height: i64,
        registry_size: u32,
        min_blocks_to_store: i64,
        vote_store: &VoteStore,
        chain: &impl crate::interfaces::ChainView,
        peers: &impl PeerBus,
    ) {
        let limit = storage_limit(registry_size, min_blocks_to_store);
        let mut batch = Vec::new();

        for height in (cached_tip_height - limit)..=cached_tip_height {
            let needs_data = match vote_store.existing_tally(height).await {
                None => true,
                Some(tally) => {
                    let tally = tally.read().await;
                    !tally.payees.iter().any(|e| e.vote_count() >= SIGS_REQUIRED)
                }
            };

            let Some(block_hash) = (needs_data.then(|| chain.block_hash_at(height)).flatten()) else {
                continue;
            };

            batch.push(Inv {
                inv_type: InvType::PaymentBlock,
                hash: block_hash,
            });
            if batch.len() >= MAX_INV_SZ {
                peers.push_message(
                    peer,
                    OutboundMessage::GetData(GetData {
                        items: std::mem::take(&mut batch),
                    }),
                );
            }
        }

        if !batch.is_empty() {
            peers.push_message(peer, OutboundMessage::GetData(GetData { items: batch }));
        }
    }
}
