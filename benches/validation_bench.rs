//! Benchmarks for vote admission and payment election performance.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use masternode_payments::block_shaper::BlockShaper;
use masternode_payments::interfaces::{
    MasternodeRegistry, PaymentSchedule, PeerBus, PeerId, Signer, SigningError, SporkBus, SporkId,
};
use masternode_payments::payee_elector::PayeeElector;
use masternode_payments::payment_vote::PaymentVote;
use masternode_payments::types::{MasternodeInfo, Outpoint, PaymentTx, ScriptBytes, TxOutput};
use masternode_payments::vote_store::VoteStore;
use masternode_payments::vote_validator::ProtocolGate;

struct FixedRegistry {
    voters: Vec<MasternodeInfo>,
}

impl MasternodeRegistry for FixedRegistry {
    fn info_by_outpoint(&self, outpoint: &Outpoint) -> Option<MasternodeInfo> {
        self.voters.iter().find(|i| &i.outpoint == outpoint).cloned()
    }
    fn next_in_queue(&self, _height: i64, _ignore_inactive: bool, tier: usize) -> Option<(MasternodeInfo, u32)> {
        self.voters.get(tier).cloned().map(|i| (i, self.voters.len() as u32))
    }
    fn rank(&self, _outpoint: &Outpoint, _ref_height: i64, _min_protocol: u32) -> Option<u32> {
        Some(1)
    }
    fn top_ranks(&self, _ref_height: i64, _min_protocol: u32) -> Vec<(u32, MasternodeInfo)> {
        self.voters.iter().cloned().enumerate().map(|(i, v)| (i as u32 + 1, v)).collect()
    }
    fn size(&self) -> u32 {
        self.voters.len() as u32
    }
    fn ask_for(&self, _outpoint: &Outpoint, _peer: PeerId) {}
}

struct NoopPeers;
impl PeerBus for NoopPeers {
    fn relay_inventory(&self, _inv: masternode_payments::wire::Inv) {}
    fn push_message(&self, _peer: PeerId, _message: masternode_payments::wire::OutboundMessage) {}
    fn misbehave(&self, _peer: PeerId, _weight: u32) {}
}

struct FixedSporks;
impl SporkBus for FixedSporks {
    fn is_active(&self, _spork_id: SporkId) -> bool {
        false
    }
    fn spork_public_key(&self) -> [u8; 32] {
        [0u8; 32]
    }
    fn spork_public_address(&self) -> ScriptBytes {
        ScriptBytes::new(vec![0xde, 0xad])
    }
}

struct FixedSchedule;
impl PaymentSchedule for FixedSchedule {
    fn masternode_payment(&self, tier: usize, block_reward: u64) -> u64 {
        match tier {
            0 => block_reward / 10,
            1 => block_reward / 20,
            _ => block_reward / 40,
        }
    }
}

struct FixedSigner;
impl Signer for FixedSigner {
    fn sign(&self, msg: &[u8], _priv_key: &[u8]) -> Result<Vec<u8>, SigningError> {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(msg);
        Ok(hasher.finalize().to_vec())
    }
    fn verify(&self, _pubkey: &[u8], msg: &[u8], sig: &[u8]) -> bool {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(msg);
        hasher.finalize().to_vec() == sig
    }
}

fn voter(tag: u8) -> MasternodeInfo {
    MasternodeInfo {
        outpoint: Outpoint {
            txid: [tag; 32],
            index: 0,
        },
        collateral_pubkey_hash: [tag; 32],
        signing_pubkey: [tag; 32],
        protocol_version: 70015,
    }
}

fn bench_elect(c: &mut Criterion) {
    let registry = FixedRegistry {
        voters: vec![voter(1), voter(2), voter(3)],
    };
    c.bench_function("elect_three_tiers", |b| {
        b.iter(|| PayeeElector::elect(black_box(1_000_000), &registry, &FixedSporks))
    });
}

fn bench_fill_payments(c: &mut Criterion) {
    let registry = FixedRegistry {
        voters: vec![voter(1), voter(2), voter(3)],
    };
    c.bench_function("fill_payments_pow_block", |b| {
        b.iter(|| {
            let mut tx = PaymentTx::new(vec![TxOutput::new(10_000_000, ScriptBytes::new(vec![0xaa]))]);
            BlockShaper::fill_payments(
                black_box(&mut tx),
                1_000_000,
                10_000_000,
                false,
                &registry,
                &FixedSporks,
                &FixedSchedule,
            );
            tx
        })
    });
}

fn bench_vote_admission(c: &mut Criterion) {
    let registry = FixedRegistry {
        voters: vec![voter(1)],
    };
    let rt = tokio::runtime::Runtime::new().unwrap();
    let gate = ProtocolGate {
        legacy_min: 70000,
        upgraded_min: 70015,
        pay_updated_nodes_active: false,
    };

    c.bench_function("admit_single_vote", |b| {
        b.iter_batched(
            || {
                let mut vote = PaymentVote::new(registry.voters[0].outpoint, 1_000_000, ScriptBytes::new(vec![1]));
                vote.sign(&FixedSigner, b"priv").unwrap();
                (VoteStore::new(), vote)
            },
            |(store, vote)| {
                rt.block_on(store.admit(
                    black_box(vote),
                    1_000_000,
                    registry.size(),
                    5000,
                    true,
                    1,
                    &gate,
                    &registry,
                    &NoopPeers,
                    &FixedSigner,
                ))
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_elect, bench_fill_payments, bench_vote_admission);
criterion_main!(benches);
