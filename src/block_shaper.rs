//! Component E: builds and inspects the payment outputs in a candidate
//! coinbase/coinstake transaction (§4.E).

use crate::error::BlockPaymentError;
use crate::interfaces::{MasternodeRegistry, PaymentSchedule, SporkBus, SporkId, SuperblockOracle};
use crate::payee_elector::PayeeElector;
use crate::types::{Height, PaymentTx, TxOutput};
use crate::vote_store::VoteStore;

pub struct BlockShaper;

impl BlockShaper {
    /// Appends the three tiered payment outputs to `tx` and rebalances the
    /// staker/coinbase output so the transaction stays balanced.
    pub fn fill_payments(
        tx: &mut PaymentTx,
        height: Height,
        block_reward: u64,
        is_proof_of_stake: bool,
        registry: &impl MasternodeRegistry,
        sporks: &impl SporkBus,
        schedule: &impl PaymentSchedule,
    ) {
        let payees = PayeeElector::elect(height, registry, sporks);
        let amounts = [
            schedule.masternode_payment(0, block_reward),
            schedule.masternode_payment(1, block_reward),
            schedule.masternode_payment(2, block_reward),
        ];
        let total: u64 = amounts.iter().sum();

        let pre_fill_len = tx.outputs.len();

        if is_proof_of_stake {
            if pre_fill_len == 3 {
                let split_index = if tx.outputs[2].value > tx.outputs[1].value { 2 } else { 1 };
                tx.outputs[split_index].value = tx.outputs[split_index].value.saturating_sub(total);
            } else if let Some(output) = tx.outputs.get_mut(1) {
                output.value = output.value.saturating_sub(total);
            }
        } else if let Some(output) = tx.outputs.get_mut(0) {
            output.value = block_reward.saturating_sub(total);
        }

        for (tier, amount) in amounts.into_iter().enumerate() {
            tx.outputs.push(TxOutput::new(amount, payees[tier].clone()));
        }
    }

    /// `actual_reward` must not exceed `expected_reward`, and the block must
    /// satisfy either the superblock rules (at/after the superblock start
    /// height) or the masternode-payment vote tally.
    #[allow(clippy::too_many_arguments)]
    pub async fn validate_payments(
        tx: &PaymentTx,
        height: Height,
        expected_reward: u64,
        actual_reward: u64,
        superblock_start: Height,
        old_budget_window_end: Height,
        vote_store: &VoteStore,
        superblocks: &impl SuperblockOracle,
        sporks: &impl SporkBus,
    ) -> Result<(), BlockPaymentError> {
        if actual_reward > expected_reward {
            return Err(BlockPaymentError::OverpaidBlock {
                actual: actual_reward,
                expected: expected_reward,
            });
        }

        if !sporks.is_active(SporkId::MasternodePaymentEnforcement) {
            return Ok(());
        }

        if height >= superblock_start
            && superblocks.is_triggered(height)
            && superblocks.validate(tx, height, expected_reward, actual_reward)
        {
            return Ok(());
        }

        let required = match vote_store.existing_tally(height).await {
            Some(tally) => tally.read().await.contains_required_payment(tx),
            None => true,
        };

        if required {
            return Ok(());
        }

        if height <= old_budget_window_end && sporks.is_active(SporkId::OldSuperblockFlag) {
            return Ok(());
        }

        Err(BlockPaymentError::MissingRequiredPayment { height })
    }

    /// Locates `existing_masternode_output` in `tx.outputs` by value+script
    /// equality and, if found, deducts its value from the second-to-last
    /// output to keep the transaction balanced.
    pub fn adjust_existing(tx: &mut PaymentTx, existing_masternode_output: &TxOutput) {
        let found = tx
            .outputs
            .iter()
            .position(|o| o == existing_masternode_output);
        if let Some(i) = found {
            let len = tx.outputs.len();
            if len >= 2 {
                let value = tx.outputs[i].value;
                tx.outputs[len - 2].value = tx.outputs[len - 2].value.saturating_sub(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::PeerId;
    use crate::types::{MasternodeInfo, Outpoint, ScriptBytes};

    struct FixedRegistry(Vec<MasternodeInfo>);
    impl MasternodeRegistry for FixedRegistry {
        fn info_by_outpoint(&self, _outpoint: &Outpoint) -> Option<MasternodeInfo> {
            None
        }
        fn next_in_queue(
            &self,
            _height: i64,
            _ignore_inactive: bool,
            tier: usize,
        ) -> Option<(MasternodeInfo, u32)> {
            self.0.get(tier).cloned().map(|i| (i, 1))
        }
        fn rank(&self, _outpoint: &Outpoint, _ref_height: i64, _min_protocol: u32) -> Option<u32> {
            None
        }
        fn top_ranks(&self, _ref_height: i64, _min_protocol: u32) -> Vec<(u32, MasternodeInfo)> {
            vec![]
        }
        fn size(&self) -> u32 {
            self.0.len() as u32
        }
        fn ask_for(&self, _outpoint: &Outpoint, _peer: PeerId) {}
    }

    struct FakeSporks;
    impl SporkBus for FakeSporks {
        fn is_active(&self, _spork_id: SporkId) -> bool {
            false
        }
        fn spork_public_key(&self) -> [u8; 32] {
            [0u8; 32]
        }
        fn spork_public_address(&self) -> ScriptBytes {
            ScriptBytes::new(vec![])
        }
    }

    struct FixedSchedule {
        amounts: [u64; 3],
    }
    impl PaymentSchedule for FixedSchedule {
        fn masternode_payment(&self, tier: usize, _block_reward: u64) -> u64 {
            self.amounts[tier]
        }
    }

    fn mn(tag: u8) -> MasternodeInfo {
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

    /// S1: PoW block at height 1000, reward 10_000_000.
    #[test]
    fn s1_pow_block_fills_miner_plus_three_tiers() {
        let registry = FixedRegistry(vec![mn(1), mn(2), mn(3)]);
        let schedule = FixedSchedule {
            amounts: [600_000, 300_000, 100_000],
        };
        let mut tx = PaymentTx::new(vec![TxOutput::new(10_000_000, ScriptBytes::new(vec![0xaa]))]);
        BlockShaper::fill_payments(&mut tx, 1000, 10_000_000, false, &registry, &FakeSporks, &schedule);

        assert_eq!(tx.outputs.len(), 4);
        assert_eq!(tx.outputs[0].value, 9_000_000);
        assert_eq!(tx.outputs[1].value, 600_000);
        assert_eq!(tx.outputs[2].value, 300_000);
        assert_eq!(tx.outputs[3].value, 100_000);
    }

    /// S2: PoS coinstake with split outputs, pre-fill values [0, 4_000_000, 6_000_000].
    #[test]
    fn s2_pos_split_output_deducts_from_larger_side() {
        let registry = FixedRegistry(vec![mn(1), mn(2), mn(3)]);
        let schedule = FixedSchedule {
            amounts: [600_000, 300_000, 100_000],
        };
        let mut tx = PaymentTx::new(vec![
            TxOutput::new(0, ScriptBytes::new(vec![])),
            TxOutput::new(4_000_000, ScriptBytes::new(vec![0xbb])),
            TxOutput::new(6_000_000, ScriptBytes::new(vec![0xcc])),
        ]);
        BlockShaper::fill_payments(&mut tx, 1000, 10_000_000, true, &registry, &FakeSporks, &schedule);

        assert_eq!(tx.outputs[2].value, 6_000_000 - 1_000_000);
        assert_eq!(tx.outputs.len(), 6);
    }

    #[test]
    fn adjust_existing_deducts_from_second_to_last_output() {
        let existing = TxOutput::new(500, ScriptBytes::new(vec![1]));
        let mut tx = PaymentTx::new(vec![
            TxOutput::new(100, ScriptBytes::new(vec![0])),
            existing.clone(),
            TxOutput::new(1_000, ScriptBytes::new(vec![2])),
            TxOutput::new(2_000, ScriptBytes::new(vec![3])),
        ]);
        BlockShaper::adjust_existing(&mut tx, &existing);
        assert_eq!(tx.outputs[2].value, 500);
    }
}
