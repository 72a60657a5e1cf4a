//! Default `PaymentSchedule` implementation (§6.A).
//!
//! Not a consensus rule: production hosts are expected to supply their own
//! `PaymentSchedule` tied to their actual chain parameters. This default
//! mirrors the teacher's own gold/silver/bronze pool proportions so tests
//! and tools that haven't wired a chain-specific schedule still get a
//! plausible split.

use crate::interfaces::PaymentSchedule;

/// Per-mille share of `block_reward` paid to each tier, scaled from the
/// teacher's 25/18/14 TIME pools out of a 65 TIME total masternode pool.
const TIER_SHARE_PER_MILLE: [u64; 3] = [
    25_000 / 65, // tier 0 (gold)
    18_000 / 65, // tier 1 (silver)
    14_000 / 65, // tier 2 (bronze)
];

pub struct DefaultPaymentSchedule;

impl PaymentSchedule for DefaultPaymentSchedule {
    fn masternode_payment(&self, tier: usize, block_reward: u64) -> u64 {
        let share = TIER_SHARE_PER_MILLE.get(tier).copied().unwrap_or(0);
        block_reward.saturating_mul(share) / 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered_gold_silver_bronze() {
        let schedule = DefaultPaymentSchedule;
        let reward = 10_000_000;
        let gold = schedule.masternode_payment(0, reward);
        let silver = schedule.masternode_payment(1, reward);
        let bronze = schedule.masternode_payment(2, reward);
        assert!(gold > silver);
        assert!(silver > bronze);
    }

    #[test]
    fn unknown_tier_pays_nothing() {
        let schedule = DefaultPaymentSchedule;
        assert_eq!(schedule.masternode_payment(3, 10_000_000), 0);
    }
}
