//! Component B: per-height tally of distinct payees and the vote hashes
//! supporting each (§4.B).

use std::collections::BTreeSet;

use crate::constants::payments::SIGS_REQUIRED;
use crate::types::{Hash256, Height, PaymentTx, ScriptBytes};

/// One candidate payee at a given height, and the votes backing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayeeEntry {
    pub payee: ScriptBytes,
    pub vote_hashes: BTreeSet<Hash256>,
}

impl PayeeEntry {
    fn new(payee: ScriptBytes) -> Self {
        Self {
            payee,
            vote_hashes: BTreeSet::new(),
        }
    }

    pub fn vote_count(&self) -> u32 {
        self.vote_hashes.len() as u32
    }
}

/// All payees competing for a single height, each with its own vote count.
/// Insertion order is preserved (a `Vec`, not a map) so `best_payee`'s
/// tie-break rule — first encountered wins — is well defined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockPayeeTally {
    pub height: Height,
    pub payees: Vec<PayeeEntry>,
}

impl BlockPayeeTally {
    pub fn new(height: Height) -> Self {
        Self {
            height,
            payees: Vec::new(),
        }
    }

    /// Inserts `vote_hash` under `payee`'s entry, creating it if this is the
    /// first vote seen for that payee at this height. Idempotent: inserting
    /// the same hash twice has no additional effect.
    pub fn add(&mut self, vote_hash: Hash256, payee: &ScriptBytes) {
        if let Some(entry) = self.payees.iter_mut().find(|e| &e.payee == payee) {
            entry.vote_hashes.insert(vote_hash);
        } else {
            let mut entry = PayeeEntry::new(payee.clone());
            entry.vote_hashes.insert(vote_hash);
            self.payees.push(entry);
        }
    }

    /// The payee with strictly the highest vote count; ties go to whichever
    /// payee was added first. `None` if there are no entries.
    pub fn best_payee(&self) -> Option<&ScriptBytes> {
        let mut best: Option<&PayeeEntry> = None;
        for entry in &self.payees {
            match best {
                None => best = Some(entry),
                Some(current) if entry.vote_count() > current.vote_count() => best = Some(entry),
                _ => {}
            }
        }
        best.map(|e| &e.payee)
    }

    pub fn has_payee_with_votes(&self, payee: &ScriptBytes, n: u32) -> bool {
        self.payees
            .iter()
            .any(|e| &e.payee == payee && e.vote_count() >= n)
    }

    /// Highest vote count among all payees at this height, or 0 if empty.
    fn max_tally(&self) -> u32 {
        self.payees.iter().map(PayeeEntry::vote_count).max().unwrap_or(0)
    }

    /// If no payee has reached `SIGS_REQUIRED` yet, accept unconditionally
    /// (longest-chain tolerance). Otherwise the block must pay some payee
    /// that has reached the threshold.
    pub fn contains_required_payment(&self, tx: &PaymentTx) -> bool {
        if self.max_tally() < SIGS_REQUIRED {
            return true;
        }
        self.payees
            .iter()
            .filter(|e| e.vote_count() >= SIGS_REQUIRED)
            .any(|e| tx.outputs.iter().any(|o| o.script_pubkey == e.payee))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TxOutput;

    fn sp(bytes: &[u8]) -> ScriptBytes {
        ScriptBytes::new(bytes.to_vec())
    }

    fn h(b: u8) -> Hash256 {
        [b; 32]
    }

    #[test]
    fn add_is_idempotent_and_tracks_distinct_payees() {
        let mut tally = BlockPayeeTally::new(100);
        tally.add(h(1), &sp(b"a"));
        tally.add(h(1), &sp(b"a"));
        tally.add(h(2), &sp(b"b"));
        assert_eq!(tally.payees.len(), 2);
        assert_eq!(tally.payees[0].vote_count(), 1);
    }

    #[test]
    fn best_payee_breaks_ties_by_insertion_order() {
        let mut tally = BlockPayeeTally::new(100);
        tally.add(h(1), &sp(b"a"));
        tally.add(h(2), &sp(b"b"));
        assert_eq!(tally.best_payee(), Some(&sp(b"a")));
    }

    #[test]
    fn best_payee_picks_strict_majority() {
        let mut tally = BlockPayeeTally::new(100);
        tally.add(h(1), &sp(b"a"));
        tally.add(h(2), &sp(b"b"));
        tally.add(h(3), &sp(b"b"));
        assert_eq!(tally.best_payee(), Some(&sp(b"b")));
    }

    #[test]
    fn required_payment_tolerates_below_threshold() {
        let mut tally = BlockPayeeTally::new(100);
        for i in 0..3 {
            tally.add(h(i), &sp(b"a"));
        }
        let tx = PaymentTx::new(vec![]);
        assert!(tally.contains_required_payment(&tx));
    }

    #[test]
    fn required_payment_enforced_once_threshold_reached() {
        let mut tally = BlockPayeeTally::new(100);
        for i in 0..6 {
            tally.add(h(i), &sp(b"a"));
        }
        let empty_tx = PaymentTx::new(vec![]);
        assert!(!tally.contains_required_payment(&empty_tx));

        let paying_tx = PaymentTx::new(vec![TxOutput::new(1, sp(b"a"))]);
        assert!(tally.contains_required_payment(&paying_tx));
    }
}
