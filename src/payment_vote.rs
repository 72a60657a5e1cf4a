//! Component A: immutable record of one masternode's vote for a (height, payee)
//! pair (§4.A).
//!
//! Operations: `sign`, `verify_signature`, `hash`. The canonical signing
//! string purposely includes the outpoint short form and ASM-rendered payee
//! script so any observer recomputes identical bytes without depending on a
//! particular serialization format.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::VoteCheckError;
use crate::interfaces::Signer;
use crate::types::{Hash256, Height, Outpoint, ScriptBytes, SignatureBytes};

/// One masternode's claim that `payee` should be paid at `height`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentVote {
    pub voter_outpoint: Outpoint,
    pub height: Height,
    pub payee: ScriptBytes,
    pub signature: SignatureBytes,
    /// Not part of the wire form; set by `VoteStore::admit` once the
    /// validator accepts the vote. Excluded from the hash and from the
    /// signing message.
    #[serde(skip)]
    pub verified: bool,
}

impl PaymentVote {
    /// Builds an unsigned, unverified vote ready for `sign`.
    pub fn new(voter_outpoint: Outpoint, height: Height, payee: ScriptBytes) -> Self {
        Self {
            voter_outpoint,
            height,
            payee,
            signature: Vec::new(),
            verified: false,
        }
    }

    /// `voter_outpoint.short_string() || decimal(height) || script_to_asm(payee)`.
    fn canonical_message(&self) -> Vec<u8> {
        format!(
            "{}{}{}",
            self.voter_outpoint.short_string(),
            self.height,
            self.payee.to_asm_string()
        )
        .into_bytes()
    }

    /// Signs the canonical message with `signer`/`priv_key`, storing the result.
    pub fn sign(
        &mut self,
        signer: &impl Signer,
        priv_key: &[u8],
    ) -> Result<(), crate::error::PaymentsError> {
        let msg = self.canonical_message();
        let sig = signer
            .sign(&msg, priv_key)
            .map_err(|e| crate::error::PaymentsError::SigningFailed(e.to_string()))?;
        self.signature = sig;
        Ok(())
    }

    /// Recomputes the canonical message and verifies it against `signer_pubkey`.
    pub fn verify_signature(
        &self,
        signer: &impl Signer,
        signer_pubkey: &[u8],
    ) -> Result<(), VoteCheckError> {
        let msg = self.canonical_message();
        if signer.verify(signer_pubkey, &msg, &self.signature) {
            Ok(())
        } else {
            Err(VoteCheckError::BadSig)
        }
    }

    /// Stable 32-byte digest over `{voter_outpoint, height, payee, signature}`,
    /// also used as the wire inventory id.
    pub fn hash(&self) -> Hash256 {
        let mut hasher = Sha256::new();
        hasher.update(self.voter_outpoint.txid);
        hasher.update(self.voter_outpoint.index.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.payee.as_slice());
        hasher.update(&self.signature);
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSigner;

    impl Signer for FixedSigner {
        fn sign(
            &self,
            msg: &[u8],
            _priv_key: &[u8],
        ) -> Result<Vec<u8>, crate::interfaces::SigningError> {
            let mut hasher = Sha256::new();
            hasher.update(msg);
            Ok(hasher.finalize().to_vec())
        }

        fn verify(&self, _pubkey: &[u8], msg: &[u8], sig: &[u8]) -> bool {
            let mut hasher = Sha256::new();
            hasher.update(msg);
            hasher.finalize().to_vec() == sig
        }
    }

    fn sample_outpoint() -> Outpoint {
        Outpoint {
            txid: [7u8; 32],
            index: 3,
        }
    }

    #[test]
    fn sign_then_verify_round_trips_for_owning_key() {
        let signer = FixedSigner;
        let mut vote = PaymentVote::new(sample_outpoint(), 1000, ScriptBytes::new(vec![1, 2, 3]));
        vote.sign(&signer, b"priv").unwrap();
        assert!(vote.verify_signature(&signer, b"pub").is_ok());
    }

    #[test]
    fn tampered_signature_fails_verification() {
        let signer = FixedSigner;
        let mut vote = PaymentVote::new(sample_outpoint(), 1000, ScriptBytes::new(vec![1, 2, 3]));
        vote.sign(&signer, b"priv").unwrap();
        vote.signature[0] ^= 0xFF;
        assert_eq!(
            vote.verify_signature(&signer, b"pub").unwrap_err(),
            VoteCheckError::BadSig
        );
    }

    #[test]
    fn hash_changes_with_height() {
        let a = PaymentVote::new(sample_outpoint(), 1000, ScriptBytes::new(vec![1]));
        let b = PaymentVote::new(sample_outpoint(), 1001, ScriptBytes::new(vec![1]));
        assert_ne!(a.hash(), b.hash());
    }
}
