//! Error types for the masternode payment voting subsystem.
//!
//! Mirrors §7 of the specification: every check returns a typed, non-panicking
//! outcome instead of propagating across module boundaries as an exception.

use thiserror::Error;

/// Errors surfaced by [`crate::vote_validator::VoteValidator`].
///
/// Each variant carries the policy consequence from §7's table in its doc
/// comment rather than in a side lookup table, so the policy travels with the
/// error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoteCheckError {
    /// Voter outpoint is not known to the registry. Drop; ask registry. Never ban.
    #[error("unknown voter outpoint")]
    UnknownVoter,

    /// Voter's protocol version is below the minimum required for this vote's height.
    /// Drop; no ban.
    #[error("masternode protocol version too old")]
    StaleProtocol,

    /// Voter's rank at the reference height exceeds `SIGS_TOTAL` (or rank was
    /// unavailable). Drop; ban weight 20 only when rank > 2*SIGS_TOTAL, the
    /// vote targets a future height, and the voter is not the legacy sentinel.
    #[error("masternode rank out of bounds")]
    BadRank,

    /// Signature did not verify against the voter's signing key. Drop; ban
    /// weight 20 only when fully synced and the vote targets a future height.
    #[error("bad payment vote signature")]
    BadSig,

    /// Vote height falls outside `[cached_tip - storage_limit, cached_tip + FUTURE_WINDOW]`.
    /// Drop; no ban.
    #[error("vote height out of admission window")]
    OutOfWindow,

    /// A vote with this hash has already been admitted. Drop silently.
    #[error("duplicate vote")]
    DuplicateVote,
}

/// Errors surfaced by [`crate::message_handler::MessageHandler`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Peer already fulfilled a sync request within the TTL window. Ban weight 20.
    #[error("duplicate sync request from peer")]
    DuplicateSyncRequest,

    /// Peer is not yet synced enough for us to answer with a sync response.
    #[error("sync requested before node finished syncing")]
    NotSynced,
}

/// Errors surfaced by [`crate::block_shaper::BlockShaper::validate_payments`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockPaymentError {
    /// `actual_reward` exceeded `expected_reward`. Reject the block.
    #[error("coinbase pays too much: actual={actual} exceeds limit={expected}")]
    OverpaidBlock { actual: u64, expected: u64 },

    /// No output in the candidate transaction paid a payee with enough votes,
    /// and payment enforcement is active. Reject the block.
    #[error("missing required masternode payment at height {height}")]
    MissingRequiredPayment { height: i64 },
}

/// Top-level error type for the subsystem's public API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentsError {
    #[error("vote rejected: {0}")]
    Vote(#[from] VoteCheckError),

    #[error("message handling failed: {0}")]
    Message(#[from] MessageError),

    #[error("block payment validation failed: {0}")]
    BlockPayment(#[from] BlockPaymentError),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("configuration error: {0}")]
    Config(String),
}
