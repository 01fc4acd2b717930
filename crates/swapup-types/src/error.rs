//! Error types for the SwapUp settlement engine.
//!
//! All errors use the `SU_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Proposal errors (malformed input, matching)
//! - 2xx: Asset / authorization errors
//! - 3xx: Fee errors
//! - 4xx: Access control errors
//! - 5xx: Settlement errors
//! - 6xx: Oracle errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Address, AssetKind, AssetRef, Fingerprint, ProposalId, ProposalStatus};

/// Central error enum for all SwapUp operations.
#[derive(Debug, Error)]
pub enum SwapError {
    // =================================================================
    // Proposal Errors (1xx)
    // =================================================================
    /// One side of the proposal lists no assets.
    #[error("SU_ERR_100: Empty asset list: {side} must not be empty")]
    EmptyAssetList { side: &'static str },

    /// Initiator and counterparty are the same address.
    #[error("SU_ERR_101: Self-swap rejected: initiator and counterparty are both {0}")]
    SelfSwap(Address),

    /// One side of the proposal exceeds the leg limit.
    #[error("SU_ERR_102: Too many legs in {side}: {count} > {max}")]
    TooManyLegs {
        side: &'static str,
        count: usize,
        max: usize,
    },

    /// The advisory label exceeds the length limit.
    #[error("SU_ERR_103: Label too long: {len} bytes > {max}")]
    LabelTooLong { len: usize, max: usize },

    /// No open proposal carries this fingerprint.
    #[error("SU_ERR_104: No open proposal for {0}")]
    ProposalNotFound(Fingerprint),

    /// The proposal is not in the OPEN state.
    #[error("SU_ERR_105: Proposal {id} is {status}, not OPEN")]
    ProposalNotOpen {
        id: ProposalId,
        status: ProposalStatus,
    },

    /// The initiator tried to confirm their own proposal.
    #[error("SU_ERR_106: Initiator {0} cannot confirm their own proposal")]
    InitiatorCannotConfirm(Address),

    /// Strict matching rejected a label / counterparty / visibility mismatch.
    #[error("SU_ERR_107: Confirmation does not match proposal: {reason}")]
    ProposalMismatch { reason: String },

    /// A party address is unusable (e.g. the zero address).
    #[error("SU_ERR_108: Invalid party: {reason}")]
    InvalidParty { reason: String },

    /// The same item, or the same fungible contract, appears twice on one side.
    #[error("SU_ERR_109: Duplicate leg in {side}: {leg}")]
    DuplicateLeg { side: &'static str, leg: AssetRef },

    // =================================================================
    // Asset / Authorization Errors (2xx)
    // =================================================================
    /// The referenced contract exposes neither asset interface.
    #[error("SU_ERR_200: Unknown asset contract: {0}")]
    UnknownAssetContract(Address),

    /// The sender's fungible balance is too low.
    #[error(
        "SU_ERR_201: Insufficient balance on {contract} for {owner}: need {needed}, have {available}"
    )]
    InsufficientBalance {
        contract: Address,
        owner: Address,
        needed: u128,
        available: u128,
    },

    /// The engine's fungible allowance is too low.
    #[error(
        "SU_ERR_202: Insufficient allowance on {contract}: {owner} granted {spender} {available}, need {needed}"
    )]
    InsufficientAllowance {
        contract: Address,
        owner: Address,
        spender: Address,
        needed: u128,
        available: u128,
    },

    /// The sender does not own the referenced item.
    #[error("SU_ERR_203: Item #{item_id} on {contract} is not owned by {expected} (owner: {actual:?})")]
    NotItemOwner {
        contract: Address,
        item_id: u128,
        expected: Address,
        actual: Option<Address>,
    },

    /// The engine is neither operator nor per-item approved.
    #[error("SU_ERR_204: {operator} is not approved for item #{item_id} on {contract} owned by {owner}")]
    ItemNotApproved {
        contract: Address,
        item_id: u128,
        owner: Address,
        operator: Address,
    },

    /// A contract with this address is already registered.
    #[error("SU_ERR_205: Asset contract already registered: {0}")]
    ContractAlreadyRegistered(Address),

    /// Minting an item id that already exists.
    #[error("SU_ERR_206: Item #{item_id} already exists on {contract}")]
    ItemAlreadyExists { contract: Address, item_id: u128 },

    /// A credit would overflow the recipient balance or total supply.
    #[error("SU_ERR_207: Balance overflow on {contract}")]
    BalanceOverflow { contract: Address },

    /// Transfers to the zero address are rejected.
    #[error("SU_ERR_208: Transfer to the zero address on {contract}")]
    TransferToZeroAddress { contract: Address },

    /// The contract exposes the other asset interface.
    #[error("SU_ERR_209: {contract} is a {actual} asset, expected {expected}")]
    WrongAssetKind {
        contract: Address,
        expected: AssetKind,
        actual: AssetKind,
    },

    // =================================================================
    // Fee Errors (3xx)
    // =================================================================
    /// The active tier yields a fee larger than the leg.
    #[error("SU_ERR_300: Fee {fee} exceeds leg amount {amount} at {bps} bps")]
    FeeExceedsLeg { fee: u128, amount: u128, bps: u64 },

    /// `amount * bps` overflowed.
    #[error("SU_ERR_301: Fee arithmetic overflow: {amount} * {bps} bps")]
    FeeOverflow { amount: u128, bps: u64 },

    // =================================================================
    // Access Control Errors (4xx)
    // =================================================================
    /// A privileged setter was called by someone other than the owner.
    #[error("SU_ERR_400: Caller {caller} is not the owner")]
    NotOwner { caller: Address },

    /// A direct transfer was requested by someone other than the sender.
    #[error("SU_ERR_401: {caller} may not transfer on behalf of {from}")]
    TransferNotAuthorized { caller: Address, from: Address },

    // =================================================================
    // Settlement Errors (5xx)
    // =================================================================
    /// A private proposal was confirmed by someone other than its counterparty.
    #[error("SU_ERR_500: Visibility violation: {confirmer} may not confirm a proposal reserved for {counterparty}")]
    VisibilityViolation {
        confirmer: Address,
        counterparty: Address,
    },

    /// Supply conservation invariant violated.
    #[error("SU_ERR_503: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Oracle Errors (6xx)
    // =================================================================
    /// The feed could not be read.
    #[error("SU_ERR_600: Oracle unavailable: {reason}")]
    OracleUnavailable { reason: String },

    /// The latest round is older than the staleness bound.
    #[error("SU_ERR_601: Oracle answer stale: {age_secs}s old, max {max_secs}s")]
    OracleStale { age_secs: i64, max_secs: i64 },

    /// The feed returned a non-positive answer.
    #[error("SU_ERR_602: Oracle returned invalid answer {0}")]
    OracleInvalidAnswer(i128),

    /// The latest round is timestamped after the read.
    #[error("SU_ERR_603: Oracle round is {ahead_secs}s in the future")]
    OracleRoundInFuture { ahead_secs: i64 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SU_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SU_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("SU_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl SwapError {
    /// Whether the error was raised while checking or moving assets.
    ///
    /// These are the failures a caller fixes by granting authorization or
    /// topping up balances before resubmitting.
    #[must_use]
    pub fn is_asset_precondition(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. }
                | Self::InsufficientAllowance { .. }
                | Self::NotItemOwner { .. }
                | Self::ItemNotApproved { .. }
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SwapError>;

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
