//! # swapup-types
//!
//! Shared types, errors, and configuration for the **SwapUp** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`Address`], [`ProposalId`], [`Fingerprint`]
//! - **Asset model**: [`RawAssetRef`], [`AssetRef`], [`AssetKind`]
//! - **Proposal model**: [`SwapRequest`], [`SwapProposal`], [`Visibility`], [`ProposalStatus`]
//! - **Fee model**: [`FeeTier`], [`FeeTiers`], [`FeeSplit`]
//! - **Receipts**: [`SettlementReceipt`], [`LegTransfer`], [`SwapEvent`]
//! - **Configuration**: [`EngineConfig`], [`OracleConfig`], [`MatchStrictness`], [`TierPolicyConfig`]
//! - **Errors**: [`SwapError`] with `SU_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod fee;
pub mod ids;
pub mod proposal;
pub mod receipt;

pub use asset::*;
pub use config::*;
pub use error::*;
pub use fee::*;
pub use ids::*;
pub use proposal::*;
pub use receipt::*;

// Constants are accessed via `swapup_types::constants::FOO`.
