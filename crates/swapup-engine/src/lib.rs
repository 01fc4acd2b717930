//! # swapup-engine
//!
//! Proposal matching and atomic settlement for **SwapUp**.
//!
//! ## Flow
//!
//! ```text
//! caller A ──approve_and_swap──▶ ProposalRegistry (OPEN, keyed by fingerprint)
//! caller B ──approve_and_swap──▶ ProposalRegistry::check_confirmation
//!                                        │
//!                                        ▼
//!                                  SwapSettler::settle
//!                                   ├─ TierPolicy + FeeSchedule (splits)
//!                                   ├─ AssetLedger::transact
//!                                   │    └─ TransferAdapter::move_asset × legs
//!                                   ├─ SupplySnapshot::verify
//!                                   └─ OracleAdapter (fee valuation, optional)
//!                                        │
//!                                        ▼
//!                                  SettlementReceipt + SwapEvent::Settled
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: the [`SwapEngine`] facade
//! - [`registry`]: open proposals and confirmation checks
//! - [`settlement`]: the atomic settlement orchestrator
//! - [`fee_schedule`]: tiers, treasury, per-leg fee splits
//! - [`tier_policy`]: which tier applies to a settlement
//! - [`admin`]: owner gate for the fee setters
//! - [`oracle`]: read-only price feed adapter
//! - [`supply_conservation`]: value-conservation check per settlement

pub mod admin;
pub mod engine;
pub mod fee_schedule;
pub mod oracle;
pub mod registry;
pub mod settlement;
pub mod supply_conservation;
pub mod tier_policy;

pub use admin::AdminControl;
pub use engine::{SwapEngine, SwapOutcome};
pub use fee_schedule::{split_amount, FeeSchedule};
#[cfg(any(test, feature = "test-helpers"))]
pub use oracle::StaticPriceFeed;
pub use oracle::{OracleAdapter, PriceFeed, PriceRound};
pub use registry::ProposalRegistry;
pub use settlement::{legs_conserve_value, SwapSettler};
pub use supply_conservation::SupplySnapshot;
pub use tier_policy::{FixedTier, SwapShape, SwapShapePolicy, TierPolicy};
