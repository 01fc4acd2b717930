//! # swapup-assets
//!
//! **Asset Transfer Adapter**: the engine's only path to asset state.
//!
//! ## Architecture
//!
//! 1. **Interfaces**: [`FungibleAsset`] and [`UniqueAsset`] mirror the
//!    external contract surfaces (balance/allowance and owner/approval)
//! 2. **Books**: [`FungibleBook`] and [`UniqueBook`] hold one contract's state
//! 3. **AssetLedger**: every registered contract, plus the staged
//!    all-or-nothing [`AssetLedger::transact`] boundary
//! 4. **TransferAdapter**: resolves raw legs by capability lookup, checks
//!    authorization, and moves single legs with the fee split applied
//!
//! The engine never requests authorization on anyone's behalf: owners grant
//! allowances or approvals to the engine address out of band.

pub mod adapter;
pub mod fungible;
pub mod interface;
pub mod ledger;
pub mod unique;

pub use adapter::TransferAdapter;
pub use fungible::{FungibleBook, UNLIMITED_ALLOWANCE};
pub use interface::{FungibleAsset, UniqueAsset};
pub use ledger::AssetLedger;
pub use unique::UniqueBook;
