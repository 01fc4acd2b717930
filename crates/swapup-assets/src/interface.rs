//! The two asset interfaces the engine consumes.
//!
//! These mirror the external contract surfaces: balance/allowance based
//! fungible assets and owner/approval based unique items. The engine only
//! ever talks to assets through these traits.

use swapup_types::{Address, Result};

/// Balance-based asset interface.
pub trait FungibleAsset {
    /// Address of the asset contract.
    fn contract(&self) -> Address;

    fn balance_of(&self, owner: Address) -> u128;

    fn allowance(&self, owner: Address, spender: Address) -> u128;

    fn total_supply(&self) -> u128;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    fn transfer_from(&mut self, spender: Address, from: Address, to: Address, amount: u128)
    -> Result<()>;

    /// Debit `from` once and credit every `(recipient, amount)` pair in the
    /// same call. The allowance is consumed once, for the total.
    fn transfer_from_split(
        &mut self,
        spender: Address,
        from: Address,
        credits: &[(Address, u128)],
    ) -> Result<()>;
}

/// Ownership-based asset interface.
pub trait UniqueAsset {
    /// Address of the asset contract.
    fn contract(&self) -> Address;

    fn owner_of(&self, item_id: u128) -> Option<Address>;

    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool;

    fn get_approved(&self, item_id: u128) -> Option<Address>;

    /// Move `item_id` from `from` to `to` on behalf of `operator`.
    /// Clears any per-item approval.
    fn transfer_from(&mut self, operator: Address, from: Address, to: Address, item_id: u128)
    -> Result<()>;
}
