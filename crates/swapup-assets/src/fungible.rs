//! Fungible asset book: balances and allowances of one contract.
//!
//! All mutations validate first and then apply, so a failed call leaves the
//! book unchanged.

use std::collections::HashMap;

use swapup_types::{Address, Result, SwapError};

use crate::interface::FungibleAsset;

/// Allowance value treated as unlimited: never decremented.
pub const UNLIMITED_ALLOWANCE: u128 = u128::MAX;

/// State of a single fungible contract.
#[derive(Debug, Clone, Default)]
pub struct FungibleBook {
    contract: Address,
    balances: HashMap<Address, u128>,
    /// `(owner, spender) -> remaining allowance`.
    allowances: HashMap<(Address, Address), u128>,
    total_supply: u128,
}

impl FungibleBook {
    /// Empty book for `contract`.
    #[must_use]
    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            ..Self::default()
        }
    }

    /// Create `amount` new units for `to`.
    pub fn mint(&mut self, to: Address, amount: u128) -> Result<()> {
        if to.is_zero() {
            return Err(SwapError::TransferToZeroAddress {
                contract: self.contract,
            });
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(SwapError::BalanceOverflow {
                contract: self.contract,
            })?;
        // Bounded by total supply, cannot overflow once supply didn't.
        *self.balances.entry(to).or_default() += amount;
        self.total_supply = supply;
        Ok(())
    }

    /// Set `spender`'s allowance over `owner`'s balance.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: u128) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    /// Verify that `spender` may move `amount` out of `from` right now.
    pub fn check_spend(&self, spender: Address, from: Address, amount: u128) -> Result<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(SwapError::InsufficientBalance {
                contract: self.contract,
                owner: from,
                needed: amount,
                available,
            });
        }
        if spender != from {
            let allowed = self.allowance(from, spender);
            if allowed < amount {
                return Err(SwapError::InsufficientAllowance {
                    contract: self.contract,
                    owner: from,
                    spender,
                    needed: amount,
                    available: allowed,
                });
            }
        }
        Ok(())
    }

    /// Sum of all balances. Equals `total_supply` unless the book is corrupt.
    #[must_use]
    pub fn sum_of_balances(&self) -> u128 {
        self.balances.values().fold(0u128, |acc, b| acc.saturating_add(*b))
    }
}

impl FungibleAsset for FungibleBook {
    fn contract(&self) -> Address {
        self.contract
    }

    fn balance_of(&self, owner: Address) -> u128 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<()> {
        self.transfer_from_split(spender, from, &[(to, amount)])
    }

    fn transfer_from_split(
        &mut self,
        spender: Address,
        from: Address,
        credits: &[(Address, u128)],
    ) -> Result<()> {
        let mut total: u128 = 0;
        for (to, amount) in credits {
            if to.is_zero() {
                return Err(SwapError::TransferToZeroAddress {
                    contract: self.contract,
                });
            }
            total = total.checked_add(*amount).ok_or(SwapError::BalanceOverflow {
                contract: self.contract,
            })?;
        }
        self.check_spend(spender, from, total)?;

        if spender != from {
            let allowed = self.allowance(from, spender);
            if allowed != UNLIMITED_ALLOWANCE {
                self.approve(from, spender, allowed - total);
            }
        }

        let entry = self.balances.entry(from).or_default();
        *entry -= total;
        if *entry == 0 {
            self.balances.remove(&from);
        }
        // Balances sum to total_supply <= u128::MAX, so credits cannot overflow.
        for (to, amount) in credits {
            if *amount > 0 {
                *self.balances.entry(*to).or_default() += amount;
            }
        }
        Ok(())
    }
}
