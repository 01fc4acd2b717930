//! Asset ledger: the state of every asset contract the engine can reach.
//!
//! The ledger plays the part of the execution environment's world state.
//! [`AssetLedger::transact`] reproduces its all-or-nothing transaction
//! boundary: the closure runs against staged copies of the books it names,
//! which replace the live books only if the closure returns `Ok`.

use std::collections::HashMap;

use swapup_types::{Address, AssetKind, Result, SwapError};

use crate::fungible::FungibleBook;
use crate::interface::{FungibleAsset, UniqueAsset};
use crate::unique::UniqueBook;

/// Registry of fungible and unique-item contract state.
#[derive(Debug, Clone, Default)]
pub struct AssetLedger {
    fungibles: HashMap<Address, FungibleBook>,
    uniques: HashMap<Address, UniqueBook>,
}

impl AssetLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fungible contract at `contract`.
    pub fn register_fungible(&mut self, contract: Address) -> Result<()> {
        self.ensure_unregistered(contract)?;
        self.fungibles.insert(contract, FungibleBook::new(contract));
        Ok(())
    }

    /// Register a unique-item contract at `contract`.
    pub fn register_unique(&mut self, contract: Address) -> Result<()> {
        self.ensure_unregistered(contract)?;
        self.uniques.insert(contract, UniqueBook::new(contract));
        Ok(())
    }

    fn ensure_unregistered(&self, contract: Address) -> Result<()> {
        if contract.is_zero() {
            return Err(SwapError::Configuration(
                "asset contract must not be the zero address".into(),
            ));
        }
        if self.kind_of(contract).is_some() {
            return Err(SwapError::ContractAlreadyRegistered(contract));
        }
        Ok(())
    }

    /// Capability check: which interface does `contract` expose?
    #[must_use]
    pub fn kind_of(&self, contract: Address) -> Option<AssetKind> {
        if self.fungibles.contains_key(&contract) {
            Some(AssetKind::Fungible)
        } else if self.uniques.contains_key(&contract) {
            Some(AssetKind::Unique)
        } else {
            None
        }
    }

    /// Book of a registered fungible contract.
    pub fn fungible(&self, contract: Address) -> Result<&FungibleBook> {
        self.fungibles
            .get(&contract)
            .ok_or(SwapError::UnknownAssetContract(contract))
    }

    /// Mutable book of a registered fungible contract.
    pub fn fungible_mut(&mut self, contract: Address) -> Result<&mut FungibleBook> {
        self.fungibles
            .get_mut(&contract)
            .ok_or(SwapError::UnknownAssetContract(contract))
    }

    /// Book of a registered unique-item contract.
    pub fn unique(&self, contract: Address) -> Result<&UniqueBook> {
        self.uniques
            .get(&contract)
            .ok_or(SwapError::UnknownAssetContract(contract))
    }

    /// Mutable book of a registered unique-item contract.
    pub fn unique_mut(&mut self, contract: Address) -> Result<&mut UniqueBook> {
        self.uniques
            .get_mut(&contract)
            .ok_or(SwapError::UnknownAssetContract(contract))
    }

    /// Mint fungible units on a registered contract.
    pub fn mint_fungible(&mut self, contract: Address, to: Address, amount: u128) -> Result<()> {
        self.fungible_mut(contract)?.mint(to, amount)
    }

    /// Mint an item on a registered unique-item contract.
    pub fn mint_item(&mut self, contract: Address, to: Address, item_id: u128) -> Result<()> {
        self.unique_mut(contract)?.mint(to, item_id)
    }

    /// Owner-side fungible allowance grant.
    pub fn approve_fungible(
        &mut self,
        contract: Address,
        owner: Address,
        spender: Address,
        amount: u128,
    ) -> Result<()> {
        self.fungible_mut(contract)?.approve(owner, spender, amount);
        Ok(())
    }

    /// Owner-side blanket operator grant on a unique-item contract.
    pub fn approve_operator(
        &mut self,
        contract: Address,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<()> {
        self.unique_mut(contract)?
            .set_approval_for_all(owner, operator, approved);
        Ok(())
    }

    /// Fungible balance, zero for unknown contracts.
    #[must_use]
    pub fn balance_of(&self, contract: Address, owner: Address) -> u128 {
        self.fungibles
            .get(&contract)
            .map_or(0, |book| book.balance_of(owner))
    }

    /// Current owner of an item, `None` for unknown contracts or items.
    #[must_use]
    pub fn owner_of(&self, contract: Address, item_id: u128) -> Option<Address> {
        self.uniques
            .get(&contract)
            .and_then(|book| book.owner_of(item_id))
    }

    /// Total supply of a fungible contract.
    pub fn total_supply(&self, contract: Address) -> Result<u128> {
        Ok(self.fungible(contract)?.total_supply())
    }

    /// Addresses of all registered fungible contracts, sorted.
    #[must_use]
    pub fn fungible_contracts(&self) -> Vec<Address> {
        let mut contracts: Vec<Address> = self.fungibles.keys().copied().collect();
        contracts.sort_unstable();
        contracts
    }

    /// Run `f` against staged copies of the books named in `contracts` and
    /// commit them only on `Ok`.
    ///
    /// Only the named books are copied, and only they are visible inside
    /// `f`: reaching any other contract fails with
    /// [`SwapError::UnknownAssetContract`]. On `Err` the live ledger is
    /// untouched.
    pub fn transact<T, F>(&mut self, contracts: impl IntoIterator<Item = Address>, f: F) -> Result<T>
    where
        F: FnOnce(&mut AssetLedger) -> Result<T>,
    {
        let mut staged = AssetLedger::new();
        for contract in contracts {
            if let Some(book) = self.fungibles.get(&contract) {
                staged.fungibles.entry(contract).or_insert_with(|| book.clone());
            } else if let Some(book) = self.uniques.get(&contract) {
                staged.uniques.entry(contract).or_insert_with(|| book.clone());
            } else {
                return Err(SwapError::UnknownAssetContract(contract));
            }
        }

        let out = f(&mut staged)?;
        // A contract registered inside `f` must not shadow one of the other kind.
        let clash = staged
            .fungibles
            .keys()
            .find(|c| self.uniques.contains_key(*c))
            .or_else(|| staged.uniques.keys().find(|c| self.fungibles.contains_key(*c)));
        if let Some(contract) = clash {
            return Err(SwapError::ContractAlreadyRegistered(*contract));
        }
        self.fungibles.extend(staged.fungibles);
        self.uniques.extend(staged.uniques);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_index(n)
    }

    fn ledger() -> AssetLedger {
        let mut l = AssetLedger::new();
        l.register_fungible(addr(200)).unwrap();
        l.register_unique(addr(100)).unwrap();
        l.mint_fungible(addr(200), addr(2), 1_000).unwrap();
        l.mint_item(addr(100), addr(1), 0).unwrap();
        l
    }

    #[test]
    fn kind_of_reports_registered_kind() {
        let l = ledger();
        assert_eq!(l.kind_of(addr(200)), Some(AssetKind::Fungible));
        assert_eq!(l.kind_of(addr(100)), Some(AssetKind::Unique));
        assert_eq!(l.kind_of(addr(300)), None);
    }

    #[test]
    fn double_registration_rejected() {
        let mut l = ledger();
        let err = l.register_unique(addr(200)).unwrap_err();
        assert!(matches!(err, SwapError::ContractAlreadyRegistered(_)));
        assert!(l.register_fungible(Address::ZERO).is_err());
    }

    #[test]
    fn unknown_contract_lookup_fails() {
        let l = ledger();
        assert!(matches!(
            l.fungible(addr(100)).unwrap_err(),
            SwapError::UnknownAssetContract(_)
        ));
        assert_eq!(l.balance_of(addr(300), addr(2)), 0);
        assert_eq!(l.owner_of(addr(300), 0), None);
    }

    #[test]
    fn transact_commits_on_ok() {
        let mut l = ledger();
        l.transact([addr(200)], |tx| {
            tx.fungible_mut(addr(200))?
                .transfer_from(addr(2), addr(2), addr(3), 10)
        })
        .unwrap();
        assert_eq!(l.balance_of(addr(200), addr(3)), 10);
        assert_eq!(l.owner_of(addr(100), 0), Some(addr(1)));
    }

    #[test]
    fn transact_discards_on_err() {
        let mut l = ledger();
        let err = l
            .transact([addr(200), addr(100)], |tx| {
                tx.fungible_mut(addr(200))?
                    .transfer_from(addr(2), addr(2), addr(3), 10)?;
                tx.unique_mut(addr(100))?
                    .transfer_from(addr(2), addr(2), addr(3), 0)
            })
            .unwrap_err();
        assert!(matches!(err, SwapError::NotItemOwner { .. }));
        assert_eq!(l.balance_of(addr(200), addr(3)), 0);
        assert_eq!(l.balance_of(addr(200), addr(2)), 1_000);
        assert_eq!(l.owner_of(addr(100), 0), Some(addr(1)));
    }

    #[test]
    fn transact_sees_only_named_books() {
        let mut l = ledger();
        let err = l
            .transact([addr(200)], |tx| {
                tx.fungible_mut(addr(200))?
                    .transfer_from(addr(2), addr(2), addr(3), 10)?;
                tx.unique_mut(addr(100))?
                    .transfer_from(addr(1), addr(1), addr(3), 0)
            })
            .unwrap_err();
        assert!(matches!(err, SwapError::UnknownAssetContract(c) if c == addr(100)));
        assert_eq!(l.balance_of(addr(200), addr(3)), 0);
        assert_eq!(l.owner_of(addr(100), 0), Some(addr(1)));
    }

    #[test]
    fn transact_rejects_unregistered_scope() {
        let mut l = ledger();
        let err = l.transact([addr(300)], |_| Ok(())).unwrap_err();
        assert!(matches!(err, SwapError::UnknownAssetContract(_)));
    }

    #[test]
    fn transact_keeps_unnamed_books_live() {
        let mut l = ledger();
        l.transact([addr(100), addr(100)], |tx| {
            tx.unique_mut(addr(100))?
                .transfer_from(addr(1), addr(1), addr(4), 0)
        })
        .unwrap();
        assert_eq!(l.owner_of(addr(100), 0), Some(addr(4)));
        assert_eq!(l.balance_of(addr(200), addr(2)), 1_000);
        assert_eq!(l.fungible_contracts(), vec![addr(200)]);
    }
}
