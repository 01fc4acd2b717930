//! Asset Transfer Adapter.
//!
//! Uniform entry point over both asset kinds:
//! 1. [`TransferAdapter::resolve`] inspects a contract once and tags the leg
//! 2. [`TransferAdapter::check_leg`] verifies balance/ownership and the
//!    engine's authorization without moving anything;
//!    [`TransferAdapter::check_side`] does the same for a whole side, summing
//!    fungible legs per contract
//! 3. [`TransferAdapter::move_asset`] moves one leg, realizing the fee split
//!    for fungible legs inside a single balance-transfer primitive

use std::collections::BTreeMap;

use swapup_types::{
    Address, AssetKind, AssetRef, FeeSplit, LegTransfer, RawAssetRef, Result, SwapError,
};

use crate::interface::{FungibleAsset, UniqueAsset};
use crate::ledger::AssetLedger;

/// Moves legs on behalf of the engine, which acts as spender / operator.
#[derive(Debug, Clone, Copy)]
pub struct TransferAdapter {
    operator: Address,
}

impl TransferAdapter {
    /// Create an adapter acting as `operator` (the engine's address).
    #[must_use]
    pub fn new(operator: Address) -> Self {
        Self { operator }
    }

    /// The engine address owners authorize as spender / operator.
    #[must_use]
    pub fn operator(&self) -> Address {
        self.operator
    }

    /// Resolve a raw leg into its tagged form by probing the contract.
    pub fn resolve(&self, ledger: &AssetLedger, raw: RawAssetRef) -> Result<AssetRef> {
        let kind = ledger
            .kind_of(raw.contract)
            .ok_or(SwapError::UnknownAssetContract(raw.contract))?;
        Ok(raw.with_kind(kind))
    }

    /// Resolve every leg of one side, preserving order.
    pub fn resolve_all(&self, ledger: &AssetLedger, raws: &[RawAssetRef]) -> Result<Vec<AssetRef>> {
        raws.iter().map(|raw| self.resolve(ledger, *raw)).collect()
    }

    /// Resolve `contract` as a fungible leg of `amount`.
    pub fn resolve_fungible(
        &self,
        ledger: &AssetLedger,
        contract: Address,
        amount: u128,
    ) -> Result<AssetRef> {
        match self.resolve(ledger, RawAssetRef::new(contract, amount))? {
            leg @ AssetRef::Fungible { .. } => Ok(leg),
            AssetRef::Unique { .. } => Err(SwapError::WrongAssetKind {
                contract,
                expected: AssetKind::Fungible,
                actual: AssetKind::Unique,
            }),
        }
    }

    /// Check that `from` can give up every leg of one side at once.
    ///
    /// Fungible legs on the same contract are checked against their sum.
    pub fn check_side(&self, ledger: &AssetLedger, from: Address, legs: &[AssetRef]) -> Result<()> {
        let mut totals: BTreeMap<Address, u128> = BTreeMap::new();
        for leg in legs {
            match *leg {
                AssetRef::Fungible { contract, amount } => {
                    let total = totals.entry(contract).or_default();
                    *total = total
                        .checked_add(amount)
                        .ok_or(SwapError::BalanceOverflow { contract })?;
                }
                AssetRef::Unique { .. } => self.check_leg(ledger, from, leg)?,
            }
        }
        for (contract, total) in totals {
            self.check_leg(ledger, from, &AssetRef::fungible(contract, total))?;
        }
        Ok(())
    }

    /// Check that `from` can currently give up `leg` through this adapter.
    pub fn check_leg(&self, ledger: &AssetLedger, from: Address, leg: &AssetRef) -> Result<()> {
        match *leg {
            AssetRef::Fungible { contract, amount } => {
                ledger.fungible(contract)?.check_spend(self.operator, from, amount)
            }
            AssetRef::Unique { contract, item_id } => {
                ledger.unique(contract)?.check_move(self.operator, from, item_id)
            }
        }
    }

    /// Move one leg from `from` to `to`.
    ///
    /// Fungible legs debit `from` by the gross amount once; `to` receives
    /// `split.to_recipient` and `treasury` receives `split.to_treasury` in
    /// the same call. Unique legs move ownership and never carry a fee.
    pub fn move_asset(
        &self,
        ledger: &mut AssetLedger,
        from: Address,
        to: Address,
        leg: &AssetRef,
        split: FeeSplit,
        treasury: Address,
    ) -> Result<LegTransfer> {
        if split.to_recipient.checked_add(split.to_treasury) != Some(split.gross) {
            return Err(SwapError::Internal(format!(
                "fee split does not sum to gross: {} + {} != {}",
                split.to_recipient, split.to_treasury, split.gross
            )));
        }

        match *leg {
            AssetRef::Fungible { contract, amount } => {
                if split.gross != amount {
                    return Err(SwapError::Internal(format!(
                        "fee split gross {} does not match leg amount {amount}",
                        split.gross
                    )));
                }
                let mut credits = vec![(to, split.to_recipient)];
                if split.has_fee() {
                    credits.push((treasury, split.to_treasury));
                }
                ledger
                    .fungible_mut(contract)?
                    .transfer_from_split(self.operator, from, &credits)?;
            }
            AssetRef::Unique { contract, item_id } => {
                if split.has_fee() {
                    return Err(SwapError::Internal(format!(
                        "unique item #{item_id} on {contract} cannot carry a fee"
                    )));
                }
                ledger
                    .unique_mut(contract)?
                    .transfer_from(self.operator, from, to, item_id)?;
            }
        }

        let (credited, fee) = match leg {
            AssetRef::Fungible { .. } => (split.to_recipient, split.to_treasury),
            AssetRef::Unique { .. } => (1, 0),
        };

        tracing::debug!(
            asset = %leg,
            from = %from,
            to = %to,
            credited,
            fee,
            "Leg moved"
        );

        Ok(LegTransfer {
            asset: *leg,
            from,
            to,
            credited,
            fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGINE: u64 = 99;
    const TREASURY: u64 = 5;

    fn addr(n: u64) -> Address {
        Address::from_index(n)
    }

    fn setup() -> (AssetLedger, TransferAdapter) {
        let mut l = AssetLedger::new();
        l.register_fungible(addr(200)).unwrap();
        l.register_unique(addr(100)).unwrap();
        l.fungible_mut(addr(200)).unwrap().mint(addr(2), 1_000).unwrap();
        l.unique_mut(addr(100)).unwrap().mint(addr(1), 0).unwrap();
        (l, TransferAdapter::new(addr(ENGINE)))
    }

    #[test]
    fn resolve_detects_contract_kind() {
        let (l, adapter) = setup();
        let item = adapter.resolve(&l, RawAssetRef::new(addr(100), 0)).unwrap();
        let coin = adapter.resolve(&l, RawAssetRef::new(addr(200), 10)).unwrap();
        assert_eq!(item, AssetRef::unique(addr(100), 0));
        assert_eq!(coin, AssetRef::fungible(addr(200), 10));

        let err = adapter.resolve(&l, RawAssetRef::new(addr(300), 1)).unwrap_err();
        assert!(matches!(err, SwapError::UnknownAssetContract(_)));
    }

    #[test]
    fn check_leg_reports_missing_authorization() {
        let (mut l, adapter) = setup();
        let item = AssetRef::unique(addr(100), 0);
        assert!(matches!(
            adapter.check_leg(&l, addr(1), &item).unwrap_err(),
            SwapError::ItemNotApproved { .. }
        ));
        l.unique_mut(addr(100))
            .unwrap()
            .set_approval_for_all(addr(1), addr(ENGINE), true);
        adapter.check_leg(&l, addr(1), &item).unwrap();
    }

    #[test]
    fn side_check_sums_legs_on_one_contract() {
        let (mut l, adapter) = setup();
        l.fungible_mut(addr(200)).unwrap().approve(addr(2), addr(ENGINE), 1_000);
        let each = AssetRef::fungible(addr(200), 600);
        adapter.check_leg(&l, addr(2), &each).unwrap();

        let err = adapter.check_side(&l, addr(2), &[each, each]).unwrap_err();
        assert!(matches!(
            err,
            SwapError::InsufficientBalance { needed: 1_200, available: 1_000, .. }
        ));
        adapter
            .check_side(&l, addr(2), &[each, AssetRef::fungible(addr(200), 400)])
            .unwrap();
    }

    #[test]
    fn side_check_counts_allowance_once_per_contract() {
        let (mut l, adapter) = setup();
        l.fungible_mut(addr(200)).unwrap().approve(addr(2), addr(ENGINE), 500);
        let leg = AssetRef::fungible(addr(200), 300);
        let err = adapter.check_side(&l, addr(2), &[leg, leg]).unwrap_err();
        assert!(matches!(
            err,
            SwapError::InsufficientAllowance { needed: 600, available: 500, .. }
        ));
    }

    #[test]
    fn resolve_fungible_rejects_items() {
        let (l, adapter) = setup();
        assert_eq!(
            adapter.resolve_fungible(&l, addr(200), 7).unwrap(),
            AssetRef::fungible(addr(200), 7)
        );
        let err = adapter.resolve_fungible(&l, addr(100), 7).unwrap_err();
        assert!(matches!(
            err,
            SwapError::WrongAssetKind { expected: AssetKind::Fungible, .. }
        ));
    }

    #[test]
    fn fungible_move_splits_fee() {
        let (mut l, adapter) = setup();
        l.fungible_mut(addr(200)).unwrap().approve(addr(2), addr(ENGINE), 1_000);
        let leg = AssetRef::fungible(addr(200), 1_000);
        let split = FeeSplit {
            gross: 1_000,
            to_recipient: 980,
            to_treasury: 20,
        };
        let moved = adapter
            .move_asset(&mut l, addr(2), addr(1), &leg, split, addr(TREASURY))
            .unwrap();
        assert_eq!(moved.credited, 980);
        assert_eq!(moved.fee, 20);
        assert_eq!(l.balance_of(addr(200), addr(1)), 980);
        assert_eq!(l.balance_of(addr(200), addr(TREASURY)), 20);
        assert_eq!(l.balance_of(addr(200), addr(2)), 0);
    }

    #[test]
    fn unique_move_transfers_ownership() {
        let (mut l, adapter) = setup();
        l.unique_mut(addr(100))
            .unwrap()
            .approve(addr(1), 0, addr(ENGINE))
            .unwrap();
        let leg = AssetRef::unique(addr(100), 0);
        let moved = adapter
            .move_asset(&mut l, addr(1), addr(2), &leg, FeeSplit::fee_free(0), addr(TREASURY))
            .unwrap();
        assert_eq!(moved.fee, 0);
        assert_eq!(l.owner_of(addr(100), 0), Some(addr(2)));
    }

    #[test]
    fn inconsistent_split_rejected() {
        let (mut l, adapter) = setup();
        l.fungible_mut(addr(200)).unwrap().approve(addr(2), addr(ENGINE), 1_000);
        let leg = AssetRef::fungible(addr(200), 1_000);
        let split = FeeSplit {
            gross: 1_000,
            to_recipient: 990,
            to_treasury: 20,
        };
        let err = adapter
            .move_asset(&mut l, addr(2), addr(1), &leg, split, addr(TREASURY))
            .unwrap_err();
        assert!(matches!(err, SwapError::Internal(_)));
        assert_eq!(l.balance_of(addr(200), addr(2)), 1_000);
    }
}
