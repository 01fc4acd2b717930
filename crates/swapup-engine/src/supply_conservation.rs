//! Supply conservation check around a settlement.
//!
//! A settlement only moves value between holders. For every contract it
//! touches:
//!
//! ```text
//! fungible: total_supply(after) == total_supply(before)
//!           Σ balances(after)   == total_supply(after)
//! unique:   item_count(after)   == item_count(before)
//! ```
//!
//! The check runs inside the staged transaction, so a violation aborts the
//! settlement like any other leg failure.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use swapup_assets::AssetLedger;
use swapup_types::{Address, AssetRef, Result, SwapError};

/// Supply figures of the contracts one settlement touches, taken before any
/// leg moves.
#[derive(Debug, Clone, Default)]
pub struct SupplySnapshot {
    fungible: BTreeMap<Address, u128>,
    unique: BTreeMap<Address, usize>,
}

impl SupplySnapshot {
    /// Snapshot every contract referenced by `legs`.
    pub fn capture<'a>(
        ledger: &AssetLedger,
        legs: impl IntoIterator<Item = &'a AssetRef>,
    ) -> Result<Self> {
        let mut snap = Self::default();
        for leg in legs {
            match *leg {
                AssetRef::Fungible { contract, .. } => {
                    if let Entry::Vacant(slot) = snap.fungible.entry(contract) {
                        slot.insert(ledger.total_supply(contract)?);
                    }
                }
                AssetRef::Unique { contract, .. } => {
                    if let Entry::Vacant(slot) = snap.unique.entry(contract) {
                        slot.insert(ledger.unique(contract)?.item_count());
                    }
                }
            }
        }
        Ok(snap)
    }

    /// Number of contracts covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fungible.len() + self.unique.len()
    }

    /// Whether the snapshot covers no contract.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verify `ledger` against the snapshot.
    ///
    /// # Errors
    /// Returns [`SwapError::SupplyInvariantViolation`] on the first contract
    /// whose supply changed or whose balances no longer sum to its supply.
    pub fn verify(&self, ledger: &AssetLedger) -> Result<()> {
        for (&contract, &before) in &self.fungible {
            let book = ledger.fungible(contract)?;
            let after = ledger.total_supply(contract)?;
            if after != before {
                return Err(SwapError::SupplyInvariantViolation {
                    reason: format!("{contract}: total supply {before} -> {after}"),
                });
            }
            let held = book.sum_of_balances();
            if held != after {
                return Err(SwapError::SupplyInvariantViolation {
                    reason: format!("{contract}: balances sum to {held}, supply is {after}"),
                });
            }
        }
        for (&contract, &before) in &self.unique {
            let after = ledger.unique(contract)?.item_count();
            if after != before {
                return Err(SwapError::SupplyInvariantViolation {
                    reason: format!("{contract}: item count {before} -> {after}"),
                });
            }
        }
        Ok(())
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
        l.mint_fungible(addr(200), addr(1), 1_000).unwrap();
        l.mint_item(addr(100), addr(2), 7).unwrap();
        l
    }

    fn legs() -> Vec<AssetRef> {
        vec![
            AssetRef::fungible(addr(200), 10),
            AssetRef::fungible(addr(200), 20),
            AssetRef::unique(addr(100), 7),
        ]
    }

    #[test]
    fn snapshot_deduplicates_contracts() {
        let snap = SupplySnapshot::capture(&ledger(), &legs()).unwrap();
        assert_eq!(snap.len(), 2);
        assert!(!snap.is_empty());
    }

    #[test]
    fn unchanged_ledger_verifies() {
        let l = ledger();
        let snap = SupplySnapshot::capture(&l, &legs()).unwrap();
        assert!(snap.verify(&l).is_ok());
    }

    #[test]
    fn minted_value_detected() {
        let mut l = ledger();
        let snap = SupplySnapshot::capture(&l, &legs()).unwrap();
        l.mint_fungible(addr(200), addr(3), 1).unwrap();
        let err = snap.verify(&l).unwrap_err();
        assert!(matches!(err, SwapError::SupplyInvariantViolation { .. }));
    }

    #[test]
    fn minted_item_detected() {
        let mut l = ledger();
        let snap = SupplySnapshot::capture(&l, &legs()).unwrap();
        l.mint_item(addr(100), addr(3), 8).unwrap();
        assert!(snap.verify(&l).is_err());
    }

    #[test]
    fn unknown_contract_rejected_at_capture() {
        let err = SupplySnapshot::capture(&ledger(), &[AssetRef::fungible(addr(300), 1)])
            .unwrap_err();
        assert!(matches!(err, SwapError::UnknownAssetContract(_)));
    }
}
