//! Unique-item book: ownership and approvals of one item contract.

use std::collections::{HashMap, HashSet};

use swapup_types::{Address, Result, SwapError};

use crate::interface::UniqueAsset;

/// State of a single unique-item contract.
#[derive(Debug, Clone, Default)]
pub struct UniqueBook {
    contract: Address,
    owners: HashMap<u128, Address>,
    /// `(owner, operator)` pairs with blanket approval.
    operators: HashSet<(Address, Address)>,
    /// Per-item approved address.
    approvals: HashMap<u128, Address>,
}

impl UniqueBook {
    /// Empty book for `contract`.
    #[must_use]
    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            ..Self::default()
        }
    }

    /// Create `item_id` owned by `to`.
    pub fn mint(&mut self, to: Address, item_id: u128) -> Result<()> {
        if to.is_zero() {
            return Err(SwapError::TransferToZeroAddress {
                contract: self.contract,
            });
        }
        if self.owners.contains_key(&item_id) {
            return Err(SwapError::ItemAlreadyExists {
                contract: self.contract,
                item_id,
            });
        }
        self.owners.insert(item_id, to);
        Ok(())
    }

    /// Grant or revoke blanket operator approval.
    pub fn set_approval_for_all(&mut self, owner: Address, operator: Address, approved: bool) {
        if approved {
            self.operators.insert((owner, operator));
        } else {
            self.operators.remove(&(owner, operator));
        }
    }

    /// Approve `approved` for one item. Only the current owner may call.
    pub fn approve(&mut self, caller: Address, item_id: u128, approved: Address) -> Result<()> {
        let owner = self.owner_of(item_id);
        if owner != Some(caller) {
            return Err(SwapError::NotItemOwner {
                contract: self.contract,
                item_id,
                expected: caller,
                actual: owner,
            });
        }
        self.approvals.insert(item_id, approved);
        Ok(())
    }

    /// Verify that `operator` may move `item_id` out of `from` right now.
    pub fn check_move(&self, operator: Address, from: Address, item_id: u128) -> Result<()> {
        let owner = self.owner_of(item_id);
        if owner != Some(from) {
            return Err(SwapError::NotItemOwner {
                contract: self.contract,
                item_id,
                expected: from,
                actual: owner,
            });
        }
        let authorized = operator == from
            || self.is_approved_for_all(from, operator)
            || self.get_approved(item_id) == Some(operator);
        if !authorized {
            return Err(SwapError::ItemNotApproved {
                contract: self.contract,
                item_id,
                owner: from,
                operator,
            });
        }
        Ok(())
    }

    /// Number of minted items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.owners.len()
    }
}

impl UniqueAsset for UniqueBook {
    fn contract(&self) -> Address {
        self.contract
    }

    fn owner_of(&self, item_id: u128) -> Option<Address> {
        self.owners.get(&item_id).copied()
    }

    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.operators.contains(&(owner, operator))
    }

    fn get_approved(&self, item_id: u128) -> Option<Address> {
        self.approvals.get(&item_id).copied()
    }

    fn transfer_from(
        &mut self,
        operator: Address,
        from: Address,
        to: Address,
        item_id: u128,
    ) -> Result<()> {
        if to.is_zero() {
            return Err(SwapError::TransferToZeroAddress {
                contract: self.contract,
            });
        }
        self.check_move(operator, from, item_id)?;
        self.approvals.remove(&item_id);
        self.owners.insert(item_id, to);
        Ok(())
    }
}
