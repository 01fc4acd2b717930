//! Access control: a single owner fixed at construction.
//!
//! The owner may change fee tiers. Everything else in the engine is
//! permissionless.

use swapup_types::{Address, Result, SwapError};

/// Owner gate for privileged setters.
#[derive(Debug, Clone, Copy)]
pub struct AdminControl {
    owner: Address,
}

impl AdminControl {
    /// Gate owned by `owner`.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// The only address allowed through the gate.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Returns `Ok(())` if `caller` is the owner,
    /// or [`SwapError::NotOwner`] otherwise.
    pub fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller == self.owner {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, "Privileged call rejected: not owner");
            Err(SwapError::NotOwner { caller })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes() {
        let admin = AdminControl::new(Address::from_index(0));
        assert!(admin.ensure_owner(Address::from_index(0)).is_ok());
        assert_eq!(admin.owner(), Address::from_index(0));
    }

    #[test]
    fn non_owner_rejected() {
        let admin = AdminControl::new(Address::from_index(0));
        let err = admin.ensure_owner(Address::from_index(1)).unwrap_err();
        assert!(matches!(err, SwapError::NotOwner { caller } if caller == Address::from_index(1)));
    }
}
