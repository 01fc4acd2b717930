//! Fee Schedule: current tiers, treasury destination, and per-leg splits.
//!
//! ```text
//! fee       = floor(amount * tier_bps / 10_000)
//! recipient = amount - fee
//! ```
//!
//! Unique-item legs never pay a fee. A tier that would make the fee exceed
//! the leg, or overflow the multiplication, is an error, not a clamp.

use swapup_types::{
    constants::BPS_DENOMINATOR, Address, AssetRef, FeeSplit, FeeTier, FeeTiers, Result, SwapError,
};

/// Tier set plus the fixed treasury.
#[derive(Debug, Clone)]
pub struct FeeSchedule {
    tiers: FeeTiers,
    treasury: Address,
}

impl FeeSchedule {
    /// Schedule paying every fee to `treasury`.
    #[must_use]
    pub fn new(tiers: FeeTiers, treasury: Address) -> Self {
        Self { tiers, treasury }
    }

    /// Current tier set.
    #[must_use]
    pub fn tiers(&self) -> FeeTiers {
        self.tiers
    }

    /// Destination of every collected fee.
    #[must_use]
    pub fn treasury(&self) -> Address {
        self.treasury
    }

    /// Replace one tier, returning the previous value.
    ///
    /// Callers gate this through [`AdminControl`](crate::AdminControl).
    /// No upper bound is enforced here; an oversized tier fails at
    /// settlement time instead.
    pub fn set_tier(&mut self, tier: FeeTier, bps: u64) -> u64 {
        let old = self.tiers.bps(tier);
        self.tiers.set(tier, bps);
        old
    }

    /// Split one leg under the given tier.
    pub fn compute_fee(&self, leg: &AssetRef, tier: FeeTier) -> Result<FeeSplit> {
        match *leg {
            AssetRef::Unique { item_id, .. } => Ok(FeeSplit::fee_free(item_id)),
            AssetRef::Fungible { amount, .. } => split_amount(amount, self.tiers.bps(tier)),
        }
    }
}

/// Integer fee split of `amount` at `bps`, truncating toward zero.
pub fn split_amount(amount: u128, bps: u64) -> Result<FeeSplit> {
    let fee = amount
        .checked_mul(u128::from(bps))
        .ok_or(SwapError::FeeOverflow { amount, bps })?
        / BPS_DENOMINATOR;
    if fee > amount {
        return Err(SwapError::FeeExceedsLeg { fee, amount, bps });
    }
    Ok(FeeSplit {
        gross: amount,
        to_recipient: amount - fee,
        to_treasury: fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

    fn schedule() -> FeeSchedule {
        FeeSchedule::new(FeeTiers::default(), Address::from_index(5))
    }

    #[test]
    fn elevated_tier_on_ten_tokens() {
        let leg = AssetRef::fungible(Address::from_index(200), 10 * ONE_TOKEN);
        let split = schedule().compute_fee(&leg, FeeTier::ElevatedCurrency).unwrap();
        assert_eq!(split.to_treasury, ONE_TOKEN / 5); // 0.2
        assert_eq!(split.to_recipient, 98 * ONE_TOKEN / 10); // 9.8
    }

    #[test]
    fn unique_leg_is_fee_free() {
        let leg = AssetRef::unique(Address::from_index(100), 4);
        let split = schedule().compute_fee(&leg, FeeTier::ElevatedCurrency).unwrap();
        assert!(!split.has_fee());
    }

    #[test]
    fn truncates_toward_zero() {
        // 99 * 100 / 10_000 = 0.99 -> 0
        let split = split_amount(99, 100).unwrap();
        assert_eq!(split.to_treasury, 0);
        assert_eq!(split.to_recipient, 99);

        // 12_345 * 200 / 10_000 = 246.9 -> 246
        let split = split_amount(12_345, 200).unwrap();
        assert_eq!(split.to_treasury, 246);
        assert_eq!(split.to_recipient, 12_099);
    }

    #[test]
    fn conservation_holds_over_range() {
        for amount in [0u128, 1, 7, 10_000, 999_999, u128::from(u64::MAX)] {
            for bps in [0u64, 1, 100, 200, 9_999, 10_000] {
                let split = split_amount(amount, bps).unwrap();
                assert_eq!(split.to_recipient + split.to_treasury, amount);
                assert_eq!(split.to_treasury, amount * u128::from(bps) / 10_000);
            }
        }
    }

    #[test]
    fn full_tier_takes_everything() {
        let split = split_amount(500, 10_000).unwrap();
        assert_eq!(split.to_treasury, 500);
        assert_eq!(split.to_recipient, 0);
    }

    #[test]
    fn tier_above_denominator_rejected() {
        let err = split_amount(10_000, 10_001).unwrap_err();
        assert!(matches!(
            err,
            SwapError::FeeExceedsLeg {
                fee: 10_001,
                amount: 10_000,
                bps: 10_001
            }
        ));
    }

    #[test]
    fn multiplication_overflow_rejected() {
        let err = split_amount(u128::MAX, 2).unwrap_err();
        assert!(matches!(err, SwapError::FeeOverflow { .. }));
    }

    #[test]
    fn set_tier_returns_previous() {
        let mut s = schedule();
        assert_eq!(s.set_tier(FeeTier::Base, 300), 100);
        assert_eq!(s.tiers().base_fee_bps, 300);
        assert_eq!(s.treasury(), Address::from_index(5));
    }
}
