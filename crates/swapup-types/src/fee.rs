//! Fee tier types.
//!
//! Tiers are expressed in basis points against
//! [`BPS_DENOMINATOR`](crate::constants::BPS_DENOMINATOR).

use serde::{Deserialize, Serialize};

use crate::{constants, Result, SwapError};

/// Names one of the three configurable tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeTier {
    Base,
    Currency,
    ElevatedCurrency,
}

impl std::fmt::Display for FeeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "BASE"),
            Self::Currency => write!(f, "CURRENCY"),
            Self::ElevatedCurrency => write!(f, "ELEVATED_CURRENCY"),
        }
    }
}

/// The current tier set. Owner-mutable; read at settlement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTiers {
    pub base_fee_bps: u64,
    pub currency_fee_bps: u64,
    pub elevated_currency_fee_bps: u64,
}

impl FeeTiers {
    /// Tiers in basis points.
    #[must_use]
    pub fn new(base_fee_bps: u64, currency_fee_bps: u64, elevated_currency_fee_bps: u64) -> Self {
        Self {
            base_fee_bps,
            currency_fee_bps,
            elevated_currency_fee_bps,
        }
    }

    /// Basis points of the named tier.
    #[must_use]
    pub fn bps(&self, tier: FeeTier) -> u64 {
        match tier {
            FeeTier::Base => self.base_fee_bps,
            FeeTier::Currency => self.currency_fee_bps,
            FeeTier::ElevatedCurrency => self.elevated_currency_fee_bps,
        }
    }

    /// Tiers given in whole percent, as deployment scripts state them
    /// (`1, 1, 2` is the default schedule).
    pub fn from_percent(base: u64, currency: u64, elevated_currency: u64) -> Result<Self> {
        let to_bps = |pct: u64| {
            pct.checked_mul(constants::BPS_PER_PERCENT).ok_or_else(|| {
                SwapError::Configuration(format!("fee tier of {pct}% overflows basis points"))
            })
        };
        Ok(Self::new(
            to_bps(base)?,
            to_bps(currency)?,
            to_bps(elevated_currency)?,
        ))
    }

    /// Replace the named tier.
    pub fn set(&mut self, tier: FeeTier, bps: u64) {
        match tier {
            FeeTier::Base => self.base_fee_bps = bps,
            FeeTier::Currency => self.currency_fee_bps = bps,
            FeeTier::ElevatedCurrency => self.elevated_currency_fee_bps = bps,
        }
    }
}

impl Default for FeeTiers {
    fn default() -> Self {
        Self {
            base_fee_bps: constants::DEFAULT_BASE_FEE_BPS,
            currency_fee_bps: constants::DEFAULT_CURRENCY_FEE_BPS,
            elevated_currency_fee_bps: constants::DEFAULT_ELEVATED_CURRENCY_FEE_BPS,
        }
    }
}

/// How one leg's unit is divided between recipient and treasury.
///
/// Invariant: `to_recipient + to_treasury == gross`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub gross: u128,
    pub to_recipient: u128,
    pub to_treasury: u128,
}

impl FeeSplit {
    /// The whole unit goes to the recipient (unique items, zero tiers).
    #[must_use]
    pub fn fee_free(gross: u128) -> Self {
        Self {
            gross,
            to_recipient: gross,
            to_treasury: 0,
        }
    }

    /// Whether any part of the unit goes to the treasury.
    #[must_use]
    pub fn has_fee(&self) -> bool {
        self.to_treasury > 0
    }
}
