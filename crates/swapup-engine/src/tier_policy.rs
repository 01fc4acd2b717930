//! Fee tier selection.
//!
//! Which tier applies to a settlement is configuration, not engine logic:
//! the orchestrator asks an injected [`TierPolicy`] once per settlement and
//! applies the answer to every fungible leg.
//!
//! Two shapes are pinned by fixtures: a one-for-one swap settles on the
//! elevated currency tier, a bulk many-for-few swap on the base tier.
//! [`SwapShapePolicy`] reproduces exactly those two cases.

use swapup_types::{FeeTier, SwapProposal, TierPolicyConfig};

/// Structural summary of a proposal, the only input a policy sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapShape {
    pub offered_legs: usize,
    pub requested_legs: usize,
    pub offered_fungible: usize,
    pub requested_fungible: usize,
}

impl SwapShape {
    /// Shape of `proposal`.
    #[must_use]
    pub fn of(proposal: &SwapProposal) -> Self {
        Self {
            offered_legs: proposal.offered.len(),
            requested_legs: proposal.requested.len(),
            offered_fungible: proposal.offered.iter().filter(|l| l.is_fungible()).count(),
            requested_fungible: proposal.requested.iter().filter(|l| l.is_fungible()).count(),
        }
    }

    /// One offered leg for one requested leg.
    #[must_use]
    pub fn is_one_for_one(&self) -> bool {
        self.offered_legs == 1 && self.requested_legs == 1
    }

    /// Whether any leg is fungible.
    #[must_use]
    pub fn has_fungible(&self) -> bool {
        self.offered_fungible + self.requested_fungible > 0
    }
}

/// Chooses the fee tier for a settlement.
pub trait TierPolicy: Send + Sync {
    fn select(&self, shape: &SwapShape) -> FeeTier;

    /// Name for logs.
    fn name(&self) -> &'static str;
}

/// One-for-one swaps use [`FeeTier::ElevatedCurrency`]; every other shape
/// uses [`FeeTier::Base`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapShapePolicy;

impl TierPolicy for SwapShapePolicy {
    fn select(&self, shape: &SwapShape) -> FeeTier {
        if shape.is_one_for_one() {
            FeeTier::ElevatedCurrency
        } else {
            FeeTier::Base
        }
    }

    fn name(&self) -> &'static str {
        "swap-shape"
    }
}

/// Always the same tier.
#[derive(Debug, Clone, Copy)]
pub struct FixedTier(pub FeeTier);

impl TierPolicy for FixedTier {
    fn select(&self, _shape: &SwapShape) -> FeeTier {
        self.0
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Build the policy named by configuration.
#[must_use]
pub fn from_config(config: TierPolicyConfig) -> Box<dyn TierPolicy> {
    match config {
        TierPolicyConfig::SwapShape => Box::new(SwapShapePolicy),
        TierPolicyConfig::Fixed(tier) => Box::new(FixedTier(tier)),
    }
}
