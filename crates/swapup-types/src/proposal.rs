//! # Swap proposals
//!
//! A [`SwapProposal`] is the bookkeeping record created by the first half of
//! a swap. It never holds assets: the offered items stay with the initiator
//! until the confirming call settles the swap atomically.
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  matching confirmation + settlement   ┌─────────┐
//!   │ OPEN ├──────────────────────────────────────▶│ SETTLED │
//!   └──────┘                                       └─────────┘
//! ```
//!
//! There is no cancel or expiry transition.
//!
//! ## Matching key
//!
//! Proposals are paired by [`fingerprint`] over `(offered, requested)` only.
//! The label, the declared counterparty, and the caller are not part of the
//! key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, AssetRef, Fingerprint, ProposalId, RawAssetRef};

/// Who may confirm a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Only the named counterparty may confirm.
    Private,
    /// Any address other than the initiator may confirm.
    Public,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Private => write!(f, "PRIVATE"),
            Self::Public => write!(f, "PUBLIC"),
        }
    }
}

/// Lifecycle state of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Open,
    Settled,
}

impl ProposalStatus {
    /// Can this proposal transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Open, Self::Settled))
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Settled => write!(f, "SETTLED"),
        }
    }
}

/// Arguments of the swap entry point, as submitted by a caller.
///
/// The same shape is used for the proposing and the confirming call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Advisory, human-supplied label. Not part of the matching key.
    pub label: String,
    /// The party the caller intends to swap with.
    pub counterparty: Address,
    /// Legs moving from the initiator to the counterparty.
    pub offered: Vec<RawAssetRef>,
    /// Legs moving from the counterparty to the initiator.
    pub requested: Vec<RawAssetRef>,
    pub visibility: Visibility,
}

impl SwapRequest {
    /// Request with both asset lists in submission order.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        counterparty: Address,
        offered: Vec<RawAssetRef>,
        requested: Vec<RawAssetRef>,
        visibility: Visibility,
    ) -> Self {
        Self {
            label: label.into(),
            counterparty,
            offered,
            requested,
            visibility,
        }
    }
}

/// An open or settled swap proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapProposal {
    pub id: ProposalId,
    /// Content fingerprint of `(offered, requested)`.
    pub fingerprint: Fingerprint,
    pub initiator: Address,
    /// Declared counterparty. Binding only under [`Visibility::Private`].
    pub counterparty: Address,
    pub offered: Vec<AssetRef>,
    pub requested: Vec<AssetRef>,
    pub visibility: Visibility,
    pub label: String,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
}

impl SwapProposal {
    /// Build an `Open` proposal from already-resolved legs.
    #[must_use]
    pub fn open(
        initiator: Address,
        counterparty: Address,
        offered: Vec<AssetRef>,
        requested: Vec<AssetRef>,
        visibility: Visibility,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: ProposalId::new(),
            fingerprint: fingerprint(&offered, &requested),
            initiator,
            counterparty,
            offered,
            requested,
            visibility,
            label: label.into(),
            status: ProposalStatus::Open,
            created_at: Utc::now(),
        }
    }

    /// Whether the proposal can still settle.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == ProposalStatus::Open
    }

    /// Total number of legs across both lists.
    #[must_use]
    pub fn leg_count(&self) -> usize {
        self.offered.len() + self.requested.len()
    }

    /// Attempt to transition to SETTLED.
    ///
    /// # Errors
    /// Returns error if the proposal is not `Open`.
    pub fn mark_settled(&mut self) -> crate::Result<()> {
        if !self.status.can_transition_to(ProposalStatus::Settled) {
            return Err(crate::SwapError::ProposalNotOpen {
                id: self.id,
                status: self.status,
            });
        }
        self.status = ProposalStatus::Settled;
        Ok(())
    }
}

/// Compute the matching fingerprint of a pair of leg lists.
///
/// Preimage: `"swapup:fingerprint:v1:" || len(offered) || offered legs ||
/// len(requested) || requested legs`, each leg encoded as
/// `kind tag || contract || unit (big-endian)`. List order is significant
/// and the two lists are length-prefixed, so moving a leg from one side to
/// the other always changes the fingerprint.
#[must_use]
pub fn fingerprint(offered: &[AssetRef], requested: &[AssetRef]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(b"swapup:fingerprint:v1:");
    for side in [offered, requested] {
        hasher.update((side.len() as u64).to_be_bytes());
        for leg in side {
            let tag: u8 = match leg {
                AssetRef::Fungible { .. } => 0x01,
                AssetRef::Unique { .. } => 0x02,
            };
            hasher.update([tag]);
            hasher.update(leg.contract().as_bytes());
            hasher.update(leg.unit().to_be_bytes());
        }
    }
    Fingerprint(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nft(item: u128) -> AssetRef {
        AssetRef::unique(Address::from_index(100), item)
    }

    fn token(amount: u128) -> AssetRef {
        AssetRef::fungible(Address::from_index(200), amount)
    }

    #[test]
    fn status_transitions_are_one_way() {
        assert!(ProposalStatus::Open.can_transition_to(ProposalStatus::Settled));
        assert!(!ProposalStatus::Settled.can_transition_to(ProposalStatus::Open));
        assert!(!ProposalStatus::Settled.can_transition_to(ProposalStatus::Settled));
    }

    #[test]
    fn mark_settled_twice_fails() {
        let mut p = SwapProposal::open(
            Address::from_index(1),
            Address::from_index(2),
            vec![nft(0)],
            vec![nft(4)],
            Visibility::Private,
            "first",
        );
        p.mark_settled().unwrap();
        assert_eq!(p.status, ProposalStatus::Settled);
        let err = p.mark_settled().unwrap_err();
        assert!(matches!(err, crate::SwapError::ProposalNotOpen { .. }));
    }

    #[test]
    fn fingerprint_ignores_label_and_parties() {
        let a = SwapProposal::open(
            Address::from_index(1),
            Address::from_index(2),
            vec![nft(0)],
            vec![token(10)],
            Visibility::Private,
            "mine",
        );
        let b = SwapProposal::open(
            Address::from_index(3),
            Address::from_index(4),
            vec![nft(0)],
            vec![token(10)],
            Visibility::Public,
            "theirs",
        );
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn fingerprint_is_side_sensitive() {
        let fwd = fingerprint(&[nft(0)], &[nft(4)]);
        let rev = fingerprint(&[nft(4)], &[nft(0)]);
        assert_ne!(fwd, rev);

        let split = fingerprint(&[nft(0), nft(4)], &[token(1)]);
        let moved = fingerprint(&[nft(0)], &[nft(4), token(1)]);
        assert_ne!(split, moved);
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let ab = fingerprint(&[nft(0), nft(1)], &[token(5)]);
        let ba = fingerprint(&[nft(1), nft(0)], &[token(5)]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn fingerprint_distinguishes_kind() {
        let c = Address::from_index(100);
        let as_item = fingerprint(&[AssetRef::unique(c, 7)], &[token(1)]);
        let as_amount = fingerprint(&[AssetRef::fungible(c, 7)], &[token(1)]);
        assert_ne!(as_item, as_amount);
    }

    #[test]
    fn leg_count_and_open() {
        let p = SwapProposal::open(
            Address::from_index(1),
            Address::from_index(2),
            vec![nft(0), nft(1)],
            vec![token(3)],
            Visibility::Public,
            "",
        );
        assert!(p.is_open());
        assert_eq!(p.leg_count(), 3);
    }
}
