//! Swap Proposal Registry.
//!
//! Holds the set of OPEN proposals keyed by content fingerprint. A call
//! whose `(offered, requested)` fingerprint has no open entry becomes a new
//! proposal; a call whose fingerprint matches becomes the confirming half.
//!
//! Confirmation checks, in order:
//! 1. the confirmer is not the initiator
//! 2. under [`Visibility::Private`], the confirmer is the declared counterparty
//! 3. label / declared counterparty / visibility agreement, enforced only
//!    under [`MatchStrictness::Strict`] and logged otherwise
//!
//! Settled proposals leave the open set, so an identical later call starts
//! a fresh proposal.

use std::collections::{HashMap, HashSet};

use swapup_types::{
    constants::{MAX_LABEL_LEN, MAX_LEGS_PER_SIDE},
    Address, AssetRef, Fingerprint, MatchStrictness, Result, SwapError, SwapProposal, SwapRequest,
    Visibility,
};

/// Open proposals by fingerprint.
#[derive(Debug, Clone, Default)]
pub struct ProposalRegistry {
    open: HashMap<Fingerprint, SwapProposal>,
    strictness: MatchStrictness,
}

impl ProposalRegistry {
    /// Empty registry applying `strictness` to confirmations.
    #[must_use]
    pub fn new(strictness: MatchStrictness) -> Self {
        Self {
            open: HashMap::new(),
            strictness,
        }
    }

    /// How confirming calls are compared with the proposal.
    #[must_use]
    pub fn strictness(&self) -> MatchStrictness {
        self.strictness
    }

    /// Shape checks shared by both halves: non-empty sides, leg limit,
    /// label length.
    pub fn validate_request(req: &SwapRequest) -> Result<()> {
        for (side, legs) in [("offered", &req.offered), ("requested", &req.requested)] {
            if legs.is_empty() {
                return Err(SwapError::EmptyAssetList { side });
            }
            if legs.len() > MAX_LEGS_PER_SIDE {
                return Err(SwapError::TooManyLegs {
                    side,
                    count: legs.len(),
                    max: MAX_LEGS_PER_SIDE,
                });
            }
        }
        if req.label.len() > MAX_LABEL_LEN {
            return Err(SwapError::LabelTooLong {
                len: req.label.len(),
                max: MAX_LABEL_LEN,
            });
        }
        Ok(())
    }

    /// The open proposal carrying `fingerprint`, if any.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&SwapProposal> {
        self.open.get(fingerprint)
    }

    /// Record a new OPEN proposal from resolved legs.
    ///
    /// # Errors
    /// - [`SwapError::SelfSwap`] if `initiator` names itself as counterparty
    /// - [`SwapError::InvalidParty`] for a private proposal reserved for the
    ///   zero address, which nobody could confirm
    /// - [`SwapError::DuplicateLeg`] if a unique item is listed twice,
    ///   on one side or across both
    /// - [`SwapError::Internal`] if the fingerprint is already open
    pub fn propose(
        &mut self,
        initiator: Address,
        req: &SwapRequest,
        offered: Vec<AssetRef>,
        requested: Vec<AssetRef>,
    ) -> Result<&SwapProposal> {
        if req.counterparty == initiator {
            return Err(SwapError::SelfSwap(initiator));
        }
        if req.visibility == Visibility::Private && req.counterparty.is_zero() {
            return Err(SwapError::InvalidParty {
                reason: "private proposal reserved for the zero address".into(),
            });
        }
        reject_duplicate_items(&offered, &requested)?;

        let proposal = SwapProposal::open(
            initiator,
            req.counterparty,
            offered,
            requested,
            req.visibility,
            req.label.clone(),
        );
        let fp = proposal.fingerprint;
        if self.open.contains_key(&fp) {
            return Err(SwapError::Internal(format!("{fp} is already open")));
        }

        tracing::debug!(
            proposal = %proposal.id,
            fingerprint = %fp,
            initiator = %initiator,
            legs = proposal.leg_count(),
            "Proposal recorded"
        );
        Ok(&*self.open.entry(fp).or_insert(proposal))
    }

    /// Check that `confirmer` may settle the open proposal at `fingerprint`.
    ///
    /// Nothing changes on success; the caller settles and then
    /// [`retire`](Self::retire)s the entry.
    pub fn check_confirmation(
        &self,
        confirmer: Address,
        fingerprint: &Fingerprint,
        req: &SwapRequest,
    ) -> Result<&SwapProposal> {
        let proposal = self
            .open
            .get(fingerprint)
            .ok_or(SwapError::ProposalNotFound(*fingerprint))?;

        if confirmer == proposal.initiator {
            return Err(SwapError::InitiatorCannotConfirm(confirmer));
        }
        if proposal.visibility == Visibility::Private && confirmer != proposal.counterparty {
            return Err(SwapError::VisibilityViolation {
                confirmer,
                counterparty: proposal.counterparty,
            });
        }

        let diffs = mismatches(proposal, req);
        if !diffs.is_empty() {
            match self.strictness {
                MatchStrictness::Strict => {
                    return Err(SwapError::ProposalMismatch {
                        reason: diffs.join(", "),
                    });
                }
                MatchStrictness::Lenient => {
                    tracing::warn!(
                        proposal = %proposal.id,
                        confirmer = %confirmer,
                        mismatches = %diffs.join(", "),
                        "Confirmation differs from proposal; accepted under lenient matching"
                    );
                }
            }
        }
        Ok(proposal)
    }

    /// Mutable access to an open entry, for the settler to mark it SETTLED.
    pub(crate) fn entry_mut(&mut self, fingerprint: &Fingerprint) -> Result<&mut SwapProposal> {
        self.open
            .get_mut(fingerprint)
            .ok_or(SwapError::ProposalNotFound(*fingerprint))
    }

    /// Remove a proposal from the open set, marking it SETTLED unless the
    /// settler already did.
    pub fn retire(&mut self, fingerprint: &Fingerprint) -> Result<SwapProposal> {
        let mut proposal = self
            .open
            .remove(fingerprint)
            .ok_or(SwapError::ProposalNotFound(*fingerprint))?;
        if proposal.is_open() {
            proposal.mark_settled()?;
        }
        Ok(proposal)
    }

    /// Open proposals, oldest first.
    #[must_use]
    pub fn open_proposals(&self) -> Vec<&SwapProposal> {
        let mut all: Vec<&SwapProposal> = self.open.values().collect();
        all.sort_by_key(|p| (p.created_at, p.id));
        all
    }

    /// Number of open proposals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Whether no proposal is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

/// A unique item can be delivered once per settlement, so it may appear
/// only once across both sides.
fn reject_duplicate_items(offered: &[AssetRef], requested: &[AssetRef]) -> Result<()> {
    let mut seen = HashSet::new();
    for (side, legs) in [("offered", offered), ("requested", requested)] {
        for leg in legs {
            if let AssetRef::Unique { contract, item_id } = *leg {
                if !seen.insert((contract, item_id)) {
                    return Err(SwapError::DuplicateLeg { side, leg: *leg });
                }
            }
        }
    }
    Ok(())
}

/// Fields of a confirming call that disagree with the proposal.
///
/// The declared counterparty agrees if it names either party: a confirmer
/// may echo the initiator's arguments or name the initiator.
fn mismatches(proposal: &SwapProposal, req: &SwapRequest) -> Vec<&'static str> {
    let mut out = Vec::new();
    if req.label != proposal.label {
        out.push("label");
    }
    if req.counterparty != proposal.counterparty && req.counterparty != proposal.initiator {
        out.push("counterparty");
    }
    if req.visibility != proposal.visibility {
        out.push("visibility");
    }
    out
}
