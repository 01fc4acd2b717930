//! The SwapUp engine: the exposed surface over registry, fee schedule,
//! admin control, and settlement.
//!
//! Every entry point takes `&mut self` and either completes or leaves no
//! trace. The ledger is committed first; registry and event log are only
//! touched after that commit succeeds.
//!
//! The event log is bounded by [`EngineConfig::event_log_capacity`]; the
//! oldest events are dropped first.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use swapup_assets::{AssetLedger, TransferAdapter};
use swapup_types::{
    fingerprint, Address, AssetRef, EngineConfig, FeeSplit, FeeTier, FeeTiers, Fingerprint,
    LegTransfer, ProposalId, Result, SettlementReceipt, SwapError, SwapEvent, SwapProposal,
    SwapRequest,
};

use crate::admin::AdminControl;
use crate::fee_schedule::FeeSchedule;
use crate::oracle::{OracleAdapter, PriceFeed};
use crate::registry::ProposalRegistry;
use crate::settlement::SwapSettler;
use crate::tier_policy::{self, TierPolicy};

/// Result of one `approve_and_swap` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SwapOutcome {
    /// No open proposal matched; a new one was recorded.
    Proposed(ProposalId),
    /// The call confirmed an open proposal and every leg settled.
    Settled(SettlementReceipt),
}

impl SwapOutcome {
    /// The settlement receipt, if this call settled.
    #[must_use]
    pub fn receipt(&self) -> Option<&SettlementReceipt> {
        match self {
            Self::Settled(r) => Some(r),
            Self::Proposed(_) => None,
        }
    }

    /// Id of the proposal this call opened or settled.
    #[must_use]
    pub fn proposal_id(&self) -> ProposalId {
        match self {
            Self::Proposed(id) => *id,
            Self::Settled(r) => r.proposal_id,
        }
    }
}

/// Swap settlement engine.
pub struct SwapEngine {
    address: Address,
    admin: AdminControl,
    schedule: FeeSchedule,
    policy: Box<dyn TierPolicy>,
    registry: ProposalRegistry,
    settler: SwapSettler,
    ledger: AssetLedger,
    events: VecDeque<SwapEvent>,
    event_log_capacity: usize,
}

impl std::fmt::Debug for SwapEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapEngine")
            .field("address", &self.address)
            .field("owner", &self.admin.owner())
            .field("schedule", &self.schedule)
            .field("policy", &self.policy.name())
            .field("strictness", &self.registry.strictness())
            .field("open_proposals", &self.registry.len())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl SwapEngine {
    /// Build an engine over `ledger`.
    ///
    /// `feed` must be given exactly when `config.oracle` is set.
    pub fn new(
        config: EngineConfig,
        ledger: AssetLedger,
        feed: Option<Arc<dyn PriceFeed>>,
    ) -> Result<Self> {
        config.validate()?;
        let oracle = match (config.oracle, feed) {
            (Some(cfg), Some(feed)) => Some(OracleAdapter::new(cfg, feed)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(SwapError::Configuration(
                    "oracle configured but no price feed supplied".into(),
                ));
            }
            (None, Some(_)) => {
                return Err(SwapError::Configuration(
                    "price feed supplied without oracle configuration".into(),
                ));
            }
        };

        let policy = tier_policy::from_config(config.tier_policy);
        tracing::info!(
            engine = %config.engine_address,
            owner = %config.owner,
            treasury = %config.treasury,
            base_bps = config.fee_tiers.base_fee_bps,
            currency_bps = config.fee_tiers.currency_fee_bps,
            elevated_bps = config.fee_tiers.elevated_currency_fee_bps,
            policy = policy.name(),
            strictness = ?config.strictness,
            oracle = oracle.is_some(),
            "Swap engine initialized"
        );

        Ok(Self {
            address: config.engine_address,
            admin: AdminControl::new(config.owner),
            schedule: FeeSchedule::new(config.fee_tiers, config.treasury),
            policy,
            registry: ProposalRegistry::new(config.strictness),
            settler: SwapSettler::new(TransferAdapter::new(config.engine_address), oracle),
            ledger,
            events: VecDeque::new(),
            event_log_capacity: config.event_log_capacity,
        })
    }

    /// Replace the tier-selection policy.
    #[must_use]
    pub fn with_tier_policy(mut self, policy: Box<dyn TierPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Propose a swap, or confirm and settle the open proposal with the same
    /// `(offered, requested)` content.
    pub fn approve_and_swap(&mut self, caller: Address, req: SwapRequest) -> Result<SwapOutcome> {
        ProposalRegistry::validate_request(&req)?;
        let adapter = self.settler.adapter();
        let offered = adapter.resolve_all(&self.ledger, &req.offered)?;
        let requested = adapter.resolve_all(&self.ledger, &req.requested)?;
        let fp = fingerprint(&offered, &requested);

        if self.registry.get(&fp).is_some() {
            self.confirm(caller, &fp, &req)
        } else {
            self.propose(caller, &req, offered, requested)
        }
    }

    fn propose(
        &mut self,
        caller: Address,
        req: &SwapRequest,
        offered: Vec<AssetRef>,
        requested: Vec<AssetRef>,
    ) -> Result<SwapOutcome> {
        self.settler
            .adapter()
            .check_side(&self.ledger, caller, &offered)?;

        let proposal = self.registry.propose(caller, req, offered, requested)?;
        let (id, fp) = (proposal.id, proposal.fingerprint);
        tracing::info!(
            proposal = %id,
            fingerprint = %fp,
            initiator = %caller,
            counterparty = %req.counterparty,
            visibility = %req.visibility,
            label = %req.label,
            "Swap proposed"
        );
        self.record(SwapEvent::Proposed {
            proposal_id: id,
            fingerprint: fp,
            initiator: caller,
            counterparty: req.counterparty,
            label: req.label.clone(),
        });
        Ok(SwapOutcome::Proposed(id))
    }

    fn confirm(&mut self, caller: Address, fp: &Fingerprint, req: &SwapRequest) -> Result<SwapOutcome> {
        self.registry
            .check_confirmation(caller, fp, req)
            .inspect_err(|e| {
                tracing::warn!(confirmer = %caller, fingerprint = %fp, error = %e, "Confirmation rejected");
            })?;

        let proposal = self.registry.entry_mut(fp)?;
        let receipt = self.settler.settle(
            &mut self.ledger,
            proposal,
            caller,
            &self.schedule,
            self.policy.as_ref(),
        )?;
        self.registry.retire(fp)?;
        self.record(SwapEvent::Settled(receipt.clone()));
        Ok(SwapOutcome::Settled(receipt))
    }

    /// Move `amount` of the fungible `token` from `from` to `to` outside any
    /// proposal. Fee-free; spends the allowance `from` granted the engine.
    ///
    /// # Errors
    /// - [`SwapError::TransferNotAuthorized`] unless `caller` is `from`
    /// - [`SwapError::WrongAssetKind`] if `token` is a unique-item contract
    /// - balance / allowance errors from the asset book
    pub fn transfer_tokens(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        token: Address,
        amount: u128,
    ) -> Result<LegTransfer> {
        if caller != from {
            return Err(SwapError::TransferNotAuthorized { caller, from });
        }
        let adapter = self.settler.adapter();
        let leg = adapter.resolve_fungible(&self.ledger, token, amount)?;
        let treasury = self.schedule.treasury();
        let moved = self
            .ledger
            .transact([token], |tx| {
                adapter.move_asset(tx, from, to, &leg, FeeSplit::fee_free(amount), treasury)
            })
            .inspect_err(|e| {
                tracing::warn!(from = %from, to = %to, token = %token, amount, error = %e, "Token transfer rejected");
            })?;

        tracing::info!(from = %from, to = %to, token = %token, amount, "Tokens transferred");
        self.record(SwapEvent::TokensTransferred(moved.clone()));
        Ok(moved)
    }

    fn record(&mut self, event: SwapEvent) {
        if self.events.len() >= self.event_log_capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Owner-only: set the base tier, in basis points.
    pub fn set_base_fee(&mut self, caller: Address, bps: u64) -> Result<()> {
        self.set_fee(caller, FeeTier::Base, bps)
    }

    /// Owner-only: set the currency tier, in basis points.
    pub fn set_currency_fee(&mut self, caller: Address, bps: u64) -> Result<()> {
        self.set_fee(caller, FeeTier::Currency, bps)
    }

    /// Owner-only: set the elevated currency tier, in basis points.
    pub fn set_elevated_currency_fee(&mut self, caller: Address, bps: u64) -> Result<()> {
        self.set_fee(caller, FeeTier::ElevatedCurrency, bps)
    }

    fn set_fee(&mut self, caller: Address, tier: FeeTier, bps: u64) -> Result<()> {
        self.admin.ensure_owner(caller)?;
        let old_bps = self.schedule.set_tier(tier, bps);
        tracing::info!(tier = %tier, old_bps, new_bps = bps, "Fee tier updated");
        self.record(SwapEvent::FeeTierUpdated {
            tier,
            old_bps,
            new_bps: bps,
        });
        Ok(())
    }

    /// Current tier set.
    #[must_use]
    pub fn fee_tiers(&self) -> FeeTiers {
        self.schedule.tiers()
    }

    /// Destination of every collected fee.
    #[must_use]
    pub fn treasury(&self) -> Address {
        self.schedule.treasury()
    }

    /// The address allowed to change fee tiers.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.admin.owner()
    }

    /// The engine's own address: the spender / operator asset owners
    /// authorize.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Retained events, oldest first.
    #[must_use]
    pub fn events(&self) -> &VecDeque<SwapEvent> {
        &self.events
    }

    /// Settlement receipts in which `party` was initiator or counterparty.
    #[must_use]
    pub fn receipts_for(&self, party: Address) -> Vec<&SettlementReceipt> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SwapEvent::Settled(r) if r.initiator == party || r.counterparty == party => Some(r),
                _ => None,
            })
            .collect()
    }

    /// The open proposal carrying `fingerprint`, if any.
    #[must_use]
    pub fn open_proposal(&self, fingerprint: &Fingerprint) -> Option<&SwapProposal> {
        self.registry.get(fingerprint)
    }

    /// Open proposals, oldest first.
    #[must_use]
    pub fn open_proposals(&self) -> Vec<&SwapProposal> {
        self.registry.open_proposals()
    }

    /// Asset state the engine settles against.
    #[must_use]
    pub fn ledger(&self) -> &AssetLedger {
        &self.ledger
    }

    /// Mutable ledger access for out-of-band actions by asset owners
    /// (approvals, mints) between engine calls.
    pub fn ledger_mut(&mut self) -> &mut AssetLedger {
        &mut self.ledger
    }
}
