//! Settlement Orchestrator.
//!
//! Executes a matched proposal as one indivisible unit:
//!
//! ```text
//! 1. status check: only an OPEN record settles (no asset touched yet)
//! 2. tier selection + fee splits (fee errors abort here)
//! 3. staged transaction over the touched contracts:
//!      supply snapshot
//!      offered legs   initiator -> counterparty
//!      requested legs counterparty -> initiator
//!      supply verification
//! 4. commit, mark the record SETTLED, build the receipt
//! ```
//!
//! Any failure in step 3 discards the staged books, so no leg and no
//! treasury credit of a failed settlement is ever visible, and the record
//! stays OPEN. A record that settled is refused on any later call.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use swapup_assets::{AssetLedger, TransferAdapter};
use swapup_types::{
    Address, AssetRef, FeeSplit, FeeTier, LegTransfer, Result, SettlementReceipt, SwapError,
    SwapProposal,
};

use crate::fee_schedule::FeeSchedule;
use crate::oracle::OracleAdapter;
use crate::supply_conservation::SupplySnapshot;
use crate::tier_policy::{SwapShape, TierPolicy};

/// Drives the adapter and fee schedule for one matched proposal at a time.
#[derive(Debug)]
pub struct SwapSettler {
    adapter: TransferAdapter,
    oracle: Option<OracleAdapter>,
}

impl SwapSettler {
    /// Settler moving legs through `adapter`, valuing fees through `oracle`
    /// when one is wired.
    #[must_use]
    pub fn new(adapter: TransferAdapter, oracle: Option<OracleAdapter>) -> Self {
        Self { adapter, oracle }
    }

    /// The adapter legs move through.
    #[must_use]
    pub fn adapter(&self) -> TransferAdapter {
        self.adapter
    }

    /// Settle `proposal` with `counterparty` as the confirming party and
    /// mark it SETTLED.
    ///
    /// On error the ledger and the proposal are unchanged.
    pub fn settle(
        &self,
        ledger: &mut AssetLedger,
        proposal: &mut SwapProposal,
        counterparty: Address,
        schedule: &FeeSchedule,
        policy: &dyn TierPolicy,
    ) -> Result<SettlementReceipt> {
        if !proposal.is_open() {
            return Err(SwapError::ProposalNotOpen {
                id: proposal.id,
                status: proposal.status,
            });
        }
        if counterparty == proposal.initiator {
            return Err(SwapError::InitiatorCannotConfirm(counterparty));
        }

        let shape = SwapShape::of(proposal);
        let tier = policy.select(&shape);
        let tier_bps = schedule.tiers().bps(tier);
        let offered = split_legs(schedule, &proposal.offered, tier)?;
        let requested = split_legs(schedule, &proposal.requested, tier)?;
        let treasury = schedule.treasury();
        let initiator = proposal.initiator;
        let adapter = self.adapter;
        let touched: Vec<Address> = proposal
            .offered
            .iter()
            .chain(&proposal.requested)
            .map(AssetRef::contract)
            .collect();

        let legs = ledger
            .transact(touched, |tx| {
                let snapshot = SupplySnapshot::capture(
                    tx,
                    proposal.offered.iter().chain(&proposal.requested),
                )?;
                let mut legs = Vec::with_capacity(proposal.leg_count());
                for (leg, split) in &offered {
                    legs.push(adapter.move_asset(tx, initiator, counterparty, leg, *split, treasury)?);
                }
                for (leg, split) in &requested {
                    legs.push(adapter.move_asset(tx, counterparty, initiator, leg, *split, treasury)?);
                }
                snapshot.verify(tx)?;
                Ok(legs)
            })
            .inspect_err(|e| {
                tracing::warn!(
                    proposal = %proposal.id,
                    initiator = %initiator,
                    counterparty = %counterparty,
                    error = %e,
                    "Settlement aborted; no leg applied"
                );
            })?;

        proposal.mark_settled()?;

        let settled_at = Utc::now();
        let mut receipt = SettlementReceipt {
            proposal_id: proposal.id,
            fingerprint: proposal.fingerprint,
            initiator,
            counterparty,
            treasury,
            tier,
            tier_bps,
            legs,
            fee_value_quote: None,
            settled_at,
        };
        receipt.fee_value_quote = self.quote_fees(&receipt, settled_at);

        tracing::info!(
            proposal = %receipt.proposal_id,
            fingerprint = %hex::encode(receipt.fingerprint.as_bytes()),
            initiator = %initiator,
            counterparty = %counterparty,
            legs = receipt.legs.len(),
            tier = %tier,
            tier_bps,
            policy = policy.name(),
            fee_value_quote = ?receipt.fee_value_quote,
            "Settlement committed"
        );
        Ok(receipt)
    }

    /// Quote-currency value of the fees collected in the oracle's asset.
    ///
    /// Oracle trouble never fails a committed settlement; it is logged and
    /// the receipt carries `None`.
    fn quote_fees(&self, receipt: &SettlementReceipt, now: DateTime<Utc>) -> Option<Decimal> {
        let oracle = self.oracle.as_ref()?;
        let quoted = oracle.quoted_asset()?;
        let fees = receipt.fees_collected(quoted);
        if fees == 0 {
            return Some(Decimal::ZERO);
        }
        match oracle.normalize(fees, now) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    proposal = %receipt.proposal_id,
                    feed = %oracle.feed_address(),
                    error = %e,
                    "Fee valuation skipped"
                );
                None
            }
        }
    }
}

fn split_legs(
    schedule: &FeeSchedule,
    legs: &[AssetRef],
    tier: FeeTier,
) -> Result<Vec<(AssetRef, FeeSplit)>> {
    legs.iter()
        .map(|leg| Ok((*leg, schedule.compute_fee(leg, tier)?)))
        .collect()
}

/// Credited + fee per leg always equals the leg's gross units.
#[must_use]
pub fn legs_conserve_value(legs: &[LegTransfer]) -> bool {
    legs.iter().all(|l| match l.asset {
        AssetRef::Fungible { amount, .. } => l.credited.checked_add(l.fee) == Some(amount),
        AssetRef::Unique { .. } => l.credited == 1 && l.fee == 0,
    })
}
