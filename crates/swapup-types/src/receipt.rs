//! Settlement receipts and the engine event log.
//!
//! A [`SettlementReceipt`] is returned to the confirming caller and recorded
//! in the event log so that both parties can observe the outcome.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, AssetRef, FeeTier, Fingerprint, ProposalId};

/// One executed leg of a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegTransfer {
    pub asset: AssetRef,
    pub from: Address,
    pub to: Address,
    /// Units credited to `to`: the full item for unique legs, the
    /// remainder after fee for fungible legs.
    pub credited: u128,
    /// Units credited to the treasury. Always zero for unique legs.
    pub fee: u128,
}

/// Outcome of a successful settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub proposal_id: ProposalId,
    pub fingerprint: Fingerprint,
    pub initiator: Address,
    pub counterparty: Address,
    pub treasury: Address,
    /// Tier applied to every fungible leg of this settlement.
    pub tier: FeeTier,
    pub tier_bps: u64,
    /// Executed legs, offered first, then requested, in submission order.
    pub legs: Vec<LegTransfer>,
    /// Fees collected in the oracle's quoted asset, normalized to quote
    /// units. `None` when no oracle is configured or the feed was unusable.
    pub fee_value_quote: Option<Decimal>,
    pub settled_at: DateTime<Utc>,
}

impl SettlementReceipt {
    /// Sum of treasury credits on the given fungible contract.
    #[must_use]
    pub fn fees_collected(&self, contract: Address) -> u128 {
        self.legs
            .iter()
            .filter(|leg| leg.asset.contract() == contract)
            .map(|leg| leg.fee)
            .sum()
    }

    /// Whether any leg credited the treasury.
    #[must_use]
    pub fn charged_fees(&self) -> bool {
        self.legs.iter().any(|leg| leg.fee > 0)
    }
}

/// Append-only engine event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SwapEvent {
    /// A new proposal entered the open set.
    Proposed {
        proposal_id: ProposalId,
        fingerprint: Fingerprint,
        initiator: Address,
        counterparty: Address,
        label: String,
    },
    /// A proposal was matched and settled.
    Settled(SettlementReceipt),
    /// The owner changed a fee tier.
    FeeTierUpdated {
        tier: FeeTier,
        old_bps: u64,
        new_bps: u64,
    },
    /// A fee-free single-asset transfer outside any proposal.
    TokensTransferred(LegTransfer),
}

impl SwapEvent {
    /// Short event name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Proposed { .. } => "PROPOSED",
            Self::Settled(_) => "SETTLED",
            Self::FeeTierUpdated { .. } => "FEE_TIER_UPDATED",
            Self::TokensTransferred(_) => "TOKENS_TRANSFERRED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> SettlementReceipt {
        let token = Address::from_index(200);
        SettlementReceipt {
            proposal_id: ProposalId::new(),
            fingerprint: Fingerprint([1; 32]),
            initiator: Address::from_index(1),
            counterparty: Address::from_index(2),
            treasury: Address::from_index(5),
            tier: FeeTier::ElevatedCurrency,
            tier_bps: 200,
            legs: vec![
                LegTransfer {
                    asset: AssetRef::unique(Address::from_index(100), 0),
                    from: Address::from_index(1),
                    to: Address::from_index(2),
                    credited: 1,
                    fee: 0,
                },
                LegTransfer {
                    asset: AssetRef::fungible(token, 1_000),
                    from: Address::from_index(2),
                    to: Address::from_index(1),
                    credited: 980,
                    fee: 20,
                },
            ],
            fee_value_quote: None,
            settled_at: Utc::now(),
        }
    }

    #[test]
    fn fees_collected_per_contract() {
        let r = receipt();
        assert_eq!(r.fees_collected(Address::from_index(200)), 20);
        assert_eq!(r.fees_collected(Address::from_index(100)), 0);
        assert!(r.charged_fees());
    }

    #[test]
    fn event_names() {
        let ev = SwapEvent::FeeTierUpdated {
            tier: FeeTier::Base,
            old_bps: 1,
            new_bps: 2,
        };
        assert_eq!(ev.name(), "FEE_TIER_UPDATED");
        assert_eq!(SwapEvent::Settled(receipt()).name(), "SETTLED");
    }

    #[test]
    fn receipt_serde_roundtrip() {
        let r = receipt();
        let json = serde_json::to_string(&r).unwrap();
        let back: SettlementReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back.legs, r.legs);
        assert_eq!(back.proposal_id, r.proposal_id);
    }
}
