//! Price Oracle Adapter.
//!
//! Read-only wrapper around an external price feed. The engine never writes
//! to the feed. It is used to express fees collected in the quoted asset as
//! a quote-currency value on settlement receipts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use swapup_types::{Address, OracleConfig, Result, SwapError};

/// One round reported by a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRound {
    pub round_id: u64,
    /// Price scaled by `10^decimals`.
    pub answer: i128,
    pub decimals: u32,
    pub updated_at: DateTime<Utc>,
}

/// Latest-value query against an external feed.
pub trait PriceFeed: Send + Sync {
    /// The most recent round the feed has published.
    fn latest_round(&self) -> Result<PriceRound>;
}

/// Feed handle plus the normalization parameters from configuration.
#[derive(Clone)]
pub struct OracleAdapter {
    config: OracleConfig,
    feed: Arc<dyn PriceFeed>,
}

impl std::fmt::Debug for OracleAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OracleAdapter {
    /// Adapter reading `feed` under the bounds in `config`.
    #[must_use]
    pub fn new(config: OracleConfig, feed: Arc<dyn PriceFeed>) -> Self {
        Self { config, feed }
    }

    /// Configured address of the external feed.
    #[must_use]
    pub fn feed_address(&self) -> Address {
        self.config.feed_address
    }

    /// Fungible contract whose amounts this oracle prices.
    #[must_use]
    pub fn quoted_asset(&self) -> Option<Address> {
        self.config.quoted_asset
    }

    /// Latest usable price as of `now`.
    ///
    /// # Errors
    /// - `OracleUnavailable` if the feed errors or reports unusable decimals
    /// - `OracleInvalidAnswer` for a non-positive answer
    /// - `OracleRoundInFuture` if the round is timestamped after `now`
    /// - `OracleStale` if the round is older than the staleness bound
    pub fn latest_price(&self, now: DateTime<Utc>) -> Result<Decimal> {
        let round = self.feed.latest_round()?;
        if round.answer <= 0 {
            return Err(SwapError::OracleInvalidAnswer(round.answer));
        }
        let age_secs = (now - round.updated_at).num_seconds();
        if age_secs < 0 {
            return Err(SwapError::OracleRoundInFuture {
                ahead_secs: -age_secs,
            });
        }
        if age_secs > self.config.max_staleness_secs {
            return Err(SwapError::OracleStale {
                age_secs,
                max_secs: self.config.max_staleness_secs,
            });
        }
        Decimal::try_from_i128_with_scale(round.answer, round.decimals).map_err(|e| {
            SwapError::OracleUnavailable {
                reason: format!("round {} not representable: {e}", round.round_id),
            }
        })
    }

    /// Quote value of `amount` base units of the quoted asset.
    pub fn normalize(&self, amount: u128, now: DateTime<Utc>) -> Result<Decimal> {
        let price = self.latest_price(now)?;
        let raw = i128::try_from(amount).map_err(|_| SwapError::OracleUnavailable {
            reason: format!("amount {amount} out of range"),
        })?;
        let units = Decimal::try_from_i128_with_scale(raw, self.config.asset_decimals).map_err(
            |e| SwapError::OracleUnavailable {
                reason: format!("amount {amount} not representable: {e}"),
            },
        )?;
        units
            .checked_mul(price)
            .map(|v| v.normalize())
            .ok_or_else(|| SwapError::OracleUnavailable {
                reason: format!("value of {amount} overflows"),
            })
    }
}

/// Feed returning a fixed round. For tests and local setups.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Copy)]
pub struct StaticPriceFeed(pub PriceRound);

#[cfg(any(test, feature = "test-helpers"))]
impl StaticPriceFeed {
    /// Fresh round with `answer` at 8 decimals, as USD feeds report.
    #[must_use]
    pub fn usd(answer: i128) -> Self {
        Self(PriceRound {
            round_id: 1,
            answer,
            decimals: 8,
            updated_at: Utc::now(),
        })
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl PriceFeed for StaticPriceFeed {
    fn latest_round(&self) -> Result<PriceRound> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DownFeed;

    impl PriceFeed for DownFeed {
        fn latest_round(&self) -> Result<PriceRound> {
            Err(SwapError::OracleUnavailable {
                reason: "feed paused".into(),
            })
        }
    }

    fn config() -> OracleConfig {
        OracleConfig {
            feed_address: Address::from_index(77),
            quoted_asset: Some(Address::from_index(200)),
            asset_decimals: 18,
            max_staleness_secs: 3_600,
        }
    }

    #[test]
    fn price_scaled_by_feed_decimals() {
        // 2,000.50 USD at 8 decimals
        let oracle = OracleAdapter::new(config(), Arc::new(StaticPriceFeed::usd(200_050_000_000)));
        let price = oracle.latest_price(Utc::now()).unwrap();
        assert_eq!(price, Decimal::new(200_050, 2));
        assert_eq!(oracle.feed_address(), Address::from_index(77));
        assert_eq!(oracle.quoted_asset(), Some(Address::from_index(200)));
    }

    #[test]
    fn normalize_fee_amount() {
        // 0.2 tokens at 2,000 USD = 400 USD
        let oracle = OracleAdapter::new(config(), Arc::new(StaticPriceFeed::usd(200_000_000_000)));
        let value = oracle
            .normalize(200_000_000_000_000_000, Utc::now())
            .unwrap();
        assert_eq!(value, Decimal::new(400, 0));
    }

    #[test]
    fn stale_round_rejected() {
        let mut feed = StaticPriceFeed::usd(100_000_000);
        feed.0.updated_at = Utc::now() - chrono::Duration::hours(2);
        let oracle = OracleAdapter::new(config(), Arc::new(feed));
        let err = oracle.latest_price(Utc::now()).unwrap_err();
        assert!(matches!(err, SwapError::OracleStale { max_secs: 3_600, .. }));
    }

    #[test]
    fn future_round_rejected() {
        let mut feed = StaticPriceFeed::usd(100_000_000);
        let now = Utc::now();
        feed.0.updated_at = now + chrono::Duration::minutes(5);
        let oracle = OracleAdapter::new(config(), Arc::new(feed));
        assert!(matches!(
            oracle.latest_price(now).unwrap_err(),
            SwapError::OracleRoundInFuture { ahead_secs: 300 }
        ));
    }

    #[test]
    fn non_positive_answer_rejected() {
        let oracle = OracleAdapter::new(config(), Arc::new(StaticPriceFeed::usd(0)));
        assert!(matches!(
            oracle.latest_price(Utc::now()).unwrap_err(),
            SwapError::OracleInvalidAnswer(0)
        ));
    }

    #[test]
    fn feed_error_propagates() {
        let oracle = OracleAdapter::new(config(), Arc::new(DownFeed));
        assert!(matches!(
            oracle.normalize(1, Utc::now()).unwrap_err(),
            SwapError::OracleUnavailable { .. }
        ));
    }
}
