//! Construction-time configuration for a SwapUp engine.
//!
//! Everything here is fixed for the engine's lifetime except the fee tiers,
//! which the owner may update through the admin setters.

use serde::{Deserialize, Serialize};

use crate::{constants, Address, FeeTier, FeeTiers, Result, SwapError};

/// How strictly a confirming call must agree with the open proposal beyond
/// the content fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchStrictness {
    /// Label, declared counterparty, and visibility mismatches are logged
    /// and tolerated.
    #[default]
    Lenient,
    /// Label, declared counterparty, and visibility must equal the proposal's.
    Strict,
}

/// Built-in tier-selection policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TierPolicyConfig {
    /// One-for-one swaps use the elevated currency tier, everything else the
    /// base tier.
    #[default]
    SwapShape,
    /// Always use the named tier.
    Fixed(FeeTier),
}

/// Price feed wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Address of the external feed. Informational; reads go through the
    /// injected feed handle.
    pub feed_address: Address,
    /// Fungible contract whose amounts the feed prices. Fees collected in
    /// this asset are normalized on receipts.
    #[serde(default)]
    pub quoted_asset: Option<Address>,
    /// Decimals of the quoted asset's base unit.
    #[serde(default = "default_asset_decimals")]
    pub asset_decimals: u32,
    /// Maximum accepted age of the latest round, in seconds.
    #[serde(default = "default_max_staleness")]
    pub max_staleness_secs: i64,
}

fn default_asset_decimals() -> u32 {
    18
}

fn default_max_staleness() -> i64 {
    constants::DEFAULT_ORACLE_MAX_STALENESS_SECS
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The only address allowed to change fee tiers.
    pub owner: Address,
    /// Destination of every collected fee. No runtime setter.
    pub treasury: Address,
    /// The engine's own address: the spender / operator that asset owners
    /// authorize before swapping.
    pub engine_address: Address,
    #[serde(default)]
    pub fee_tiers: FeeTiers,
    #[serde(default)]
    pub tier_policy: TierPolicyConfig,
    #[serde(default)]
    pub strictness: MatchStrictness,
    #[serde(default)]
    pub oracle: Option<OracleConfig>,
    /// Events retained by the engine; the oldest are dropped first.
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,
}

fn default_event_log_capacity() -> usize {
    constants::DEFAULT_EVENT_LOG_CAPACITY
}

impl EngineConfig {
    /// Config with default tiers, lenient matching, and no oracle.
    #[must_use]
    pub fn new(owner: Address, treasury: Address, engine_address: Address) -> Self {
        Self {
            owner,
            treasury,
            engine_address,
            fee_tiers: FeeTiers::default(),
            tier_policy: TierPolicyConfig::default(),
            strictness: MatchStrictness::default(),
            oracle: None,
            event_log_capacity: constants::DEFAULT_EVENT_LOG_CAPACITY,
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_zero() {
            return Err(SwapError::Configuration("owner must not be the zero address".into()));
        }
        if self.treasury.is_zero() {
            return Err(SwapError::Configuration(
                "treasury must not be the zero address".into(),
            ));
        }
        if self.engine_address.is_zero() {
            return Err(SwapError::Configuration(
                "engine_address must not be the zero address".into(),
            ));
        }
        if self.event_log_capacity == 0 {
            return Err(SwapError::Configuration(
                "event_log_capacity must be > 0".into(),
            ));
        }
        if let Some(oracle) = &self.oracle {
            if oracle.max_staleness_secs <= 0 {
                return Err(SwapError::Configuration(
                    "oracle.max_staleness_secs must be > 0".into(),
                ));
            }
            if oracle.asset_decimals > 28 {
                return Err(SwapError::Configuration(format!(
                    "oracle.asset_decimals {} exceeds 28",
                    oracle.asset_decimals
                )));
            }
        }
        Ok(())
    }
}
