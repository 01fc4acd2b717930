//! System-wide constants for the SwapUp settlement engine.

/// Fee tiers are fractions of this denominator (basis points).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Basis points in one whole percent.
pub const BPS_PER_PERCENT: u64 = 100;

/// Default base tier: 1%.
pub const DEFAULT_BASE_FEE_BPS: u64 = 100;

/// Default currency tier: 1%.
pub const DEFAULT_CURRENCY_FEE_BPS: u64 = 100;

/// Default elevated currency tier: 2%.
pub const DEFAULT_ELEVATED_CURRENCY_FEE_BPS: u64 = 200;

/// Engine events retained before the oldest are dropped.
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 10_000;

/// Maximum legs on one side of a proposal.
pub const MAX_LEGS_PER_SIDE: usize = 64;

/// Maximum label length in bytes.
pub const MAX_LABEL_LEN: usize = 256;

/// Oracle answers older than this are treated as stale (seconds).
pub const DEFAULT_ORACLE_MAX_STALENESS_SECS: i64 = 3_600;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "SwapUp";
