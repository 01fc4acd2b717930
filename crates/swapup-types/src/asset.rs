//! Asset references: the legs of a swap.
//!
//! Callers submit legs in the overloaded wire form [`RawAssetRef`], where
//! `unit` is an amount for fungible contracts and an item id for unique-item
//! contracts. The engine resolves each raw leg exactly once, at submission,
//! into the tagged [`AssetRef`] by probing the contract's capability. After
//! that point the kind is never re-derived.

use serde::{Deserialize, Serialize};

use crate::Address;

/// The two asset capabilities a contract can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// Balance-based, interchangeable units.
    Fungible,
    /// Non-interchangeable items identified by id.
    Unique,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fungible => write!(f, "FUNGIBLE"),
            Self::Unique => write!(f, "UNIQUE"),
        }
    }
}

/// Unresolved leg as submitted by a caller: `{ contract, unit }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawAssetRef {
    pub contract: Address,
    pub unit: u128,
}

impl RawAssetRef {
    /// Raw leg as submitted.
    #[must_use]
    pub fn new(contract: Address, unit: u128) -> Self {
        Self { contract, unit }
    }

    /// Attach the detected kind, producing the tagged form.
    #[must_use]
    pub fn with_kind(self, kind: AssetKind) -> AssetRef {
        match kind {
            AssetKind::Fungible => AssetRef::Fungible {
                contract: self.contract,
                amount: self.unit,
            },
            AssetKind::Unique => AssetRef::Unique {
                contract: self.contract,
                item_id: self.unit,
            },
        }
    }
}

/// A resolved swap leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRef {
    Fungible { contract: Address, amount: u128 },
    Unique { contract: Address, item_id: u128 },
}

impl AssetRef {
    /// Fungible leg of `amount` base units.
    #[must_use]
    pub fn fungible(contract: Address, amount: u128) -> Self {
        Self::Fungible { contract, amount }
    }

    /// Leg moving one item.
    #[must_use]
    pub fn unique(contract: Address, item_id: u128) -> Self {
        Self::Unique { contract, item_id }
    }

    /// Contract the leg lives on.
    #[must_use]
    pub fn contract(&self) -> Address {
        match self {
            Self::Fungible { contract, .. } | Self::Unique { contract, .. } => *contract,
        }
    }

    /// Which interface the contract exposes.
    #[must_use]
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Fungible { .. } => AssetKind::Fungible,
            Self::Unique { .. } => AssetKind::Unique,
        }
    }

    /// The raw `unit` value: amount or item id.
    #[must_use]
    pub fn unit(&self) -> u128 {
        match self {
            Self::Fungible { amount, .. } => *amount,
            Self::Unique { item_id, .. } => *item_id,
        }
    }

    /// Whether the leg is fungible.
    #[must_use]
    pub fn is_fungible(&self) -> bool {
        matches!(self, Self::Fungible { .. })
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fungible { contract, amount } => write!(f, "{amount} of {contract}"),
            Self::Unique { contract, item_id } => write!(f, "item #{item_id} of {contract}"),
        }
    }
}
