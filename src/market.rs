//! Lending market snapshot
//!
//! The market is fetched by the caller (outside of this crate) and is only read
//! by the order translation engine.

use crate::constants::pct_to_fraction;
use crate::error::{Context, ErrorKind, OrderError, Result};
use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration of a single reserve (one lendable token) of a market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reserve {
    /// Reserve address
    pub address: Address,
    /// Token symbol (e.g. "USDC")
    pub symbol: String,
    /// Underlying token mint address
    pub mint: Address,
    /// Max LTV of this collateral, in percents (e.g. 75)
    pub loan_to_value_pct: u8,
    /// Liquidation threshold of this collateral, in percents (e.g. 85)
    pub liquidation_threshold_pct: u8,
    /// Borrow factor of this debt, in percents (100 = no adjustment)
    #[serde(default = "default_borrow_factor_pct")]
    pub borrow_factor_pct: u16,
}

fn default_borrow_factor_pct() -> u16 {
    100
}

impl Reserve {
    /// Create a reserve with the given address, symbol, mint and LTV settings
    pub fn new(
        address: Address,
        symbol: impl Into<String>,
        mint: Address,
        loan_to_value_pct: u8,
        liquidation_threshold_pct: u8,
    ) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            mint,
            loan_to_value_pct,
            liquidation_threshold_pct,
            borrow_factor_pct: default_borrow_factor_pct(),
        }
    }

    /// Set the borrow factor (in percents)
    pub fn with_borrow_factor_pct(mut self, borrow_factor_pct: u16) -> Self {
        self.borrow_factor_pct = borrow_factor_pct;
        self
    }

    /// Liquidation threshold as a fraction (e.g. `0.85`)
    pub fn liquidation_ltv(&self) -> Decimal {
        pct_to_fraction(Decimal::from(self.liquidation_threshold_pct))
    }

    /// Borrow factor as a multiplier (e.g. `1.25`)
    pub fn borrow_factor(&self) -> Decimal {
        pct_to_fraction(Decimal::from(self.borrow_factor_pct))
    }
}

/// A snapshot of a lending market's reserves
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Market {
    /// Market address
    pub address: Address,
    #[serde(with = "reserves_as_list")]
    reserves: HashMap<Address, Reserve>,
}

/// Serializes the reserves map as a plain list of reserves
mod reserves_as_list {
    use super::Reserve;
    use alloy::primitives::Address;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S: Serializer>(
        reserves: &HashMap<Address, Reserve>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(reserves.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<Address, Reserve>, D::Error> {
        let reserves = Vec::<Reserve>::deserialize(deserializer)?;
        Ok(reserves
            .into_iter()
            .map(|reserve| (reserve.address, reserve))
            .collect())
    }
}

impl Market {
    /// Create a market from its reserves
    pub fn new(address: Address, reserves: impl IntoIterator<Item = Reserve>) -> Self {
        Self {
            address,
            reserves: reserves
                .into_iter()
                .map(|reserve| (reserve.address, reserve))
                .collect(),
        }
    }

    /// Parse a market snapshot from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse market snapshot")
    }

    /// Iterate over all reserves
    pub fn reserves(&self) -> impl Iterator<Item = &Reserve> {
        self.reserves.values()
    }

    /// Look up a reserve by its address
    pub fn get_reserve_by_address(&self, address: &Address) -> Option<&Reserve> {
        self.reserves.get(address)
    }

    /// Look up a reserve by its address, failing if it does not exist
    pub fn get_existing_reserve_by_address(&self, address: &Address) -> Result<&Reserve> {
        self.get_reserve_by_address(address).ok_or_else(|| {
            OrderError::new(
                ErrorKind::UnknownReserve,
                format!("reserve {address} not found in market {}", self.address),
            )
            .into()
        })
    }

    /// Look up a reserve by its token symbol, failing if it does not exist
    pub fn get_existing_reserve_by_symbol(&self, symbol: &str) -> Result<&Reserve> {
        self.reserves
            .values()
            .find(|reserve| reserve.symbol == symbol)
            .ok_or_else(|| {
                OrderError::new(
                    ErrorKind::UnknownReserve,
                    format!(
                        "reserve with symbol {symbol} not found in market {}",
                        self.address
                    ),
                )
                .into()
            })
    }

    /// Look up a reserve by its underlying mint, failing if it does not exist
    pub fn get_existing_reserve_by_mint(&self, mint: &Address) -> Result<&Reserve> {
        self.reserves
            .values()
            .find(|reserve| reserve.mint == *mint)
            .ok_or_else(|| {
                OrderError::new(
                    ErrorKind::UnknownReserve,
                    format!(
                        "reserve with mint {mint} not found in market {}",
                        self.address
                    ),
                )
                .into()
            })
    }
}
