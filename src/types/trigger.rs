//! Trigger types of the two order families

use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A trigger of an LTV-based order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum LtvBasedOrderTrigger {
    /// Stop-loss when the LTV rises above the given percentage
    StopLoss { when_ltv_pct_above: Decimal },
    /// Take-profit when the LTV falls below the given percentage
    TakeProfit { when_ltv_pct_below: Decimal },
}

impl fmt::Display for LtvBasedOrderTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopLoss { .. } => f.write_str("StopLoss"),
            Self::TakeProfit { .. } => f.write_str("TakeProfit"),
        }
    }
}

/// A trigger of a price-based order, depending on the position's type and the bracket's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum PriceBasedOrderTrigger {
    /// Stop-loss on a long position
    LongStopLoss {
        when_collateral_price_below: Decimal,
    },
    /// Take-profit on a long position
    LongTakeProfit {
        when_collateral_price_above: Decimal,
    },
    /// Stop-loss on a short position
    ShortStopLoss { when_debt_price_above: Decimal },
    /// Take-profit on a short position
    ShortTakeProfit { when_debt_price_below: Decimal },
}

impl PriceBasedOrderTrigger {
    /// The trigger price, whichever token it is quoted for
    pub fn price(&self) -> Decimal {
        match *self {
            Self::LongStopLoss {
                when_collateral_price_below: price,
            }
            | Self::LongTakeProfit {
                when_collateral_price_above: price,
            }
            | Self::ShortStopLoss {
                when_debt_price_above: price,
            }
            | Self::ShortTakeProfit {
                when_debt_price_below: price,
            } => price,
        }
    }
}

impl fmt::Display for PriceBasedOrderTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LongStopLoss { .. } => "LongStopLoss",
            Self::LongTakeProfit { .. } => "LongTakeProfit",
            Self::ShortStopLoss { .. } => "ShortStopLoss",
            Self::ShortTakeProfit { .. } => "ShortTakeProfit",
        };
        f.write_str(name)
    }
}

/// Economic direction of a single-collateral, single-debt position against a stablecoin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionType {
    /// Volatile collateral, stablecoin debt
    Long,
    /// Stablecoin collateral, volatile debt
    Short,
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => f.write_str("Long"),
            Self::Short => f.write_str("Short"),
        }
    }
}

/// A token given either by its symbol or by its mint address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymbolOrMint {
    Mint(Address),
    Symbol(String),
}

impl From<&str> for SymbolOrMint {
    fn from(symbol: &str) -> Self {
        Self::Symbol(symbol.to_string())
    }
}

impl From<String> for SymbolOrMint {
    fn from(symbol: String) -> Self {
        Self::Symbol(symbol)
    }
}

impl From<Address> for SymbolOrMint {
    fn from(mint: Address) -> Self {
        Self::Mint(mint)
    }
}

impl FromStr for SymbolOrMint {
    type Err = Infallible;

    /// Parses a mint address if the string is one, a symbol otherwise
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = match s.parse::<Address>() {
            Ok(mint) => Self::Mint(mint),
            Err(_) => Self::Symbol(s.to_string()),
        };
        Ok(token)
    }
}

impl fmt::Display for SymbolOrMint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mint(mint) => write!(f, "{mint}"),
            Self::Symbol(symbol) => f.write_str(symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_symbol_or_mint_parsing() {
        let symbol: SymbolOrMint = "USDC".parse().unwrap();
        assert_eq!(symbol, SymbolOrMint::Symbol("USDC".into()));

        let mint: SymbolOrMint = "0x0000000000000000000000000000000000000001"
            .parse()
            .unwrap();
        assert!(matches!(mint, SymbolOrMint::Mint(_)));
    }

    #[test]
    fn test_trigger_serde() {
        let trigger = PriceBasedOrderTrigger::LongTakeProfit {
            when_collateral_price_above: dec!(200),
        };
        let json = serde_json::to_string(&trigger).unwrap();
        assert_eq!(
            json,
            r#"{"type":"LongTakeProfit","whenCollateralPriceAbove":"200"}"#
        );
        let parsed: PriceBasedOrderTrigger = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, trigger);
    }
}
