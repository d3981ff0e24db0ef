//! Configuration for price-based order translation

use crate::error::{Context, Result};
use crate::market::Market;
use crate::obligation::Obligation;
use crate::orders::PriceBasedOrderContext;
use crate::types::SymbolOrMint;
use serde::{Deserialize, Serialize};

/// Order translation configuration
///
/// Every listed stablecoin must be a reserve of the market the orders are translated
/// against, since position classification resolves all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfig {
    /// Tokens considered stablecoins (by symbol or mint address)
    pub stablecoins: Vec<SymbolOrMint>,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderConfig {
    /// Create the default configuration (USDC as the only stablecoin)
    pub fn new() -> Self {
        Self {
            stablecoins: vec![SymbolOrMint::from("USDC")],
        }
    }

    /// Add a stablecoin
    pub fn with_stablecoin(mut self, stablecoin: impl Into<SymbolOrMint>) -> Self {
        let stablecoin = stablecoin.into();
        if !self.stablecoins.contains(&stablecoin) {
            self.stablecoins.push(stablecoin);
        }
        self
    }

    /// Replace the stablecoin list
    pub fn with_stablecoins<I, T>(mut self, stablecoins: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SymbolOrMint>,
    {
        self.stablecoins = stablecoins.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse order config")
    }

    /// Build a price-based order context over the configured stablecoins
    pub fn price_based_context<'a>(
        &'a self,
        market: &'a Market,
        obligation: &'a Obligation,
    ) -> PriceBasedOrderContext<'a> {
        PriceBasedOrderContext::new(market, obligation, &self.stablecoins)
    }
}
