//! Contexts the order translation runs against

use crate::market::Market;
use crate::obligation::Obligation;
use crate::types::SymbolOrMint;

/// The market and obligation snapshots an order is translated against
///
/// Both are borrowed read-only for the duration of a single call.
#[derive(Debug, Clone, Copy)]
pub struct OrderContext<'a> {
    pub market: &'a Market,
    pub obligation: &'a Obligation,
}

impl<'a> OrderContext<'a> {
    /// Create a context
    pub fn new(market: &'a Market, obligation: &'a Obligation) -> Self {
        Self { market, obligation }
    }
}

/// An extended [`OrderContext`] needed to interpret orders on USD positions
///
/// A USD position is a single-debt, single-collateral obligation which either deposits or
/// borrows a stablecoin (i.e. a long or short position of some token against a stablecoin).
#[derive(Debug, Clone, Copy)]
pub struct PriceBasedOrderContext<'a> {
    pub base: OrderContext<'a>,
    /// Tokens considered stablecoins
    pub stablecoins: &'a [SymbolOrMint],
}

impl<'a> PriceBasedOrderContext<'a> {
    /// Create a context
    pub fn new(
        market: &'a Market,
        obligation: &'a Obligation,
        stablecoins: &'a [SymbolOrMint],
    ) -> Self {
        Self {
            base: OrderContext::new(market, obligation),
            stablecoins,
        }
    }
}
