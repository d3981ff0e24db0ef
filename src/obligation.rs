//! Obligation (lending position) snapshot
//!
//! An obligation collects a user's deposits and borrows within one market and
//! holds up to [`ORDER_SLOTS`] automated orders.

use crate::constants::{checked_div, ORDER_SLOTS};
use crate::contracts::ObligationOrderState;
use crate::error::{ErrorKind, OrderError, Result};
use crate::market::Market;
use crate::order::{ObligationOrder, ObligationOrderAtIndex};
use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single deposit or borrow of an obligation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Reserve the tokens are deposited to / borrowed from
    pub reserve_address: Address,
    /// Token mint
    pub mint_address: Address,
    /// Amount in the token's smallest units (lamports)
    pub amount: Decimal,
    /// Market value of the whole amount, refreshed with current prices
    pub market_value: Decimal,
    /// `10^decimals` of the token
    pub mint_factor: Decimal,
}

impl Position {
    /// Create a position from a whole-token amount and a token price
    ///
    /// E.g. `Position::from_tokens(reserve, mint, dec!(2.5), dec!(100), 9)` is 2.5 tokens
    /// with 9 decimals, worth 250.
    pub fn from_tokens(
        reserve_address: Address,
        mint_address: Address,
        tokens: Decimal,
        price: Decimal,
        decimals: u32,
    ) -> Result<Self> {
        let mint_factor = 10i128
            .checked_pow(decimals)
            .and_then(|factor| Decimal::try_from_i128_with_scale(factor, 0).ok())
            .ok_or_else(|| {
                OrderError::new(
                    ErrorKind::Range,
                    format!("unsupported token decimals: {decimals}"),
                )
            })?;
        let amount = tokens.checked_mul(mint_factor).ok_or_else(|| {
            OrderError::new(
                ErrorKind::Range,
                format!("{tokens} tokens with {decimals} decimals overflow"),
            )
        })?;
        let market_value = tokens.checked_mul(price).ok_or_else(|| {
            OrderError::new(
                ErrorKind::Range,
                format!("value of {tokens} tokens at {price} overflows"),
            )
        })?;
        Ok(Self {
            reserve_address,
            mint_address,
            amount,
            market_value,
            mint_factor,
        })
    }

    /// Price of a single whole token
    pub fn token_price(&self) -> Result<Decimal> {
        checked_div(self.market_value * self.mint_factor, self.amount)
    }
}

/// Aggregated values of an obligation, refreshed with current prices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligationStats {
    pub user_total_deposit: Decimal,
    pub user_total_borrow: Decimal,
    pub user_total_borrow_borrow_factor_adjusted: Decimal,
    pub borrow_liquidation_limit: Decimal,
}

impl ObligationStats {
    /// Compute the stats of the given deposits and borrows
    pub fn compute<'a>(
        market: &Market,
        deposits: impl IntoIterator<Item = &'a Position>,
        borrows: impl IntoIterator<Item = &'a Position>,
    ) -> Result<Self> {
        let mut stats = Self::default();
        for deposit in deposits {
            let reserve = market.get_existing_reserve_by_address(&deposit.reserve_address)?;
            stats.user_total_deposit += deposit.market_value;
            stats.borrow_liquidation_limit += deposit.market_value * reserve.liquidation_ltv();
        }
        for borrow in borrows {
            let reserve = market.get_existing_reserve_by_address(&borrow.reserve_address)?;
            stats.user_total_borrow += borrow.market_value;
            stats.user_total_borrow_borrow_factor_adjusted +=
                borrow.market_value * reserve.borrow_factor();
        }
        Ok(stats)
    }
}

/// A snapshot of a single obligation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obligation {
    /// Obligation address
    pub address: Address,
    /// Deposits by reserve address
    pub deposits: BTreeMap<Address, Position>,
    /// Borrows by reserve address
    pub borrows: BTreeMap<Address, Position>,
    /// Refreshed stats
    pub stats: ObligationStats,
    /// Order slots (stop-loss at 0, take-profit at 1)
    pub orders: [Option<ObligationOrder>; ORDER_SLOTS],
}

impl Obligation {
    /// Create an empty obligation
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    /// Add a deposit
    pub fn with_deposit(mut self, deposit: Position) -> Self {
        self.deposits.insert(deposit.reserve_address, deposit);
        self
    }

    /// Add a borrow
    pub fn with_borrow(mut self, borrow: Position) -> Self {
        self.borrows.insert(borrow.reserve_address, borrow);
        self
    }

    /// Recompute the stats from the current deposits and borrows
    pub fn refreshed(mut self, market: &Market) -> Result<Self> {
        self.stats =
            ObligationStats::compute(market, self.deposits.values(), self.borrows.values())?;
        Ok(self)
    }

    /// Replace the orders with the ones decoded from raw on-chain records
    pub fn with_order_states(
        mut self,
        states: &[ObligationOrderState; ORDER_SLOTS],
    ) -> Result<Self> {
        for (slot, state) in self.orders.iter_mut().zip(states) {
            *slot = ObligationOrder::from_state(state)?;
        }
        Ok(self)
    }

    /// Apply a slot update, as the on-chain program does when it is submitted
    pub fn apply_order_update(&mut self, update: &ObligationOrderAtIndex) -> Result<()> {
        let slot = self.orders.get_mut(update.index as usize).ok_or_else(|| {
            OrderError::new(
                ErrorKind::Range,
                format!(
                    "order index {} is outside of {ORDER_SLOTS} slots",
                    update.index
                ),
            )
        })?;
        *slot = update.order.clone();
        Ok(())
    }

    /// All deposits
    pub fn get_deposits(&self) -> Vec<&Position> {
        self.deposits.values().collect()
    }

    /// All borrows
    pub fn get_borrows(&self) -> Vec<&Position> {
        self.borrows.values().collect()
    }

    /// The borrow of the given mint, if any
    pub fn get_borrow_by_mint(&self, mint: &Address) -> Option<&Position> {
        self.borrows
            .values()
            .find(|borrow| borrow.mint_address == *mint)
    }

    /// The order slots
    pub fn get_orders(&self) -> &[Option<ObligationOrder>; ORDER_SLOTS] {
        &self.orders
    }

    /// Borrow-factor-adjusted borrow value divided by the deposit value
    ///
    /// Note: this takes *all* deposits into account (including 0-LTV ones), the
    /// same way the on-chain program computes it for order evaluation.
    pub fn loan_to_value(&self) -> Decimal {
        self.ratio_to_deposit(self.stats.user_total_borrow_borrow_factor_adjusted)
    }

    /// The LTV at which the obligation becomes subject to liquidation
    pub fn liquidation_ltv(&self) -> Decimal {
        self.ratio_to_deposit(self.stats.borrow_liquidation_limit)
    }

    /// Raw borrow value divided by the deposit value
    pub fn no_bf_loan_to_value(&self) -> Decimal {
        self.ratio_to_deposit(self.stats.user_total_borrow)
    }

    /// Liquidation LTV of a single deposit reserve of this obligation
    pub fn get_liquidation_ltv_for_reserve(
        &self,
        market: &Market,
        reserve_address: &Address,
    ) -> Result<Decimal> {
        let reserve = market.get_existing_reserve_by_address(reserve_address)?;
        Ok(reserve.liquidation_ltv())
    }

    fn ratio_to_deposit(&self, value: Decimal) -> Decimal {
        if self.stats.user_total_deposit.is_zero() {
            return Decimal::ZERO;
        }
        value / self.stats.user_total_deposit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_kind;
    use crate::order::{OrderCondition, OrderOpportunity};
    use crate::test_fixtures::{ltv_obligation, market, SOL_MINT, SOL_RESERVE};
    use rust_decimal_macros::dec;

    #[test]
    fn test_position_from_tokens() {
        let position =
            Position::from_tokens(SOL_RESERVE, SOL_MINT, dec!(2.5), dec!(100), 9).unwrap();
        assert_eq!(position.amount, dec!(2500000000));
        assert_eq!(position.market_value, dec!(250));
        assert_eq!(position.token_price().unwrap(), dec!(100));

        // 10^24 still fits in a decimal
        let position = Position::from_tokens(SOL_RESERVE, SOL_MINT, dec!(1), dec!(1), 24).unwrap();
        assert_eq!(position.mint_factor, dec!(1000000000000000000000000));
    }

    #[test]
    fn test_position_from_tokens_rejects_overflow() {
        let err = Position::from_tokens(SOL_RESERVE, SOL_MINT, dec!(1), dec!(1), 40).unwrap_err();
        assert_eq!(err.to_string(), "unsupported token decimals: 40");
        assert_eq!(error_kind(&err), Some(ErrorKind::Range));

        let err = Position::from_tokens(SOL_RESERVE, SOL_MINT, dec!(1000000000), dec!(1), 24)
            .unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Range));
    }

    #[test]
    fn test_deposits_and_borrows() {
        let obligation = ltv_obligation(dec!(500));
        let deposits = obligation.get_deposits();
        assert_eq!(deposits.len(), 1);
        assert_eq!(deposits[0].mint_address, SOL_MINT);
        assert_eq!(obligation.get_borrows().len(), 1);
        assert_eq!(obligation.get_borrow_by_mint(&SOL_MINT), None);
    }

    #[test]
    fn test_with_order_states() {
        let order = ObligationOrder::new(
            OrderCondition::UserLtvBelow {
                max_user_ltv_exclusive: dec!(0.35),
            },
            OrderOpportunity::DeleverageAllDebt,
            dec!(0.001),
            dec!(0.0125),
        );
        let states = [ObligationOrderState::null(), order.to_state().unwrap()];
        let obligation = ltv_obligation(dec!(500));
        let obligation = obligation.with_order_states(&states).unwrap();
        assert_eq!(obligation.get_orders(), &[None, Some(order)]);

        let corrupted = [
            ObligationOrderState {
                conditionType: 7,
                ..Default::default()
            },
            ObligationOrderState::null(),
        ];
        let obligation = ltv_obligation(dec!(500));
        let err = obligation.with_order_states(&corrupted).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Compatibility));
    }

    #[test]
    fn test_ltvs() {
        // 1000 of SOL (75% liquidation threshold) against 500 of USDC
        let obligation = ltv_obligation(dec!(500));
        assert_eq!(obligation.loan_to_value(), dec!(0.5));
        assert_eq!(obligation.no_bf_loan_to_value(), dec!(0.5));
        assert_eq!(obligation.liquidation_ltv(), dec!(0.75));
        let sol_ltv = obligation.get_liquidation_ltv_for_reserve(&market(), &SOL_RESERVE);
        assert_eq!(sol_ltv.unwrap(), dec!(0.75));
    }

    #[test]
    fn test_empty_obligation_ltv_is_zero() {
        let obligation = Obligation::new(Address::ZERO);
        assert_eq!(obligation.loan_to_value(), Decimal::ZERO);
        assert_eq!(obligation.liquidation_ltv(), Decimal::ZERO);
    }

    #[test]
    fn test_apply_order_update_rejects_unknown_slot() {
        let mut obligation = Obligation::new(Address::ZERO);
        let update = ObligationOrderAtIndex::empty(1);
        assert!(obligation.apply_order_update(&update).is_ok());
        let update = ObligationOrderAtIndex::empty(2);
        assert!(obligation.apply_order_update(&update).is_err());
    }
}
