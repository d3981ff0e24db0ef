//! Order specification types for user-facing API

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The slot an order occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Repays debt when the position's risk crosses a threshold
    StopLoss,
    /// Repays debt when a favorable threshold is reached
    TakeProfit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopLoss => f.write_str("StopLoss"),
            Self::TakeProfit => f.write_str("TakeProfit"),
        }
    }
}

/// What happens once an order is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum OrderAction {
    /// Repay all debt
    FullRepay,
    /// Repay the given amount of the single debt
    PartialRepay {
        /// Amount in the debt token's lamports
        repay_debt_amount: Decimal,
    },
}

impl OrderAction {
    /// Create a partial repay action
    pub fn partial_repay(repay_debt_amount: Decimal) -> Self {
        Self::PartialRepay { repay_debt_amount }
    }
}

/// Execution bonus range as `(min_bps, max_bps)`
pub type ExecutionBonusBpsRange = (Decimal, Decimal);

/// A high-level specification of an order, generic over the trigger family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSpecification<T> {
    /// When the order fires
    pub trigger: T,
    /// What the order does
    pub action: OrderAction,
    /// Bonus offered to the executor, in basis points; must satisfy `0 <= min <= max`
    pub execution_bonus_bps_range: ExecutionBonusBpsRange,
}

impl<T> OrderSpecification<T> {
    /// Create a specification
    pub fn new(
        trigger: T,
        action: OrderAction,
        execution_bonus_bps_range: ExecutionBonusBpsRange,
    ) -> Self {
        Self {
            trigger,
            action,
            execution_bonus_bps_range,
        }
    }
}
