//! Translation steps shared by all order families

use super::OrderContext;
use crate::constants::{bps_to_fraction, fraction_to_bps};
use crate::error::{ErrorKind, Result};
use crate::order::{ObligationOrder, OrderCondition, OrderOpportunity};
use crate::types::{ExecutionBonusBpsRange, OrderAction, OrderSpecification, OrderType};
use crate::validation::{check_that, get_single_element};
use rust_decimal::Decimal;

/// The obligation's slot holding orders of the given type
pub fn to_order_index(order_type: OrderType) -> u8 {
    match order_type {
        OrderType::StopLoss => 0,
        OrderType::TakeProfit => 1,
    }
}

/// Build an order of the given condition and specification
///
/// Fails if the condition is already met by the context's obligation: an order must not be
/// executable the moment it is set.
pub fn create_condition_based_order<T>(
    context: &OrderContext<'_>,
    condition: OrderCondition,
    specification: &OrderSpecification<T>,
) -> Result<ObligationOrder> {
    let hit = condition.evaluate(context.obligation)?;
    check_that(hit.is_none(), ErrorKind::Timing, || {
        "cannot create an immediately-triggered order".to_string()
    })?;
    let opportunity = to_order_opportunity(context, &specification.action)?;
    let (min_execution_bonus_rate, max_execution_bonus_rate) =
        to_execution_bonus_rates(specification.execution_bonus_bps_range)?;
    Ok(ObligationOrder::new(
        condition,
        opportunity,
        min_execution_bonus_rate,
        max_execution_bonus_rate,
    ))
}

/// Recover a specification (with the already-resolved trigger) from a stored order
pub fn read_trigger_based_order<T>(order: &ObligationOrder, trigger: T) -> OrderSpecification<T> {
    OrderSpecification {
        trigger,
        action: to_action(&order.opportunity),
        execution_bonus_bps_range: to_execution_bonus_bps(
            order.min_execution_bonus_rate,
            order.max_execution_bonus_rate,
        ),
    }
}

/// Convert an action to the opportunity offered on-chain
pub fn to_order_opportunity(
    context: &OrderContext<'_>,
    action: &OrderAction,
) -> Result<OrderOpportunity> {
    match *action {
        OrderAction::FullRepay => Ok(OrderOpportunity::DeleverageAllDebt),
        OrderAction::PartialRepay { repay_debt_amount } => {
            check_that(repay_debt_amount > Decimal::ZERO, ErrorKind::Range, || {
                format!("repay amount must be positive; got {repay_debt_amount}")
            })?;
            let borrow = get_single_element(context.obligation.borrows.values(), "borrow")?;
            check_that(repay_debt_amount <= borrow.amount, ErrorKind::Range, || {
                format!(
                    "partial repay amount {} cannot exceed the borrowed amount {}",
                    repay_debt_amount, borrow.amount
                )
            })?;
            Ok(OrderOpportunity::DeleverageDebtAmount {
                amount: repay_debt_amount,
            })
        }
    }
}

/// Convert a `(min_bps, max_bps)` range to `(min_rate, max_rate)` fractions
pub fn to_execution_bonus_rates(
    execution_bonus_bps_range: ExecutionBonusBpsRange,
) -> Result<(Decimal, Decimal)> {
    let (min_bps, max_bps) = execution_bonus_bps_range;
    let min_rate = bps_to_fraction(min_bps);
    let max_rate = bps_to_fraction(max_bps);
    check_that(min_rate >= Decimal::ZERO, ErrorKind::Range, || {
        format!("execution bonus rate cannot be negative: {min_rate}")
    })?;
    check_that(max_rate >= min_rate, ErrorKind::Range, || {
        format!("max execution bonus rate {max_rate} cannot be lower than min {min_rate}")
    })?;
    Ok((min_rate, max_rate))
}

fn to_action(opportunity: &OrderOpportunity) -> OrderAction {
    match *opportunity {
        OrderOpportunity::DeleverageAllDebt => OrderAction::FullRepay,
        OrderOpportunity::DeleverageDebtAmount { amount } => OrderAction::PartialRepay {
            repay_debt_amount: amount,
        },
    }
}

fn to_execution_bonus_bps(min_rate: Decimal, max_rate: Decimal) -> ExecutionBonusBpsRange {
    (fraction_to_bps(min_rate), fraction_to_bps(max_rate))
}
