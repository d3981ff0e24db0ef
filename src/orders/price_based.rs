//! Price-based orders on USD positions
//!
//! A USD position borrows a stablecoin against a volatile collateral (long) or the other
//! way round (short). Its orders are triggered by the volatile token's price, which is
//! stored on-chain as a debt/collateral price ratio:
//!
//! | Position | Order       | Trigger                    | On-chain condition            |
//! |----------|-------------|----------------------------|-------------------------------|
//! | Long     | stop-loss   | collateral price below `P` | debt/coll ratio above `1 / P` |
//! | Long     | take-profit | collateral price above `P` | debt/coll ratio below `1 / P` |
//! | Short    | stop-loss   | debt price above `P`       | debt/coll ratio above `P`     |
//! | Short    | take-profit | debt price below `P`       | debt/coll ratio below `P`     |

use super::family::{create_order, read_order, OrderFamily};
use super::position::resolve_position_type;
use super::{OrderContext, PriceBasedOrderContext};
use crate::constants::checked_div;
use crate::error::{ErrorKind, OrderError, Result};
use crate::order::{ObligationOrderAtIndex, OrderCondition};
use crate::types::{OrderSpecification, OrderType, PositionType, PriceBasedOrderTrigger};
use crate::validation::check_that;
use rust_decimal::Decimal;

/// A high-level specification of a price-based order
pub type PriceBasedOrderSpecification = OrderSpecification<PriceBasedOrderTrigger>;

/// Creates a price-based order slot update from the given stop-loss or take-profit specification
///
/// The returned value replaces (or cancels, if the specification is `None`) the obligation's
/// stop-loss or take-profit order once submitted on-chain.
///
/// The obligation is expected to be a USD position (see [`resolve_position_type`]), and the
/// trigger must match both the order type and the position type.
pub fn create_price_based_order_for_usd_position(
    context: &PriceBasedOrderContext<'_>,
    order_type: OrderType,
    specification: Option<&PriceBasedOrderSpecification>,
) -> Result<ObligationOrderAtIndex> {
    create_order(context, order_type, specification)
}

/// Parses the specification of the selected stop-loss or take-profit order of the obligation
///
/// The obligation is expected to be a USD position, and the selected order is expected to be
/// of matching type (i.e. as if it was created by [`create_price_based_order_for_usd_position`]).
pub fn read_price_based_order_for_usd_position(
    context: &PriceBasedOrderContext<'_>,
    order_type: OrderType,
) -> Result<Option<PriceBasedOrderSpecification>> {
    read_order(context, order_type)
}

impl OrderFamily for PriceBasedOrderContext<'_> {
    type Trigger = PriceBasedOrderTrigger;
    type Compatibility = PositionType;

    const NAME: &'static str = "price-based";

    fn order_context(&self) -> &OrderContext<'_> {
        &self.base
    }

    fn check_compatible(&self) -> Result<PositionType> {
        resolve_position_type(self)
    }

    fn to_condition(
        position_type: PositionType,
        order_type: OrderType,
        trigger: &PriceBasedOrderTrigger,
    ) -> Result<OrderCondition> {
        use PriceBasedOrderTrigger::*;
        let price = trigger.price();
        let condition = match (position_type, order_type, *trigger) {
            (PositionType::Long, OrderType::StopLoss, LongStopLoss { .. }) => {
                OrderCondition::DebtCollPriceRatioAbove {
                    min_debt_coll_price_ratio_exclusive: invert_price_ratio(price)?,
                }
            }
            (PositionType::Long, OrderType::TakeProfit, LongTakeProfit { .. }) => {
                OrderCondition::DebtCollPriceRatioBelow {
                    max_debt_coll_price_ratio_exclusive: invert_price_ratio(price)?,
                }
            }
            (PositionType::Short, OrderType::StopLoss, ShortStopLoss { .. }) => {
                OrderCondition::DebtCollPriceRatioAbove {
                    min_debt_coll_price_ratio_exclusive: positive_price(price)?,
                }
            }
            (PositionType::Short, OrderType::TakeProfit, ShortTakeProfit { .. }) => {
                OrderCondition::DebtCollPriceRatioBelow {
                    max_debt_coll_price_ratio_exclusive: positive_price(price)?,
                }
            }
            _ => {
                return Err(OrderError::new(
                    ErrorKind::Compatibility,
                    format!(
                        "{} cannot use {trigger} condition",
                        describe_order(order_type, position_type)
                    ),
                )
                .into())
            }
        };
        Ok(condition)
    }

    fn to_trigger(
        position_type: PositionType,
        condition: &OrderCondition,
        order_type: OrderType,
    ) -> Result<PriceBasedOrderTrigger> {
        use OrderCondition::*;
        let threshold = condition.threshold();
        match (position_type, order_type, *condition) {
            (PositionType::Long, OrderType::StopLoss, DebtCollPriceRatioAbove { .. }) => {
                Ok(PriceBasedOrderTrigger::LongStopLoss {
                    when_collateral_price_below: invert_price_ratio(threshold)?,
                })
            }
            (PositionType::Long, OrderType::TakeProfit, DebtCollPriceRatioBelow { .. }) => {
                Ok(PriceBasedOrderTrigger::LongTakeProfit {
                    when_collateral_price_above: invert_price_ratio(threshold)?,
                })
            }
            (PositionType::Short, OrderType::StopLoss, DebtCollPriceRatioAbove { .. }) => {
                Ok(PriceBasedOrderTrigger::ShortStopLoss {
                    when_debt_price_above: threshold,
                })
            }
            (PositionType::Short, OrderType::TakeProfit, DebtCollPriceRatioBelow { .. }) => {
                Ok(PriceBasedOrderTrigger::ShortTakeProfit {
                    when_debt_price_below: threshold,
                })
            }
            _ => Err(OrderError::new(
                ErrorKind::Compatibility,
                format!(
                    "{} has an incompatible on-chain condition {condition}",
                    describe_order(order_type, position_type)
                ),
            )
            .into()),
        }
    }
}

fn describe_order(order_type: OrderType, position_type: PositionType) -> String {
    format!("a price-based {order_type} order on a {position_type} position")
}

fn positive_price(price: Decimal) -> Result<Decimal> {
    check_that(price > Decimal::ZERO, ErrorKind::Range, || {
        format!("price must be positive; got {price}")
    })?;
    Ok(price)
}

fn invert_price_ratio(price_ratio: Decimal) -> Result<Decimal> {
    checked_div(Decimal::ONE, positive_price(price_ratio)?)
}
