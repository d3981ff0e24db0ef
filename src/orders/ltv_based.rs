//! LTV-based orders
//!
//! Orders triggered by the obligation's overall loan-to-value crossing a percentage.

use super::family::{create_order, read_order, OrderFamily};
use super::OrderContext;
use crate::constants::{
    fraction_to_pct, pct_to_fraction, MAX_LTV_THRESHOLD_PCT, MIN_LTV_THRESHOLD_PCT,
};
use crate::error::{ErrorKind, OrderError, Result};
use crate::order::{ObligationOrderAtIndex, OrderCondition};
use crate::types::{LtvBasedOrderTrigger, OrderSpecification, OrderType};
use crate::validation::check_that;
use rust_decimal::Decimal;

/// A high-level specification of an LTV-based order
pub type LtvBasedOrderSpecification = OrderSpecification<LtvBasedOrderTrigger>;

/// Creates an LTV-based order slot update from the given stop-loss or take-profit specification
///
/// The returned value replaces (or cancels, if the specification is `None`) the obligation's
/// stop-loss or take-profit order once submitted on-chain.
///
/// The obligation cannot use 0-LTV collaterals.
pub fn create_ltv_based_order(
    context: &OrderContext<'_>,
    order_type: OrderType,
    specification: Option<&LtvBasedOrderSpecification>,
) -> Result<ObligationOrderAtIndex> {
    create_order(context, order_type, specification)
}

/// Parses the specification of the selected stop-loss or take-profit order of the obligation
///
/// The obligation cannot use 0-LTV collaterals, and the selected order is expected to be of
/// matching type (i.e. as if it was created by [`create_ltv_based_order`]).
pub fn read_ltv_based_order(
    context: &OrderContext<'_>,
    order_type: OrderType,
) -> Result<Option<LtvBasedOrderSpecification>> {
    read_order(context, order_type)
}

impl OrderFamily for OrderContext<'_> {
    type Trigger = LtvBasedOrderTrigger;
    type Compatibility = ();

    const NAME: &'static str = "LTV-based";

    fn order_context(&self) -> &OrderContext<'_> {
        self
    }

    /// Refuses obligations using a 0-LTV collateral
    ///
    /// The user-facing LTV and the on-chain LTV differ in how they handle 0-LTV collaterals,
    /// so an LTV threshold cannot be faithfully expressed for such obligations.
    fn check_compatible(&self) -> Result<()> {
        for deposit_reserve_address in self.obligation.deposits.keys() {
            let deposit_reserve =
                self.market.get_existing_reserve_by_address(deposit_reserve_address)?;
            if deposit_reserve.loan_to_value_pct == 0 {
                tracing::warn!(
                    obligation = %self.obligation.address,
                    reserve = %deposit_reserve.symbol,
                    "refusing LTV-based orders on a 0-LTV collateral"
                );
                return Err(OrderError::new(
                    ErrorKind::Compatibility,
                    format!(
                        "LTV-based orders cannot be used with a 0-LTV collateral: {}",
                        deposit_reserve.symbol
                    ),
                )
                .into());
            }
        }
        Ok(())
    }

    fn to_condition(
        _: (),
        order_type: OrderType,
        trigger: &LtvBasedOrderTrigger,
    ) -> Result<OrderCondition> {
        let condition = match (order_type, *trigger) {
            (OrderType::StopLoss, LtvBasedOrderTrigger::StopLoss { when_ltv_pct_above }) => {
                OrderCondition::UserLtvAbove {
                    min_user_ltv_exclusive: pct_to_fraction(when_ltv_pct_above),
                }
            }
            (OrderType::TakeProfit, LtvBasedOrderTrigger::TakeProfit { when_ltv_pct_below }) => {
                OrderCondition::UserLtvBelow {
                    max_user_ltv_exclusive: pct_to_fraction(when_ltv_pct_below),
                }
            }
            _ => {
                return Err(OrderError::new(
                    ErrorKind::Compatibility,
                    format!("an LTV-based {order_type} order cannot use {trigger} condition"),
                )
                .into())
            }
        };
        let threshold = condition.threshold();
        let min_threshold = pct_to_fraction(Decimal::from(MIN_LTV_THRESHOLD_PCT));
        let max_threshold = pct_to_fraction(Decimal::from(MAX_LTV_THRESHOLD_PCT));
        let valid_range = min_threshold..=max_threshold;
        check_that(valid_range.contains(&threshold), ErrorKind::Range, || {
            format!(
                "LTV-based trigger outside valid range [{}%; {}%]: {}%",
                MIN_LTV_THRESHOLD_PCT,
                MAX_LTV_THRESHOLD_PCT,
                fraction_to_pct(threshold)
            )
        })?;
        Ok(condition)
    }

    fn to_trigger(
        _: (),
        condition: &OrderCondition,
        order_type: OrderType,
    ) -> Result<LtvBasedOrderTrigger> {
        let threshold_pct = fraction_to_pct(condition.threshold());
        match (order_type, condition) {
            (OrderType::StopLoss, OrderCondition::UserLtvAbove { .. }) => {
                Ok(LtvBasedOrderTrigger::StopLoss {
                    when_ltv_pct_above: threshold_pct,
                })
            }
            (OrderType::TakeProfit, OrderCondition::UserLtvBelow { .. }) => {
                Ok(LtvBasedOrderTrigger::TakeProfit {
                    when_ltv_pct_below: threshold_pct,
                })
            }
            _ => Err(OrderError::new(
                ErrorKind::Compatibility,
                format!(
                    "an LTV-based {order_type} order has an incompatible on-chain condition {}",
                    condition
                ),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::ObligationOrderState;
    use crate::error::error_kind;
    use crate::order::{ObligationOrder, OrderOpportunity};
    use crate::test_fixtures::{ltv_obligation, market, zero_ltv_collateral_obligation};
    use crate::types::OrderAction;
    use rust_decimal_macros::dec;

    fn stop_loss(pct: Decimal) -> LtvBasedOrderSpecification {
        OrderSpecification::new(
            LtvBasedOrderTrigger::StopLoss {
                when_ltv_pct_above: pct,
            },
            OrderAction::FullRepay,
            (dec!(50), dec!(200)),
        )
    }

    fn take_profit(pct: Decimal) -> LtvBasedOrderSpecification {
        OrderSpecification::new(
            LtvBasedOrderTrigger::TakeProfit {
                when_ltv_pct_below: pct,
            },
            OrderAction::partial_repay(dec!(100000000)),
            (Decimal::ZERO, Decimal::ZERO),
        )
    }

    #[test]
    fn test_create_stop_loss() {
        let market = market();
        let obligation = ltv_obligation(dec!(500));
        let context = OrderContext::new(&market, &obligation);

        let spec = stop_loss(dec!(70));
        let update = create_ltv_based_order(&context, OrderType::StopLoss, Some(&spec)).unwrap();
        assert_eq!(update.index, 0);
        assert_eq!(
            update.order,
            Some(ObligationOrder::new(
                OrderCondition::UserLtvAbove {
                    min_user_ltv_exclusive: dec!(0.7)
                },
                OrderOpportunity::DeleverageAllDebt,
                dec!(0.005),
                dec!(0.02),
            ))
        );
    }

    #[test]
    fn test_round_trip_all_percentages() {
        let market = market();
        for pct in 1..=99 {
            let spec = stop_loss(Decimal::from(pct));
            // current LTV 0.5%, below any stop-loss
            let mut obligation = ltv_obligation(dec!(5));
            let context = OrderContext::new(&market, &obligation);
            let order_type = OrderType::StopLoss;
            let update = create_ltv_based_order(&context, order_type, Some(&spec)).unwrap();

            obligation.apply_order_update(&update).unwrap();
            let context = OrderContext::new(&market, &obligation);
            let read = read_ltv_based_order(&context, order_type).unwrap();
            assert_eq!(read, Some(spec));
        }
        for pct in 1..=49 {
            let spec = take_profit(Decimal::from(pct));
            // current LTV 50%
            let mut obligation = ltv_obligation(dec!(500));
            let context = OrderContext::new(&market, &obligation);
            let order_type = OrderType::TakeProfit;
            let update = create_ltv_based_order(&context, order_type, Some(&spec)).unwrap();

            obligation.apply_order_update(&update).unwrap();
            let context = OrderContext::new(&market, &obligation);
            let read = read_ltv_based_order(&context, order_type).unwrap();
            assert_eq!(read, Some(spec));
        }
    }

    #[test]
    fn test_round_trip_through_order_states() {
        let market = market();
        for pct in 1..=99 {
            let spec = stop_loss(Decimal::from(pct));
            let obligation = ltv_obligation(dec!(5));
            let context = OrderContext::new(&market, &obligation);
            let order_type = OrderType::StopLoss;
            let update = create_ltv_based_order(&context, order_type, Some(&spec)).unwrap();

            // decode the encoded slots the way a freshly fetched obligation is built
            let states = [update.order_state().unwrap(), ObligationOrderState::null()];
            let obligation = ltv_obligation(dec!(5));
            let obligation = obligation.with_order_states(&states).unwrap();
            let context = OrderContext::new(&market, &obligation);
            let read = read_ltv_based_order(&context, order_type).unwrap();
            assert_eq!(read, Some(spec));
        }
    }

    #[test]
    fn test_rejects_immediately_triggered_order() {
        let market = market();
        // current LTV 90%
        let obligation = ltv_obligation(dec!(900));
        let context = OrderContext::new(&market, &obligation);
        let spec = stop_loss(dec!(80));
        let err = create_ltv_based_order(&context, OrderType::StopLoss, Some(&spec)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot create an immediately-triggered order"
        );
        assert_eq!(error_kind(&err), Some(ErrorKind::Timing));
    }

    #[test]
    fn test_rejects_threshold_out_of_range() {
        let market = market();
        let obligation = ltv_obligation(dec!(500));
        let context = OrderContext::new(&market, &obligation);

        let spec = stop_loss(dec!(99.5));
        let err = create_ltv_based_order(&context, OrderType::StopLoss, Some(&spec)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "LTV-based trigger outside valid range [1%; 99%]: 99.5%"
        );

        let spec = take_profit(dec!(0.5));
        let err = create_ltv_based_order(&context, OrderType::TakeProfit, Some(&spec)).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Range));
    }

    #[test]
    fn test_rejects_mismatched_trigger() {
        let market = market();
        let obligation = ltv_obligation(dec!(500));
        let context = OrderContext::new(&market, &obligation);
        let spec = take_profit(dec!(30));
        let err = create_ltv_based_order(&context, OrderType::StopLoss, Some(&spec)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "an LTV-based StopLoss order cannot use TakeProfit condition"
        );
        assert_eq!(error_kind(&err), Some(ErrorKind::Compatibility));
    }

    #[test]
    fn test_cancel_skips_trigger_validation() {
        let market = market();
        // even an obligation whose LTV is past any take-profit can cancel its order
        let obligation = ltv_obligation(dec!(900));
        let context = OrderContext::new(&market, &obligation);
        let update = create_ltv_based_order(&context, OrderType::TakeProfit, None).unwrap();
        assert!(update.is_empty());
        assert_eq!(update, ObligationOrderAtIndex::empty(1));
    }

    #[test]
    fn test_zero_ltv_collateral_is_incompatible() {
        let market = market();
        let obligation = zero_ltv_collateral_obligation();
        let context = OrderContext::new(&market, &obligation);
        for order_type in [OrderType::StopLoss, OrderType::TakeProfit] {
            let err = create_ltv_based_order(&context, order_type, None).unwrap_err();
            assert_eq!(
                err.to_string(),
                "LTV-based orders cannot be used with a 0-LTV collateral: BONK"
            );
            let err = read_ltv_based_order(&context, order_type).unwrap_err();
            assert_eq!(error_kind(&err), Some(ErrorKind::Compatibility));
        }
    }

    #[test]
    fn test_read_empty_slot() {
        let market = market();
        let obligation = ltv_obligation(dec!(500));
        let context = OrderContext::new(&market, &obligation);
        let read = read_ltv_based_order(&context, OrderType::TakeProfit).unwrap();
        assert_eq!(read, None);
    }

    #[test]
    fn test_read_rejects_incompatible_condition() {
        let market = market();
        let mut obligation = ltv_obligation(dec!(500));
        let order = ObligationOrder::new(
            OrderCondition::UserLtvBelow {
                max_user_ltv_exclusive: dec!(0.3),
            },
            OrderOpportunity::DeleverageAllDebt,
            Decimal::ZERO,
            Decimal::ZERO,
        );
        obligation.apply_order_update(&order.at_index(0)).unwrap();
        let context = OrderContext::new(&market, &obligation);
        let err = read_ltv_based_order(&context, OrderType::StopLoss).unwrap_err();
        assert_eq!(
            err.to_string(),
            "an LTV-based StopLoss order has an incompatible on-chain condition UserLtvBelow"
        );
    }
}
