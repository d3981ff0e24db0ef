//! On-chain order representation
//!
//! An [`ObligationOrder`] is a condition, an opportunity and an execution bonus range.
//! Orders are placed at a fixed slot of an obligation through an
//! [`ObligationOrderAtIndex`], which may also be empty (cancelling the slot).

mod condition;
mod opportunity;

pub use condition::OrderCondition;
pub use opportunity::OrderOpportunity;

use crate::constants::{
    bps_to_fraction, checked_div, round_to_bps, scale_fraction, unscale_fraction, MAX_FRACTION_SF,
};
use crate::contracts::{ConditionType, ObligationOrderState, OpportunityType};
use crate::error::{ErrorKind, OrderError, Result};
use crate::market::Market;
use crate::obligation::{Obligation, Position};
use alloy::primitives::Address;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Numeric details on why an order's condition was met
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionHit {
    /// The `[0; 1]` measure of how hard the condition's threshold is crossed
    ///
    /// E.g. for "when LTV > 70%" with a liquidation LTV of 90%: `0` at LTV 70%, `1` at
    /// LTV 90%, `0.6` at LTV 82%.
    pub normalized_distance_from_threshold: Decimal,
}

/// An amount of a specific token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    pub mint: Address,
    /// Amount in lamports
    pub amount: Decimal,
}

/// A potential exchange of tokens resulting from an order execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableOrderExecution {
    /// How much (and of what token) to repay
    pub repay: TokenAmount,
    /// How much (and of what other token) can be withdrawn in exchange
    ///
    /// Already includes the execution bonus, but not the protocol fee.
    pub withdraw: TokenAmount,
    /// The bonus rate (e.g. `0.01` meaning 1%)
    pub bonus_rate: Decimal,
}

/// A business wrapper around the on-chain order record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligationOrder {
    /// The order's condition
    pub condition: OrderCondition,
    /// The order's opportunity
    pub opportunity: OrderOpportunity,
    /// Bonus rate offered when the condition threshold has been barely crossed
    pub min_execution_bonus_rate: Decimal,
    /// Bonus rate offered when the condition threshold has been exceeded by the maximum
    /// possible margin (e.g. the LTV reached the liquidation LTV)
    pub max_execution_bonus_rate: Decimal,
}

impl ObligationOrder {
    /// Create a new order
    pub fn new(
        condition: OrderCondition,
        opportunity: OrderOpportunity,
        min_execution_bonus_rate: Decimal,
        max_execution_bonus_rate: Decimal,
    ) -> Self {
        Self {
            condition,
            opportunity,
            min_execution_bonus_rate,
            max_execution_bonus_rate,
        }
    }

    /// Bind this order to the given slot
    pub fn at_index(self, index: u8) -> ObligationOrderAtIndex {
        ObligationOrderAtIndex {
            index,
            order: Some(self),
        }
    }

    /// Decode an order from its on-chain record
    ///
    /// Returns `None` if the record represents an empty slot.
    pub fn from_state(state: &ObligationOrderState) -> Result<Option<Self>> {
        let condition_type = ConditionType::try_from(state.conditionType)?;
        let threshold = unscale_fraction(state.conditionThresholdSf);
        let Some(condition) = OrderCondition::from_type(condition_type, threshold) else {
            return Ok(None);
        };
        let opportunity = match OpportunityType::try_from(state.opportunityType)? {
            OpportunityType::DeleverageDebtAmount => OrderOpportunity::DeleverageDebtAmount {
                amount: unscale_fraction(state.opportunityParameterSf),
            },
            OpportunityType::DeleverageAllDebt => {
                if state.opportunityParameterSf != MAX_FRACTION_SF {
                    return Err(OrderError::new(
                        ErrorKind::Decode,
                        format!(
                            "invalid DeleverageAllDebt parameter: {} (must be {MAX_FRACTION_SF})",
                            state.opportunityParameterSf
                        ),
                    )
                    .into());
                }
                OrderOpportunity::DeleverageAllDebt
            }
        };
        Ok(Some(Self::new(
            condition,
            opportunity,
            bps_to_fraction(Decimal::from(state.minExecutionBonusBps)),
            bps_to_fraction(Decimal::from(state.maxExecutionBonusBps)),
        )))
    }

    /// Encode this order as its on-chain record
    pub fn to_state(&self) -> Result<ObligationOrderState> {
        Ok(ObligationOrderState {
            conditionType: self.condition.condition_type().into(),
            conditionThresholdSf: scale_fraction(self.condition.threshold())?,
            opportunityType: self.opportunity.opportunity_type().into(),
            opportunityParameterSf: self.opportunity.parameter_sf()?,
            minExecutionBonusBps: round_to_bps(self.min_execution_bonus_rate)?,
            maxExecutionBonusBps: round_to_bps(self.max_execution_bonus_rate)?,
        })
    }

    /// Calculate the actual execution bonus rate for the given condition hit
    ///
    /// The rate is interpolated between the order's min and max rates by how far the
    /// condition's threshold is crossed. Like for regular liquidations, it never exceeds
    /// `1 - no_bf_ltv`, so that the execution improves the obligation's LTV.
    pub fn execution_bonus_rate(
        &self,
        condition_hit: &ConditionHit,
        obligation: &Obligation,
    ) -> Decimal {
        let interpolated = self.min_execution_bonus_rate
            + condition_hit.normalized_distance_from_threshold
                * (self.max_execution_bonus_rate - self.min_execution_bonus_rate);
        let diff_to_bad_debt = Decimal::ONE - obligation.no_bf_loan_to_value();
        interpolated.min(diff_to_bad_debt)
    }

    /// Returns the highest-valued execution currently offered by this order
    ///
    /// Returns `None` when the order's condition is not met.
    pub fn find_max_available_execution(
        &self,
        market: &Market,
        obligation: &Obligation,
    ) -> Result<Option<AvailableOrderExecution>> {
        let Some(condition_hit) = self.condition.evaluate(obligation)? else {
            return Ok(None);
        };
        let max_repay = self.opportunity.max_repay(&obligation.get_borrows())?;
        let Some(repay_borrow) = obligation.get_borrow_by_mint(&max_repay.mint) else {
            return Err(OrderError::new(
                ErrorKind::Shape,
                format!("no borrow of mint {}", max_repay.mint),
            )
            .into());
        };
        let max_repay_value = token_amount_to_value(&max_repay, repay_borrow)?;
        let bonus_rate = self.execution_bonus_rate(&condition_hit, obligation);
        let bonus_factor = Decimal::ONE + bonus_rate;
        let max_withdraw_value = max_repay_value * bonus_factor;

        // Only the lowest-liquidation-LTV deposit may be withdrawn (0-LTV assets are never
        // liquidatable):
        let mut liquidatable_deposits = Vec::new();
        for deposit in obligation.get_deposits() {
            let liquidation_ltv =
                obligation.get_liquidation_ltv_for_reserve(market, &deposit.reserve_address)?;
            if liquidation_ltv > Decimal::ZERO {
                liquidatable_deposits.push((liquidation_ltv, deposit));
            }
        }
        let min_liquidation_ltv = liquidatable_deposits
            .iter()
            .map(|(liquidation_ltv, _)| *liquidation_ltv)
            .min()
            .ok_or_else(no_liquidatable_deposit)?;
        let (actual_withdraw_value, withdraw_deposit) = liquidatable_deposits
            .into_iter()
            .filter(|(liquidation_ltv, _)| *liquidation_ltv == min_liquidation_ltv)
            .map(|(_, deposit)| (deposit.market_value.min(max_withdraw_value), deposit))
            // ties broken by mint, for a deterministic pick
            .max_by(|(left_value, left), (right_value, right)| {
                left_value
                    .cmp(right_value)
                    .then_with(|| left.mint_address.cmp(&right.mint_address))
            })
            .ok_or_else(no_liquidatable_deposit)?;
        let actual_repay_value = checked_div(actual_withdraw_value, bonus_factor)?;

        Ok(Some(AvailableOrderExecution {
            repay: value_to_token_amount(actual_repay_value, repay_borrow)?,
            withdraw: value_to_token_amount(actual_withdraw_value, withdraw_deposit)?,
            bonus_rate,
        }))
    }
}

/// A single order slot of an obligation, which may hold an order or not
///
/// This is the value handed to the instruction setting (or cancelling) an obligation's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationOrderAtIndex {
    pub index: u8,
    pub order: Option<ObligationOrder>,
}

impl ObligationOrderAtIndex {
    /// Create an empty slot (suitable for cancelling an order)
    pub fn empty(index: u8) -> Self {
        Self { index, order: None }
    }

    /// Whether this slot is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_none()
    }

    /// The on-chain record of the slot (zeroed if the order is not set)
    pub fn order_state(&self) -> Result<ObligationOrderState> {
        match &self.order {
            Some(order) => order.to_state(),
            None => Ok(ObligationOrderState::null()),
        }
    }
}

fn token_amount_to_value(token_amount: &TokenAmount, position: &Position) -> Result<Decimal> {
    if token_amount.mint != position.mint_address {
        return Err(OrderError::new(
            ErrorKind::Shape,
            format!(
                "value of {} of mint {} cannot be computed from a position of mint {}",
                token_amount.amount, token_amount.mint, position.mint_address
            ),
        )
        .into());
    }
    checked_div(token_amount.amount * position.market_value, position.amount)
}

fn value_to_token_amount(value: Decimal, position: &Position) -> Result<TokenAmount> {
    let fractional_amount = checked_div(value * position.amount, position.market_value)?;
    let amount =
        fractional_amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Ok(TokenAmount {
        amount,
        mint: position.mint_address,
    })
}

fn no_liquidatable_deposit() -> OrderError {
    OrderError::new(ErrorKind::Shape, "obligation has no liquidatable deposit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_kind;
    use crate::test_fixtures::{ltv_obligation, market, SOL_MINT, USDC_MINT};
    use rust_decimal_macros::dec;

    fn stop_loss_order() -> ObligationOrder {
        ObligationOrder::new(
            OrderCondition::UserLtvAbove {
                min_user_ltv_exclusive: dec!(0.5),
            },
            OrderOpportunity::DeleverageAllDebt,
            dec!(0.01),
            dec!(0.05),
        )
    }

    #[test]
    fn test_state_round_trip() {
        let order = ObligationOrder::new(
            OrderCondition::DebtCollPriceRatioBelow {
                max_debt_coll_price_ratio_exclusive: dec!(0.25),
            },
            OrderOpportunity::DeleverageDebtAmount { amount: dec!(1500) },
            dec!(0.001),
            dec!(0.0125),
        );
        let state = order.to_state().unwrap();
        assert_eq!(state.conditionType, 4);
        assert_eq!(state.opportunityType, 0);
        assert_eq!(state.minExecutionBonusBps, 10);
        assert_eq!(state.maxExecutionBonusBps, 125);

        let decoded = ObligationOrder::from_state(&state).unwrap().unwrap();
        assert_eq!(decoded, order);
    }

    #[test]
    fn test_null_state_decodes_to_empty_slot() {
        let state = ObligationOrderState::null();
        assert_eq!(ObligationOrder::from_state(&state).unwrap(), None);
        assert_eq!(
            ObligationOrderAtIndex::empty(1).order_state().unwrap(),
            ObligationOrderState::null()
        );
    }

    #[test]
    fn test_from_state_rejects_unknown_types() {
        let state = ObligationOrderState {
            conditionType: 9,
            ..Default::default()
        };
        let err = ObligationOrder::from_state(&state).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Compatibility));

        let state = ObligationOrderState {
            conditionType: 1,
            opportunityType: 5,
            ..Default::default()
        };
        let err = ObligationOrder::from_state(&state).unwrap_err();
        assert_eq!(err.to_string(), "incompatible on-chain opportunity type 5");
    }

    #[test]
    fn test_from_state_rejects_repay_all_parameter() {
        let state = ObligationOrderState {
            conditionType: 1,
            opportunityType: 1,
            opportunityParameterSf: 42,
            ..Default::default()
        };
        let err = ObligationOrder::from_state(&state).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Decode));
    }

    #[test]
    fn test_execution_bonus_rate_interpolates() {
        let order = stop_loss_order();
        let obligation = ltv_obligation(dec!(500));
        let hit = ConditionHit {
            normalized_distance_from_threshold: dec!(0.5),
        };
        assert_eq!(order.execution_bonus_rate(&hit, &obligation), dec!(0.03));
    }

    #[test]
    fn test_execution_bonus_rate_is_capped() {
        let order = ObligationOrder {
            max_execution_bonus_rate: dec!(0.5),
            ..stop_loss_order()
        };
        // no-bf LTV of 90% leaves at most 10% of bonus
        let obligation = ltv_obligation(dec!(900));
        let hit = ConditionHit {
            normalized_distance_from_threshold: Decimal::ONE,
        };
        assert_eq!(order.execution_bonus_rate(&hit, &obligation), dec!(0.1));
    }

    #[test]
    fn test_find_max_available_execution() {
        let market = market();
        // LTV 60% against a 50% threshold, liquidation LTV 75%: distance 0.4, bonus 2.6%
        let obligation = ltv_obligation(dec!(600));
        let execution = stop_loss_order()
            .find_max_available_execution(&market, &obligation)
            .unwrap()
            .unwrap();
        assert_eq!(execution.bonus_rate, dec!(0.026));
        // Repaying all 600 USDC withdraws 615.6 worth of SOL (at 100 per SOL)
        assert_eq!(execution.repay.mint, USDC_MINT);
        assert_eq!(execution.repay.amount, dec!(600000000));
        assert_eq!(execution.withdraw.mint, SOL_MINT);
        assert_eq!(execution.withdraw.amount, dec!(6156000000));
    }

    #[test]
    fn test_no_execution_when_condition_not_met() {
        let obligation = ltv_obligation(dec!(400));
        let execution = stop_loss_order()
            .find_max_available_execution(&market(), &obligation)
            .unwrap();
        assert_eq!(execution, None);
    }
}
