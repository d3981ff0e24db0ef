//! Order conditions

use super::ConditionHit;
use crate::constants::checked_div;
use crate::contracts::ConditionType;
use crate::error::Result;
use crate::obligation::Obligation;
use crate::validation::get_single_element;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A condition "activating" an order
///
/// When an order's condition is met by an obligation, the order's opportunity becomes
/// available to executors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum OrderCondition {
    /// Met when the obligation's user LTV is strictly higher than the threshold
    UserLtvAbove { min_user_ltv_exclusive: Decimal },
    /// Met when the obligation's user LTV is strictly lower than the threshold
    UserLtvBelow { max_user_ltv_exclusive: Decimal },
    /// Met when the debt token price (expressed in the collateral token) is strictly higher
    /// than the threshold
    ///
    /// May only be applied to single-collateral, single-debt obligations.
    DebtCollPriceRatioAbove {
        min_debt_coll_price_ratio_exclusive: Decimal,
    },
    /// Met when the debt token price (expressed in the collateral token) is strictly lower
    /// than the threshold
    ///
    /// May only be applied to single-collateral, single-debt obligations.
    DebtCollPriceRatioBelow {
        max_debt_coll_price_ratio_exclusive: Decimal,
    },
}

impl OrderCondition {
    /// Create a condition of the given on-chain type
    ///
    /// Returns `None` for [`ConditionType::Never`], which marks an empty slot.
    pub fn from_type(condition_type: ConditionType, threshold: Decimal) -> Option<Self> {
        match condition_type {
            ConditionType::Never => None,
            ConditionType::UserLtvAbove => Some(Self::UserLtvAbove {
                min_user_ltv_exclusive: threshold,
            }),
            ConditionType::UserLtvBelow => Some(Self::UserLtvBelow {
                max_user_ltv_exclusive: threshold,
            }),
            ConditionType::DebtCollPriceRatioAbove => Some(Self::DebtCollPriceRatioAbove {
                min_debt_coll_price_ratio_exclusive: threshold,
            }),
            ConditionType::DebtCollPriceRatioBelow => Some(Self::DebtCollPriceRatioBelow {
                max_debt_coll_price_ratio_exclusive: threshold,
            }),
        }
    }

    /// The on-chain type id of this condition
    pub fn condition_type(&self) -> ConditionType {
        match self {
            Self::UserLtvAbove { .. } => ConditionType::UserLtvAbove,
            Self::UserLtvBelow { .. } => ConditionType::UserLtvBelow,
            Self::DebtCollPriceRatioAbove { .. } => ConditionType::DebtCollPriceRatioAbove,
            Self::DebtCollPriceRatioBelow { .. } => ConditionType::DebtCollPriceRatioBelow,
        }
    }

    /// The abstract parameter of the condition, meaningful in context of its type
    pub fn threshold(&self) -> Decimal {
        match *self {
            Self::UserLtvAbove {
                min_user_ltv_exclusive,
            } => min_user_ltv_exclusive,
            Self::UserLtvBelow {
                max_user_ltv_exclusive,
            } => max_user_ltv_exclusive,
            Self::DebtCollPriceRatioAbove {
                min_debt_coll_price_ratio_exclusive,
            } => min_debt_coll_price_ratio_exclusive,
            Self::DebtCollPriceRatioBelow {
                max_debt_coll_price_ratio_exclusive,
            } => max_debt_coll_price_ratio_exclusive,
        }
    }

    /// Returns a potential hit on this condition, or `None` if it is not met
    pub fn evaluate(&self, obligation: &Obligation) -> Result<Option<ConditionHit>> {
        match *self {
            Self::UserLtvAbove {
                min_user_ltv_exclusive,
            } => evaluate_stop_loss(
                obligation.loan_to_value(),
                min_user_ltv_exclusive,
                obligation.liquidation_ltv(),
            ),
            Self::UserLtvBelow {
                max_user_ltv_exclusive,
            } => evaluate_take_profit(obligation.loan_to_value(), max_user_ltv_exclusive),
            Self::DebtCollPriceRatioAbove {
                min_debt_coll_price_ratio_exclusive,
            } => {
                let price_ratio = calculate_debt_coll_price_ratio(obligation)?;
                // For single-debt-single-coll obligations the price ratio is proportional to LTV,
                // so the liquidation price ratio scales with unhealthy / current borrow value:
                let liquidation_price_ratio = checked_div(
                    price_ratio * obligation.stats.borrow_liquidation_limit,
                    obligation.stats.user_total_borrow_borrow_factor_adjusted,
                )?;
                evaluate_stop_loss(
                    price_ratio,
                    min_debt_coll_price_ratio_exclusive,
                    liquidation_price_ratio,
                )
            }
            Self::DebtCollPriceRatioBelow {
                max_debt_coll_price_ratio_exclusive,
            } => evaluate_take_profit(
                calculate_debt_coll_price_ratio(obligation)?,
                max_debt_coll_price_ratio_exclusive,
            ),
        }
    }
}

impl fmt::Display for OrderCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UserLtvAbove { .. } => "UserLtvAbove",
            Self::UserLtvBelow { .. } => "UserLtvBelow",
            Self::DebtCollPriceRatioAbove { .. } => "DebtCollPriceRatioAbove",
            Self::DebtCollPriceRatioBelow { .. } => "DebtCollPriceRatioBelow",
        };
        f.write_str(name)
    }
}

fn evaluate_stop_loss(
    current_value: Decimal,
    condition_threshold: Decimal,
    liquidation_threshold: Decimal,
) -> Result<Option<ConditionHit>> {
    if current_value <= condition_threshold {
        return Ok(None);
    }
    // A threshold at or past the liquidation point leaves no room to interpolate in; such
    // an obligation is liquidatable anyway, so report the maximum distance.
    let normalized_distance_from_threshold = if condition_threshold >= liquidation_threshold {
        Decimal::ONE
    } else {
        checked_div(
            current_value - condition_threshold,
            liquidation_threshold - condition_threshold,
        )?
    };
    Ok(Some(ConditionHit {
        normalized_distance_from_threshold,
    }))
}

fn evaluate_take_profit(
    current_value: Decimal,
    condition_threshold: Decimal,
) -> Result<Option<ConditionHit>> {
    if current_value >= condition_threshold {
        return Ok(None);
    }
    // distance towards zero
    let normalized_distance_from_threshold =
        checked_div(condition_threshold - current_value, condition_threshold)?;
    Ok(Some(ConditionHit {
        normalized_distance_from_threshold,
    }))
}

fn calculate_debt_coll_price_ratio(obligation: &Obligation) -> Result<Decimal> {
    let single_borrow = get_single_element(obligation.borrows.values(), "borrow")?;
    let single_deposit = get_single_element(obligation.deposits.values(), "deposit")?;
    checked_div(single_borrow.token_price()?, single_deposit.token_price()?)
}
