//! Order opportunities

use super::TokenAmount;
use crate::constants::{scale_fraction, MAX_FRACTION_SF};
use crate::contracts::OpportunityType;
use crate::error::{ErrorKind, OrderError, Result};
use crate::obligation::Position;
use crate::validation::get_single_element;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type and size of a trade made available by an order (once its condition is met)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum OrderOpportunity {
    /// Repay the given amount (in lamports) of the obligation's debt token
    ///
    /// May only be applied to single-debt obligations.
    DeleverageDebtAmount { amount: Decimal },
    /// Repay all debt(s) of the obligation
    DeleverageAllDebt,
}

impl OrderOpportunity {
    /// The on-chain type id of this opportunity
    pub fn opportunity_type(&self) -> OpportunityType {
        match self {
            Self::DeleverageDebtAmount { .. } => OpportunityType::DeleverageDebtAmount,
            Self::DeleverageAllDebt => OpportunityType::DeleverageAllDebt,
        }
    }

    /// The opportunity's parameter as an on-chain scaled fraction
    pub fn parameter_sf(&self) -> Result<u128> {
        match *self {
            Self::DeleverageDebtAmount { amount } => scale_fraction(amount),
            Self::DeleverageAllDebt => Ok(MAX_FRACTION_SF),
        }
    }

    /// Returns the highest-valued amount that can be repaid (among the given borrows)
    pub fn max_repay(&self, borrows: &[&Position]) -> Result<TokenAmount> {
        match *self {
            Self::DeleverageDebtAmount { amount } => {
                let single_borrow = get_single_element(borrows, "borrow")?;
                Ok(TokenAmount {
                    mint: single_borrow.mint_address,
                    amount: amount.min(single_borrow.amount),
                })
            }
            Self::DeleverageAllDebt => {
                let highest_value_borrow = borrows
                    .iter()
                    .max_by_key(|borrow| borrow.market_value)
                    .ok_or_else(|| {
                        OrderError::new(
                            ErrorKind::Shape,
                            "opportunity type not valid on obligation with no borrows",
                        )
                    })?;
                Ok(TokenAmount {
                    mint: highest_value_borrow.mint_address,
                    amount: highest_value_borrow.amount,
                })
            }
        }
    }
}

impl fmt::Display for OrderOpportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleverageDebtAmount { .. } => f.write_str("DeleverageDebtAmount"),
            Self::DeleverageAllDebt => f.write_str("DeleverageAllDebt"),
        }
    }
}
