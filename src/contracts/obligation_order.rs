//! Obligation order record bindings

use crate::error::{ErrorKind, OrderError};
use alloy::sol;

sol! {
    /// Order record stored in each of the obligation's order slots
    ///
    /// Field for field this mirrors the lending program's account layout. It is used as a
    /// plain typed struct and is never ABI-encoded as EVM calldata.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct ObligationOrderState {
        uint8 conditionType;           // ConditionType id (0 = never, i.e. empty slot)
        uint128 conditionThresholdSf;  // Threshold as a 60-bit scaled fraction
        uint8 opportunityType;         // OpportunityType id
        uint128 opportunityParameterSf; // Parameter as a 60-bit scaled fraction
        uint16 minExecutionBonusBps;
        uint16 maxExecutionBonusBps;
    }
}

impl ObligationOrderState {
    /// The record of an empty slot
    pub fn null() -> Self {
        Self::default()
    }

    /// Whether this record represents an empty slot
    ///
    /// In practice an empty slot is entirely zeroed, but `condition == never` is enough.
    pub fn is_null(&self) -> bool {
        self.conditionType == u8::from(ConditionType::Never)
    }
}

/// Condition type ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ConditionType {
    /// Never met - marks an empty slot
    #[default]
    Never = 0,
    /// User LTV strictly above the threshold
    UserLtvAbove = 1,
    /// User LTV strictly below the threshold
    UserLtvBelow = 2,
    /// Debt/collateral price ratio strictly above the threshold
    DebtCollPriceRatioAbove = 3,
    /// Debt/collateral price ratio strictly below the threshold
    DebtCollPriceRatioBelow = 4,
}

impl From<ConditionType> for u8 {
    fn from(condition_type: ConditionType) -> u8 {
        condition_type as u8
    }
}

impl TryFrom<u8> for ConditionType {
    type Error = OrderError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::Never),
            1 => Ok(Self::UserLtvAbove),
            2 => Ok(Self::UserLtvBelow),
            3 => Ok(Self::DebtCollPriceRatioAbove),
            4 => Ok(Self::DebtCollPriceRatioBelow),
            other => Err(OrderError::new(
                ErrorKind::Compatibility,
                format!("incompatible on-chain condition type {other}"),
            )),
        }
    }
}

/// Opportunity type ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpportunityType {
    /// Repay the given amount of the single debt
    DeleverageDebtAmount = 0,
    /// Repay all debt
    DeleverageAllDebt = 1,
}

impl From<OpportunityType> for u8 {
    fn from(opportunity_type: OpportunityType) -> u8 {
        opportunity_type as u8
    }
}

impl TryFrom<u8> for OpportunityType {
    type Error = OrderError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::DeleverageDebtAmount),
            1 => Ok(Self::DeleverageAllDebt),
            other => Err(OrderError::new(
                ErrorKind::Compatibility,
                format!("incompatible on-chain opportunity type {other}"),
            )),
        }
    }
}
