//! Lending Orders SDK for Rust
//!
//! Translates user-facing stop-loss / take-profit orders of lending obligations into the
//! condition / opportunity records the lending program stores per obligation, and back.
//!
//! # Features
//!
//! - LTV-based orders (trigger when the obligation's LTV crosses a percentage)
//! - Price-based orders on USD positions (trigger when the volatile token's price crosses a value)
//! - Encoding and decoding of the raw on-chain order records
//! - Evaluation of stored orders against an obligation (condition hits, execution bonus,
//!   maximum available execution)
//!
//! # Example
//!
//! ```rust,ignore
//! use lending_orders_sdk::{
//!     create_price_based_order_for_usd_position, Market, Obligation, OrderAction, OrderConfig,
//!     OrderSpecification, OrderType, PriceBasedOrderTrigger,
//! };
//! use rust_decimal_macros::dec;
//!
//! fn main() -> eyre::Result<()> {
//!     let market = Market::from_json_str(&std::fs::read_to_string("market.json")?)?;
//!     let obligation: Obligation =
//!         serde_json::from_str(&std::fs::read_to_string("obligation.json")?)?;
//!     let config = OrderConfig::default();
//!
//!     // Sell the whole SOL collateral if SOL drops below 120 USDC
//!     let update = create_price_based_order_for_usd_position(
//!         &config.price_based_context(&market, &obligation),
//!         OrderType::StopLoss,
//!         Some(&OrderSpecification::new(
//!             PriceBasedOrderTrigger::LongStopLoss { when_collateral_price_below: dec!(120) },
//!             OrderAction::FullRepay,
//!             (dec!(50), dec!(200)), // 0.5% - 2% execution bonus
//!         )),
//!     )?;
//!     let state = update.order_state()?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod contracts;
pub mod error;
pub mod market;
pub mod obligation;
pub mod order;
pub mod orders;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-export main types for convenience
pub use config::OrderConfig;
pub use contracts::{ConditionType, ObligationOrderState, OpportunityType};
pub use error::{error_kind, eyre, Context, ErrorKind, OrderError, Report, Result};
pub use market::{Market, Reserve};
pub use obligation::{Obligation, ObligationStats, Position};
pub use order::{
    AvailableOrderExecution, ConditionHit, ObligationOrder, ObligationOrderAtIndex, OrderCondition,
    OrderOpportunity, TokenAmount,
};
pub use orders::{
    create_ltv_based_order, create_price_based_order_for_usd_position, read_ltv_based_order,
    read_price_based_order_for_usd_position, resolve_position_type, LtvBasedOrderSpecification,
    OrderContext, OrderFamily, PriceBasedOrderContext, PriceBasedOrderSpecification,
};
pub use types::{
    ExecutionBonusBpsRange, LtvBasedOrderTrigger, OrderAction, OrderSpecification, OrderType,
    PositionType, PriceBasedOrderTrigger, SymbolOrMint,
};
