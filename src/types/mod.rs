//! Types for user-facing API

pub mod order;
pub mod trigger;

pub use order::{ExecutionBonusBpsRange, OrderAction, OrderSpecification, OrderType};
pub use trigger::{LtvBasedOrderTrigger, PositionType, PriceBasedOrderTrigger, SymbolOrMint};
