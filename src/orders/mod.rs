//! Translation between user-facing orders and on-chain obligation orders

mod context;
mod family;
mod ltv_based;
mod position;
mod price_based;
mod translation;

pub use context::{OrderContext, PriceBasedOrderContext};
pub use family::{create_order, read_order, OrderFamily};
pub use ltv_based::{create_ltv_based_order, read_ltv_based_order, LtvBasedOrderSpecification};
pub use position::{collect_reserve_addresses, resolve_position_type};
pub use price_based::{
    create_price_based_order_for_usd_position, read_price_based_order_for_usd_position,
    PriceBasedOrderSpecification,
};
pub use translation::{
    create_condition_based_order, read_trigger_based_order, to_execution_bonus_rates,
    to_order_index, to_order_opportunity,
};
