//! The create / read flow common to all order families
//!
//! A family only decides whether an obligation is compatible with it and how its
//! triggers map onto on-chain conditions; everything else is shared.

use super::translation::{create_condition_based_order, read_trigger_based_order, to_order_index};
use super::OrderContext;
use crate::error::Result;
use crate::order::{ObligationOrderAtIndex, OrderCondition};
use crate::types::{OrderSpecification, OrderType};

/// An order family, bound to the context it translates orders against
pub trait OrderFamily {
    /// The family's user-facing trigger
    type Trigger;
    /// What the compatibility check learns about the obligation (e.g. its position type)
    type Compatibility: Copy;

    /// Human-readable family name, used in logs
    const NAME: &'static str;

    /// The underlying market and obligation
    fn order_context(&self) -> &OrderContext<'_>;

    /// Validate that the obligation can hold orders of this family
    fn check_compatible(&self) -> Result<Self::Compatibility>;

    /// Map a trigger onto the on-chain condition of the given order type
    fn to_condition(
        compatibility: Self::Compatibility,
        order_type: OrderType,
        trigger: &Self::Trigger,
    ) -> Result<OrderCondition>;

    /// Map a stored on-chain condition back onto a trigger of the given order type
    fn to_trigger(
        compatibility: Self::Compatibility,
        condition: &OrderCondition,
        order_type: OrderType,
    ) -> Result<Self::Trigger>;
}

/// Create the slot update placing (or cancelling, if `specification` is `None`) an order
pub fn create_order<F: OrderFamily>(
    family: &F,
    order_type: OrderType,
    specification: Option<&OrderSpecification<F::Trigger>>,
) -> Result<ObligationOrderAtIndex> {
    let compatibility = family.check_compatible()?;
    let index = to_order_index(order_type);
    let Some(specification) = specification else {
        tracing::debug!(family = F::NAME, %order_type, index, "cancelling order slot");
        return Ok(ObligationOrderAtIndex::empty(index));
    };
    let condition = F::to_condition(compatibility, order_type, &specification.trigger)?;
    let order = create_condition_based_order(family.order_context(), condition, specification)?;
    tracing::debug!(
        family = F::NAME,
        %order_type,
        index,
        %condition,
        threshold = %condition.threshold(),
        opportunity = %order.opportunity,
        "created order"
    );
    Ok(order.at_index(index))
}

/// Read the specification of the order stored in the slot of the given type
///
/// Returns `None` if the slot is empty.
pub fn read_order<F: OrderFamily>(
    family: &F,
    order_type: OrderType,
) -> Result<Option<OrderSpecification<F::Trigger>>> {
    let compatibility = family.check_compatible()?;
    let index = to_order_index(order_type);
    let orders = family.order_context().obligation.get_orders();
    let Some(order) = &orders[index as usize] else {
        return Ok(None);
    };
    let trigger = F::to_trigger(compatibility, &order.condition, order_type)?;
    Ok(Some(read_trigger_based_order(order, trigger)))
}
