//! Long vs short classification of USD positions

use super::PriceBasedOrderContext;
use crate::error::{ErrorKind, Result};
use crate::market::Market;
use crate::types::{PositionType, SymbolOrMint};
use crate::validation::{check_that, get_single_element};
use alloy::primitives::Address;
use std::collections::HashSet;

/// Resolve whether the context's obligation is a long or a short position
///
/// The obligation must have exactly one deposit and one borrow, and exactly one of them
/// must be a stablecoin: a stablecoin collateral makes a short, a stablecoin debt a long.
/// This is computed from the current snapshot on every call.
pub fn resolve_position_type(context: &PriceBasedOrderContext<'_>) -> Result<PositionType> {
    let obligation = context.base.obligation;
    let collateral_reserve_address = get_single_element(obligation.deposits.keys(), "deposit")?;
    let debt_reserve_address = get_single_element(obligation.borrows.keys(), "borrow")?;
    let stablecoin_reserve_addresses =
        collect_reserve_addresses(context.base.market, context.stablecoins)?;
    if stablecoin_reserve_addresses.contains(collateral_reserve_address) {
        check_that(
            !stablecoin_reserve_addresses.contains(debt_reserve_address),
            ErrorKind::Classification,
            || "cannot resolve long vs short position from all-stablecoins obligation".to_string(),
        )?;
        Ok(PositionType::Short)
    } else {
        check_that(
            stablecoin_reserve_addresses.contains(debt_reserve_address),
            ErrorKind::Classification,
            || "cannot resolve long vs short position from no-stablecoins obligation".to_string(),
        )?;
        Ok(PositionType::Long)
    }
}

/// Resolve the given tokens to the addresses of their reserves
pub fn collect_reserve_addresses(
    market: &Market,
    tokens: &[SymbolOrMint],
) -> Result<HashSet<Address>> {
    tokens
        .iter()
        .map(|token| -> Result<Address> {
            let reserve = match token {
                SymbolOrMint::Symbol(symbol) => market.get_existing_reserve_by_symbol(symbol)?,
                SymbolOrMint::Mint(mint) => market.get_existing_reserve_by_mint(mint)?,
            };
            Ok(reserve.address)
        })
        .collect()
}
