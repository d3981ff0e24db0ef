//! Market and obligation snapshots shared by the unit tests

use crate::market::{Market, Reserve};
use crate::obligation::{Obligation, Position};
use crate::types::SymbolOrMint;
use alloy::primitives::{address, Address};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const MARKET: Address = address!("00000000000000000000000000000000000000c0");
pub const OBLIGATION: Address = address!("00000000000000000000000000000000000000d0");

pub const SOL_RESERVE: Address = address!("00000000000000000000000000000000000000a1");
pub const SOL_MINT: Address = address!("00000000000000000000000000000000000000b1");
pub const USDT_RESERVE: Address = address!("00000000000000000000000000000000000000a2");
pub const USDT_MINT: Address = address!("00000000000000000000000000000000000000b2");
pub const USDC_RESERVE: Address = address!("00000000000000000000000000000000000000a3");
pub const USDC_MINT: Address = address!("00000000000000000000000000000000000000b3");
pub const JUP_RESERVE: Address = address!("00000000000000000000000000000000000000a4");
pub const JUP_MINT: Address = address!("00000000000000000000000000000000000000b4");
pub const BONK_RESERVE: Address = address!("00000000000000000000000000000000000000a5");
pub const BONK_MINT: Address = address!("00000000000000000000000000000000000000b5");

/// (reserve, mint, symbol, max LTV %, liquidation threshold %, price, decimals)
const TOKENS: [(Address, Address, &str, u8, u8, Decimal, u32); 5] = [
    (SOL_RESERVE, SOL_MINT, "SOL", 65, 75, dec!(100), 9),
    (USDT_RESERVE, USDT_MINT, "USDT", 80, 85, dec!(1), 6),
    (USDC_RESERVE, USDC_MINT, "USDC", 80, 85, dec!(1), 6),
    (JUP_RESERVE, JUP_MINT, "JUP", 50, 60, dec!(4), 6),
    (BONK_RESERVE, BONK_MINT, "BONK", 0, 0, dec!(0.00002), 5),
];

pub fn market() -> Market {
    let mut reserves = Vec::new();
    for &(address, mint, symbol, ltv_pct, liquidation_pct, ..) in &TOKENS {
        let reserve = Reserve::new(address, symbol, mint, ltv_pct, liquidation_pct);
        reserves.push(reserve);
    }
    Market::new(MARKET, reserves)
}

pub fn stablecoins() -> Vec<SymbolOrMint> {
    vec![SymbolOrMint::from("USDC"), SymbolOrMint::from("USDT")]
}

/// A position of the given reserve, worth `value` at the token's default price
pub fn position(reserve_address: Address, value: Decimal) -> Position {
    let (_, _, _, _, _, price, _) = token(reserve_address);
    position_at_price(reserve_address, value / price, price)
}

/// A position of `tokens` whole tokens of the given reserve at the given price
pub fn position_at_price(reserve_address: Address, tokens: Decimal, price: Decimal) -> Position {
    let (reserve, mint, _, _, _, _, decimals) = token(reserve_address);
    Position::from_tokens(reserve, mint, tokens, price, decimals).unwrap()
}

fn token(reserve_address: Address) -> (Address, Address, &'static str, u8, u8, Decimal, u32) {
    *TOKENS
        .iter()
        .find(|(reserve, ..)| *reserve == reserve_address)
        .expect("unknown test reserve")
}

fn refreshed(obligation: Obligation) -> Obligation {
    obligation.refreshed(&market()).unwrap()
}

/// Deposits and borrows worth the given values
pub fn obligation_of(
    deposits: &[(Address, Decimal)],
    borrows: &[(Address, Decimal)],
) -> Obligation {
    let mut obligation = Obligation::new(OBLIGATION);
    for (reserve, value) in deposits {
        obligation = obligation.with_deposit(position(*reserve, *value));
    }
    for (reserve, value) in borrows {
        obligation = obligation.with_borrow(position(*reserve, *value));
    }
    refreshed(obligation)
}

/// 10 SOL (worth 1000) against the given value of USDC
///
/// LTV is `usdc_borrow_value / 1000`, liquidation LTV is 75%.
pub fn ltv_obligation(usdc_borrow_value: Decimal) -> Obligation {
    obligation_of(
        &[(SOL_RESERVE, dec!(1000))],
        &[(USDC_RESERVE, usdc_borrow_value)],
    )
}

/// A long SOL position: 10 SOL at the given price against 500 USDC
pub fn long_obligation(sol_price: Decimal) -> Obligation {
    refreshed(
        Obligation::new(OBLIGATION)
            .with_deposit(position_at_price(SOL_RESERVE, dec!(10), sol_price))
            .with_borrow(position(USDC_RESERVE, dec!(500))),
    )
}

/// A short JUP position: 100 JUP at the given price borrowed against 1000 USDC
pub fn short_obligation(jup_price: Decimal) -> Obligation {
    refreshed(
        Obligation::new(OBLIGATION)
            .with_deposit(position(USDC_RESERVE, dec!(1000)))
            .with_borrow(position_at_price(JUP_RESERVE, dec!(100), jup_price)),
    )
}

pub fn multi_deposit_obligation() -> Obligation {
    obligation_of(
        &[(SOL_RESERVE, dec!(1000)), (USDT_RESERVE, dec!(100))],
        &[(USDC_RESERVE, dec!(500))],
    )
}

pub fn multi_borrow_obligation() -> Obligation {
    obligation_of(
        &[(SOL_RESERVE, dec!(1000))],
        &[(USDC_RESERVE, dec!(200)), (USDT_RESERVE, dec!(100))],
    )
}

/// BONK (0% LTV) against USDC
pub fn zero_ltv_collateral_obligation() -> Obligation {
    obligation_of(&[(BONK_RESERVE, dec!(1000))], &[(USDC_RESERVE, dec!(100))])
}
