//! Order round trip demo
//!
//! Run with: cargo run --example order_roundtrip
//!
//! Builds a long SOL / USDC obligation, places price-based and LTV-based orders on it,
//! encodes them as on-chain records and reads them back. Set RUST_LOG=debug to see the
//! translation steps.

use alloy::primitives::address;
use lending_orders_sdk::{
    create_ltv_based_order, create_price_based_order_for_usd_position, read_ltv_based_order,
    read_price_based_order_for_usd_position, LtvBasedOrderTrigger, Market, Obligation, OrderAction,
    OrderConfig, OrderContext, OrderSpecification, OrderType, Position, PriceBasedOrderTrigger,
    Reserve,
};
use rust_decimal_macros::dec;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let sol_reserve = address!("00000000000000000000000000000000000000a1");
    let sol_mint = address!("00000000000000000000000000000000000000b1");
    let usdc_reserve = address!("00000000000000000000000000000000000000a3");
    let usdc_mint = address!("00000000000000000000000000000000000000b3");

    let market = Market::new(
        address!("00000000000000000000000000000000000000c0"),
        [
            Reserve::new(sol_reserve, "SOL", sol_mint, 65, 75),
            Reserve::new(usdc_reserve, "USDC", usdc_mint, 80, 85),
        ],
    );
    // 10 SOL at 150 against 600 USDC
    let sol = Position::from_tokens(sol_reserve, sol_mint, dec!(10), dec!(150), 9)?;
    let usdc = Position::from_tokens(usdc_reserve, usdc_mint, dec!(600), dec!(1), 6)?;
    let mut obligation = Obligation::new(address!("00000000000000000000000000000000000000d0"))
        .with_deposit(sol)
        .with_borrow(usdc.clone())
        .refreshed(&market)?;
    println!("LTV: {}", obligation.loan_to_value());

    let config = OrderConfig::default();

    println!("\n=== Price-based stop-loss ===");
    let stop_loss = OrderSpecification::new(
        PriceBasedOrderTrigger::LongStopLoss {
            when_collateral_price_below: dec!(110),
        },
        OrderAction::FullRepay,
        (dec!(50), dec!(200)),
    );
    let update = create_price_based_order_for_usd_position(
        &config.price_based_context(&market, &obligation),
        OrderType::StopLoss,
        Some(&stop_loss),
    )?;
    println!("Slot {}: {:?}", update.index, update.order_state()?);
    obligation.apply_order_update(&update)?;

    println!("\n=== LTV-based take-profit ===");
    let take_profit = OrderSpecification::new(
        LtvBasedOrderTrigger::TakeProfit {
            when_ltv_pct_below: dec!(30),
        },
        OrderAction::partial_repay(dec!(200000000)),
        (dec!(0), dec!(25)),
    );
    let update = create_ltv_based_order(
        &OrderContext::new(&market, &obligation),
        OrderType::TakeProfit,
        Some(&take_profit),
    )?;
    println!("Slot {}: {:?}", update.index, update.order_state()?);
    obligation.apply_order_update(&update)?;

    println!("\n=== Read back ===");
    let read_stop_loss = read_price_based_order_for_usd_position(
        &config.price_based_context(&market, &obligation),
        OrderType::StopLoss,
    )?;
    println!("Stop-loss: {}", serde_json::to_string(&read_stop_loss)?);
    let context = OrderContext::new(&market, &obligation);
    let read_take_profit = read_ltv_based_order(&context, OrderType::TakeProfit)?;
    println!("Take-profit: {}", serde_json::to_string(&read_take_profit)?);

    println!("\n=== SOL drops to 100 ===");
    let sol = Position::from_tokens(sol_reserve, sol_mint, dec!(10), dec!(100), 9)?;
    let crashed = Obligation {
        orders: obligation.orders.clone(),
        ..Obligation::new(obligation.address)
            .with_deposit(sol)
            .with_borrow(usdc)
            .refreshed(&market)?
    };
    for order in crashed.get_orders().iter().flatten() {
        match order.find_max_available_execution(&market, &crashed)? {
            Some(execution) => println!(
                "{} executable: repay {} for {} (bonus {})",
                order.condition,
                execution.repay.amount,
                execution.withdraw.amount,
                execution.bonus_rate
            ),
            None => println!("{} not triggered", order.condition),
        }
    }

    Ok(())
}
