/// price swings - the usd peg moves the native repayment amount
use chrono::{Duration, TimeZone, Utc};
use lending_platform_rs::{
    Amount, FixedPriceOracle, LendingPlatform, PlatformConfig, PriceUsd, SafeTimeProvider,
    TimeSource, SECONDS_PER_YEAR,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== usd-pegged repayment under price swings ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let clock = time.test_control().unwrap();

    let oracle = FixedPriceOracle::new(PriceUsd::from_major(2_000));
    let feed = oracle.controller();
    let mut platform = LendingPlatform::new(PlatformConfig::standard(), Box::new(oracle));

    // two-year term at 5% so the debt is still live a year in
    let id = platform.create_loan_request(
        "alice",
        Amount::from_major(10),
        2 * SECONDS_PER_YEAR,
        500,
        Amount::from_major(20),
        &time,
    )?;
    platform.fund_request(id, "bob", Amount::from_major(10), &time)?;
    println!("funded: 10 ETH @ $2,000 -> $20,000 anchored in usd");

    clock.advance(Duration::days(365));
    println!("\none year later the debt is $21,000 no matter where the price sits:\n");

    for price in [2_000, 1_000, 4_000] {
        feed.set_price(PriceUsd::from_major(price), time.now());
        let due = platform.amount_due(id, &time)?;
        println!(
            "  @ ${:>5}/ETH: {} ETH (${})",
            price, due.amount_due, due.total_due_usd
        );
    }

    // settle at the crashed price: same dollars, twice the coins
    feed.set_price(PriceUsd::from_major(1_000), time.now());
    let due = platform.amount_due(id, &time)?;
    let receipt = platform.repay(id, due.amount_due, &time)?;
    println!("\n✓ repaid {} ETH at the $1,000 price", due.amount_due);
    println!("  the 20 ETH collateral returns to alice in full:");
    for transfer in &receipt.transfers {
        println!(
            "  {:?} {} ETH -> {}",
            transfer.direction, transfer.amount, transfer.account
        );
    }

    Ok(())
}
