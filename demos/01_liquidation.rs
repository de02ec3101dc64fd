/// liquidation - expired loans forfeit collateral to the lender
use chrono::{Duration, TimeZone, Utc};
use lending_platform_rs::{
    Amount, FixedPriceOracle, LendingPlatform, PlatformConfig, PriceUsd, SafeTimeProvider,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== liquidation after expiry ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    ));
    let clock = time.test_control().unwrap();

    let oracle = FixedPriceOracle::new(PriceUsd::from_major(2_000));
    let mut platform = LendingPlatform::new(PlatformConfig::standard(), Box::new(oracle));

    let id = platform.create_loan_request(
        "alice",
        Amount::from_major(5),
        30 * 86_400,
        700,
        Amount::from_major(10),
        &time,
    )?;
    platform.fund_request(id, "bob", Amount::from_major(5), &time)?;
    println!("loan #{} funded: 5 ETH for 30 days, 10 ETH collateral", id);

    // day 29: the term still has a day to run, nobody may seize yet
    clock.advance(Duration::days(29));
    if let Err(e) = platform.liquidate(id, &time) {
        println!("\nday 29: liquidation rejected ({})", e);
    }

    // day 30: the loan is expired and anyone may liquidate it
    clock.advance(Duration::days(1));
    let loan = platform.registry().loan(id)?;
    println!("day 30: status {:?}", loan.status(time.now()));

    let receipt = platform.liquidate(id, &time)?;
    println!("\n⚠️  liquidated; settlement transfers:");
    for transfer in &receipt.transfers {
        println!(
            "  {:?} {} ETH -> {}",
            transfer.direction, transfer.amount, transfer.account
        );
    }
    println!("\nalice keeps the 5 ETH principal, bob keeps the 10 ETH collateral");

    let loan = platform.registry().loan(id)?;
    println!("final status: {:?}", loan.status(time.now()));

    // a late repayment now finds the loan already settled
    if let Err(e) = platform.repay(id, Amount::from_major(100), &time) {
        println!("late repay attempt: {}", e);
    }

    println!("\nevents:");
    for event in platform.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
