/// full lifecycle - request, fund, repay with usd-pegged interest
use chrono::{Duration, TimeZone, Utc};
use lending_platform_rs::{
    Amount, FixedPriceOracle, LendingPlatform, PlatformConfig, PriceUsd, QueryService,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== full loan lifecycle ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let clock = time.test_control().unwrap();

    let oracle = FixedPriceOracle::new(PriceUsd::from_major(2_000));
    let mut platform = LendingPlatform::new(PlatformConfig::standard(), Box::new(oracle));

    // alice asks for 10 eth over 180 days at 5%, posting 20 eth collateral
    let id = platform.create_loan_request(
        "alice",
        Amount::from_major(10),
        180 * 86_400,
        500,
        Amount::from_major(20),
        &time,
    )?;
    println!("request #{} created:", id);
    println!("  principal: 10 ETH");
    println!("  collateral: 20 ETH (2x)");
    println!("  rate: 5% apr, term: 180 days");

    // bob funds it in full at the current price
    platform.fund_request(id, "bob", Amount::from_major(10), &time)?;
    let loan = platform.registry().loan(id)?;
    println!("\n✓ funded by bob @ ${} per ETH", loan.initial_price_usd);
    println!("  usd anchor: 10 ETH x $2,000 = $20,000");

    // 90 days in, check what settles the loan
    clock.advance(Duration::days(90));
    let due = platform.amount_due(id, &time)?;
    println!("\nafter 90 days:");
    println!("  interest: ${}", due.interest_usd);
    println!("  total due: ${} = {} ETH", due.total_due_usd, due.amount_due);

    // alice repays in full; collateral comes back with the receipt
    let receipt = platform.repay(id, due.amount_due, &time)?;
    println!("\n✓ repaid; settlement transfers:");
    for transfer in &receipt.transfers {
        println!(
            "  {:?} {} ETH -> {}",
            transfer.direction, transfer.amount, transfer.account
        );
    }

    // final state
    let queries = QueryService::new(platform.registry());
    println!("\nledger:\n{}", queries.list_all(&time).to_json_pretty()?);

    println!("\nevents:");
    for event in platform.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
