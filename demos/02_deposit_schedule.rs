/// deposit schedule - capitalized deposit with a refill, a rejected withdrawal and tax
use calc_core_rs::rust_decimal::Decimal;
use calc_core_rs::{
    AccrualFrequency, CalendarDate, DepositEngine, DepositParams, Money, Operation, ScheduleEvent,
    Scheme, TermUnit,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== deposit schedule ===\n");

    let params = DepositParams::builder()
        .amount(Money::from_major(2_000_000))
        .term(18, TermUnit::Months)
        .annual_rate_percent(Decimal::from(16))
        .tax_rate_multiplier(Decimal::from(16))
        .scheme(Scheme::Second)
        .frequency(AccrualFrequency::Quarter)
        .start_date(CalendarDate::new(1, 9, 2024)?)
        .operation(Operation::refill(CalendarDate::new(20, 12, 2024)?, Money::from_major(500_000)))
        // larger than the balance, dropped
        .operation(Operation::withdrawal(CalendarDate::new(1, 3, 2025)?, Money::from_major(9_000_000)))
        .build()?;

    let engine = DepositEngine::new(params)?;
    println!("maturity: {}\n", engine.maturity());
    let outcome = engine.run()?;

    println!("{}\n", outcome.table().render());
    println!("{}\n", outcome.tax_table().render());

    for event in &outcome.events {
        if let ScheduleEvent::OperationRejected { date, amount, reason, .. } = event {
            println!("rejected {} on {}: {}", amount, date, reason);
        }
    }

    Ok(())
}
