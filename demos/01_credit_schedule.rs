/// credit schedule - annuity vs differentiated repayment of the same loan
use calc_core_rs::rust_decimal::Decimal;
use calc_core_rs::{CalendarDate, CreditEngine, CreditParams, Money, Scheme, TermUnit};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== credit schedules ===\n");

    for scheme in [Scheme::First, Scheme::Second] {
        let params = CreditParams::builder()
            .amount(Money::from_major(300_000))
            .term(1, TermUnit::Years)
            .annual_rate_percent(Decimal::new(125, 1))
            .scheme(scheme)
            // payments stay on the last day of the month
            .start_date(CalendarDate::new(31, 1, 2024)?)
            .build()?;

        let outcome = CreditEngine::new(params)?.run()?;

        println!("{:?}", scheme);
        println!("{}\n", "-".repeat(format!("{:?}", scheme).len()));
        println!("{}\n", outcome.table().render());
    }

    Ok(())
}
