/// quick start - evaluate an expression and run a small credit schedule
use calc_core_rs::rust_decimal::Decimal;
use calc_core_rs::{
    evaluate_expression_to_string, run_credit_schedule, CalendarDate, Money, Scheme, TermUnit,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // expression with the free variable bound to 3
    println!("2x^2 + 1 at x = 3: {}", evaluate_expression_to_string("2x^2 + 1", 3.0)?);

    // a 1,000 annuity credit over 4 months at 5%
    let outcome = run_credit_schedule(
        Money::from_major(1_000),
        4,
        TermUnit::Months,
        Decimal::from(5),
        Scheme::First,
        CalendarDate::new(1, 7, 2023)?,
    )?;

    println!("\n{}", outcome.table().render());

    Ok(())
}
