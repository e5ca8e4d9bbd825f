pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod expression;
pub mod interest;
pub mod schedule;
pub mod types;

use rust_decimal::Decimal;

// re-export key types
pub use calendar::{days_in_month, days_in_year, is_leap_year, CalendarDate};
pub use config::{
    CreditParams, CreditParamsBuilder, DepositParams, DepositParamsBuilder, Operation,
    BALANCE_EPSILON, NON_TAXABLE_BASE, SAFETY_PERIODS, TAX_RATE,
};
pub use decimal::{Money, Rate};
pub use errors::{CalcError, Result};
pub use events::{EventStore, ScheduleEvent};
pub use expression::{tabulate, Expression};
pub use interest::{AccrualEngine, DayCountConvention, InterestCalculation, InterestCalculator};
pub use schedule::{
    CreditEngine, CreditOutcome, CreditSummary, DepositEngine, DepositOutcome, DepositSummary,
    ScheduleRow, TableView, TaxRow,
};
pub use types::{AccrualFrequency, OperationKind, RowKind, Scheme, TermUnit};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal;

/// Evaluate an infix expression with `x` bound to `variable`.
pub fn evaluate_expression(infix: &str, variable: f64) -> Result<f64> {
    expression::evaluate(infix, variable)
}

/// Evaluate and render with trailing zeros trimmed.
pub fn evaluate_expression_to_string(infix: &str, variable: f64) -> Result<String> {
    expression::evaluate_to_string(infix, variable)
}

pub fn validate_expression(infix: &str) -> bool {
    expression::validate(infix)
}

/// Build a fresh credit engine for one calculation and run it.
pub fn run_credit_schedule(
    amount: Money,
    term: u32,
    term_unit: TermUnit,
    annual_rate_percent: Decimal,
    scheme: Scheme,
    start_date: CalendarDate,
) -> Result<CreditOutcome> {
    let params = CreditParams::new(amount, term, term_unit, annual_rate_percent, scheme, start_date)?;
    CreditEngine::new(params)?.run()
}

/// Build a fresh deposit engine for one calculation and run it.
#[allow(clippy::too_many_arguments)]
pub fn run_deposit_schedule(
    amount: Money,
    term: u32,
    term_unit: TermUnit,
    annual_rate_percent: Decimal,
    tax_rate_multiplier: Decimal,
    scheme: Scheme,
    frequency: AccrualFrequency,
    start_date: CalendarDate,
    operations: Vec<Operation>,
) -> Result<DepositOutcome> {
    let params = DepositParams {
        amount,
        term,
        term_unit,
        annual_rate_percent,
        tax_rate_multiplier,
        scheme,
        frequency,
        start_date,
        operations,
        day_count: DayCountConvention::default(),
    };
    DepositEngine::new(params)?.run()
}
