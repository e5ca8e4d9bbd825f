pub mod accrual;

use rust_decimal::Decimal;

use crate::calendar::CalendarDate;
use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};

pub use accrual::{AccrualEngine, DayCountConvention};

/// interest calculation result
#[derive(Debug, Clone, PartialEq)]
pub struct InterestCalculation {
    pub interest_amount: Money,
    pub days: u32,
    pub non_leap_days: u32,
    pub leap_days: u32,
    pub principal_base: Money,
    pub calculation_method: String,
}

/// Interest formula shared by the credit and deposit engines.
pub trait InterestCalculator {
    /// interest on `principal` over `[start, end)`; fails when the amount
    /// leaves the decimal range
    fn calculate_interest(
        &self,
        principal: Money,
        rate: Rate,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<InterestCalculation>;

    /// convenience wrapper returning only the amount
    fn interest(&self, principal: Money, rate: Rate, start: CalendarDate, end: CalendarDate) -> Result<Money> {
        Ok(self.calculate_interest(principal, rate, start, end)?.interest_amount)
    }
}

/// Split `amount` over `weights`, giving the rounding remainder to the last share.
pub fn allocate(amount: Money, weights: &[u32]) -> Result<Vec<Money>> {
    let total: u32 = weights.iter().sum();
    if total == 0 || weights.is_empty() {
        return Ok(weights.iter().map(|_| Money::ZERO).collect());
    }

    let mut shares = Vec::with_capacity(weights.len());
    let mut allocated = Money::ZERO;
    for (i, weight) in weights.iter().enumerate() {
        let share = if i + 1 == weights.len() {
            amount - allocated
        } else {
            amount
                .checked_mul(Decimal::from(*weight))
                .and_then(|scaled| scaled.checked_div(Decimal::from(total)))
                .ok_or_else(|| CalcError::overflow("allocated share"))?
                .to_cents()
        };
        allocated += share;
        shares.push(share);
    }
    Ok(shares)
}
