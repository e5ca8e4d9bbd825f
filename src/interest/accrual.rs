use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calendar::{days_in_year, CalendarDate};
use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::interest::{InterestCalculation, InterestCalculator};

/// day count convention for interest calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum DayCountConvention {
    /// actual days, each divided by 365 or 366 depending on its own year
    #[default]
    ActualActual,
    /// actual days / 365
    Actual365,
    /// actual days / 360
    Actual360,
}

/// engine for accruing interest
#[derive(Debug, Clone, Copy, Default)]
pub struct AccrualEngine {
    pub convention: DayCountConvention,
}

impl AccrualEngine {
    pub fn new(convention: DayCountConvention) -> Self {
        Self { convention }
    }

    /// get year basis for the convention
    pub fn year_basis(&self, year: u32) -> u32 {
        match self.convention {
            DayCountConvention::Actual365 => 365,
            DayCountConvention::Actual360 => 360,
            DayCountConvention::ActualActual => days_in_year(year),
        }
    }

    /// calculate simple interest (no compounding)
    pub fn calculate_simple_interest(
        &self,
        principal: Money,
        annual_rate: Rate,
        days: u32,
        year_basis: u32,
    ) -> Result<Money> {
        if year_basis == 0 {
            return Ok(Money::ZERO);
        }
        let daily_rate = annual_rate.as_decimal() / Decimal::from(year_basis);
        principal
            .as_decimal()
            .checked_mul(daily_rate)
            .and_then(|daily| daily.checked_mul(Decimal::from(days)))
            .map(Money::from_decimal)
            .ok_or_else(|| CalcError::overflow("interest"))
    }
}

impl InterestCalculator for AccrualEngine {
    fn calculate_interest(
        &self,
        principal: Money,
        rate: Rate,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<InterestCalculation> {
        let (non_leap_days, leap_days) = start.days_between_split_by_leapness(&end);
        let days = non_leap_days + leap_days;

        let interest_amount = match self.convention {
            DayCountConvention::ActualActual => {
                let year_fraction =
                    Decimal::from(non_leap_days) / dec!(365) + Decimal::from(leap_days) / dec!(366);
                principal
                    .as_decimal()
                    .checked_mul(rate.as_decimal())
                    .and_then(|yearly| yearly.checked_mul(year_fraction))
                    .map(Money::from_decimal)
                    .ok_or_else(|| CalcError::overflow("interest"))?
            }
            DayCountConvention::Actual365 => self.calculate_simple_interest(principal, rate, days, 365)?,
            DayCountConvention::Actual360 => self.calculate_simple_interest(principal, rate, days, 360)?,
        };

        Ok(InterestCalculation {
            interest_amount,
            days,
            non_leap_days,
            leap_days,
            principal_base: principal,
            calculation_method: format!("{:?}", self.convention),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32, m: u32, y: u32) -> CalendarDate {
        CalendarDate::new(d, m, y).unwrap()
    }

    #[test]
    fn test_simple_interest() {
        let engine = AccrualEngine::new(DayCountConvention::Actual365);
        let principal = Money::from_major(10_000);
        let rate = Rate::from_percent(dec!(5));

        let interest = engine.calculate_simple_interest(principal, rate, 30, 365).unwrap();

        let expected = Money::from_str_exact("41.10").unwrap();
        assert_eq!(interest.round_dp(2), expected);
    }

    #[test]
    fn test_year_basis() {
        let actual = AccrualEngine::default();
        assert_eq!(actual.year_basis(2024), 366);
        assert_eq!(actual.year_basis(2023), 365);
        assert_eq!(AccrualEngine::new(DayCountConvention::Actual360).year_basis(2024), 360);
    }

    #[test]
    fn test_leap_split_across_year_end() {
        let engine = AccrualEngine::default();
        let principal = Money::from_major(100_000);
        let rate = Rate::from_percent(dec!(10));

        // 17 days of 2023 at /365 and 14 days of 2024 at /366
        let calc = engine
            .calculate_interest(principal, rate, date(15, 12, 2023), date(15, 1, 2024))
            .unwrap();
        assert_eq!(calc.days, 31);
        assert_eq!(calc.non_leap_days, 17);
        assert_eq!(calc.leap_days, 14);
        let expected = dec!(100000) * dec!(0.1) * (dec!(17) / dec!(365) + dec!(14) / dec!(366));
        assert_eq!(calc.interest_amount, Money::from_decimal(expected));
        assert_eq!(calc.interest_amount.to_cents(), Money::from_str_exact("848.27").unwrap());
    }

    #[test]
    fn test_conventions_differ_only_in_basis() {
        let principal = Money::from_major(36_500);
        let rate = Rate::from_percent(dec!(10));
        let start = date(1, 1, 2023);
        let end = date(1, 2, 2023);

        let act365 = AccrualEngine::new(DayCountConvention::Actual365).interest(principal, rate, start, end).unwrap();
        let actact = AccrualEngine::default().interest(principal, rate, start, end).unwrap();
        let act360 = AccrualEngine::new(DayCountConvention::Actual360).interest(principal, rate, start, end).unwrap();

        assert_eq!(act365, Money::from_major(310));
        assert_eq!(actact, act365);
        assert!(act360 > act365);
    }

    #[test]
    fn test_empty_period() {
        let engine = AccrualEngine::default();
        let calc = engine.calculate_interest(
            Money::from_major(1_000),
            Rate::from_percent(dec!(5)),
            date(1, 1, 2024),
            date(1, 1, 2024),
        )
        .unwrap();
        assert_eq!(calc.days, 0);
        assert!(calc.interest_amount.is_zero());
    }

    #[test]
    fn test_overflowing_interest_is_an_error() {
        let principal = Money::from_decimal(Decimal::MAX / dec!(10));
        let rate = Rate::from_percent(dec!(5000));
        for convention in [
            DayCountConvention::ActualActual,
            DayCountConvention::Actual365,
            DayCountConvention::Actual360,
        ] {
            let result = AccrualEngine::new(convention).interest(principal, rate, date(1, 1, 2023), date(1, 1, 2025));
            assert!(matches!(result, Err(CalcError::InvalidConfiguration { .. })), "{:?}", convention);
        }
    }
}
