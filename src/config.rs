use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::interest::DayCountConvention;
use crate::types::{AccrualFrequency, OperationKind, Scheme, TermUnit};

/// yearly non-taxable base before the multiplier is applied
pub const NON_TAXABLE_BASE: Decimal = dec!(1000000);

/// statutory tax rate on deposit income above the threshold
pub const TAX_RATE: Decimal = dec!(0.13);

/// period count after which a credit that is back at its original principal is forced closed
pub const SAFETY_PERIODS: u32 = 500;

/// remaining credit balance below this is written off
pub const BALANCE_EPSILON: Decimal = dec!(0.001);

fn invalid(message: impl Into<String>) -> CalcError {
    CalcError::InvalidConfiguration {
        message: message.into(),
    }
}

/// credit calculation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditParams {
    pub amount: Money,
    pub term: u32,
    pub term_unit: TermUnit,
    /// nominal annual rate in percent
    pub annual_rate_percent: Decimal,
    pub scheme: Scheme,
    pub start_date: CalendarDate,
    #[serde(default)]
    pub day_count: DayCountConvention,
}

impl CreditParams {
    pub fn new(
        amount: Money,
        term: u32,
        term_unit: TermUnit,
        annual_rate_percent: Decimal,
        scheme: Scheme,
        start_date: CalendarDate,
    ) -> Result<Self> {
        let params = Self {
            amount,
            term,
            term_unit,
            annual_rate_percent,
            scheme,
            start_date,
            day_count: DayCountConvention::default(),
        };
        params.validate()?;
        Ok(params)
    }

    pub fn builder() -> CreditParamsBuilder {
        CreditParamsBuilder::new()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(invalid("credit amount must be positive"));
        }
        if self.term == 0 {
            return Err(invalid("credit term must be positive"));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(invalid("credit rate must not be negative"));
        }
        self.term_months().map(|_| ())
    }

    /// term in months; day terms are not accepted for credits
    pub fn term_months(&self) -> Result<u32> {
        self.term_unit
            .to_months(self.term)
            .ok_or_else(|| invalid(format!("credit term cannot be given in {:?}", self.term_unit)))
    }

    pub fn rate(&self) -> Rate {
        Rate::from_percent(self.annual_rate_percent)
    }
}

pub struct CreditParamsBuilder {
    amount: Option<Money>,
    term: Option<(u32, TermUnit)>,
    annual_rate_percent: Option<Decimal>,
    scheme: Scheme,
    start_date: Option<CalendarDate>,
    day_count: DayCountConvention,
}

impl CreditParamsBuilder {
    pub fn new() -> Self {
        Self {
            amount: None,
            term: None,
            annual_rate_percent: None,
            scheme: Scheme::First,
            start_date: None,
            day_count: DayCountConvention::default(),
        }
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn term(mut self, value: u32, unit: TermUnit) -> Self {
        self.term = Some((value, unit));
        self
    }

    pub fn annual_rate_percent(mut self, percent: Decimal) -> Self {
        self.annual_rate_percent = Some(percent);
        self
    }

    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn start_date(mut self, date: CalendarDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn day_count(mut self, convention: DayCountConvention) -> Self {
        self.day_count = convention;
        self
    }

    pub fn build(self) -> Result<CreditParams> {
        let amount = self.amount.ok_or_else(|| invalid("amount required"))?;
        let (term, term_unit) = self.term.ok_or_else(|| invalid("term required"))?;
        let annual_rate_percent = self
            .annual_rate_percent
            .ok_or_else(|| invalid("rate required"))?;
        let start_date = self.start_date.ok_or_else(|| invalid("start date required"))?;

        let params = CreditParams {
            amount,
            term,
            term_unit,
            annual_rate_percent,
            scheme: self.scheme,
            start_date,
            day_count: self.day_count,
        };
        params.validate()?;
        Ok(params)
    }
}

impl Default for CreditParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// refill or withdrawal on a given date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub date: CalendarDate,
    pub amount: Money,
    pub kind: OperationKind,
}

impl Operation {
    pub fn refill(date: CalendarDate, amount: Money) -> Self {
        Self {
            date,
            amount,
            kind: OperationKind::Refill,
        }
    }

    pub fn withdrawal(date: CalendarDate, amount: Money) -> Self {
        Self {
            date,
            amount,
            kind: OperationKind::Withdrawal,
        }
    }

    /// amount with the sign it has on the balance
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            OperationKind::Refill => self.amount,
            OperationKind::Withdrawal => -self.amount,
        }
    }
}

/// deposit calculation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositParams {
    pub amount: Money,
    pub term: u32,
    pub term_unit: TermUnit,
    /// nominal annual rate in percent
    pub annual_rate_percent: Decimal,
    /// key rate in percent scaling the non-taxable base
    pub tax_rate_multiplier: Decimal,
    pub scheme: Scheme,
    pub frequency: AccrualFrequency,
    pub start_date: CalendarDate,
    #[serde(default)]
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub day_count: DayCountConvention,
}

impl DepositParams {
    pub fn builder() -> DepositParamsBuilder {
        DepositParamsBuilder::new()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(invalid("deposit amount must be positive"));
        }
        if self.term == 0 {
            return Err(invalid("deposit term must be positive"));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(invalid("deposit rate must not be negative"));
        }
        if self.tax_rate_multiplier < Decimal::ZERO {
            return Err(invalid("tax rate multiplier must not be negative"));
        }
        if self.tax_rate_multiplier.checked_mul(NON_TAXABLE_BASE).is_none() {
            return Err(invalid("tax rate multiplier is too large"));
        }
        if let Some(op) = self.operations.iter().find(|op| !op.amount.is_positive()) {
            return Err(invalid(format!("operation on {} must have a positive amount", op.date)));
        }
        if self.term_unit == TermUnit::Years && self.term.checked_mul(12).is_none() {
            return Err(invalid("deposit term is too long"));
        }
        Ok(())
    }

    pub fn rate(&self) -> Rate {
        Rate::from_percent(self.annual_rate_percent)
    }

    /// end of the term, fixed up front
    pub fn maturity_date(&self) -> CalendarDate {
        let anchor = self.start_date.day();
        match self.term_unit {
            TermUnit::Days => self.start_date.add_days(self.term),
            TermUnit::Months => self.start_date.add_months_clamped(self.term, anchor),
            TermUnit::Years => self
                .start_date
                .add_months_clamped(self.term.saturating_mul(12), anchor),
        }
    }

    /// yearly income exempt from tax
    pub fn non_taxable_threshold(&self) -> Money {
        Money::from_decimal(NON_TAXABLE_BASE * self.tax_rate_multiplier / Decimal::ONE_HUNDRED)
    }
}

pub struct DepositParamsBuilder {
    amount: Option<Money>,
    term: Option<(u32, TermUnit)>,
    annual_rate_percent: Option<Decimal>,
    tax_rate_multiplier: Decimal,
    scheme: Scheme,
    frequency: AccrualFrequency,
    start_date: Option<CalendarDate>,
    operations: Vec<Operation>,
    day_count: DayCountConvention,
}

impl DepositParamsBuilder {
    pub fn new() -> Self {
        Self {
            amount: None,
            term: None,
            annual_rate_percent: None,
            tax_rate_multiplier: Decimal::ZERO,
            scheme: Scheme::First,
            frequency: AccrualFrequency::Month,
            start_date: None,
            operations: Vec::new(),
            day_count: DayCountConvention::default(),
        }
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn term(mut self, value: u32, unit: TermUnit) -> Self {
        self.term = Some((value, unit));
        self
    }

    pub fn annual_rate_percent(mut self, percent: Decimal) -> Self {
        self.annual_rate_percent = Some(percent);
        self
    }

    pub fn tax_rate_multiplier(mut self, multiplier: Decimal) -> Self {
        self.tax_rate_multiplier = multiplier;
        self
    }

    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn frequency(mut self, frequency: AccrualFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn start_date(mut self, date: CalendarDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn day_count(mut self, convention: DayCountConvention) -> Self {
        self.day_count = convention;
        self
    }

    pub fn build(self) -> Result<DepositParams> {
        let amount = self.amount.ok_or_else(|| invalid("amount required"))?;
        let (term, term_unit) = self.term.ok_or_else(|| invalid("term required"))?;
        let annual_rate_percent = self
            .annual_rate_percent
            .ok_or_else(|| invalid("rate required"))?;
        let start_date = self.start_date.ok_or_else(|| invalid("start date required"))?;

        let params = DepositParams {
            amount,
            term,
            term_unit,
            annual_rate_percent,
            tax_rate_multiplier: self.tax_rate_multiplier,
            scheme: self.scheme,
            frequency: self.frequency,
            start_date,
            operations: self.operations,
            day_count: self.day_count,
        };
        params.validate()?;
        Ok(params)
    }
}

impl Default for DepositParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32, m: u32, y: u32) -> CalendarDate {
        CalendarDate::new(d, m, y).unwrap()
    }

    #[test]
    fn test_credit_builder() {
        let params = CreditParams::builder()
            .amount(Money::from_major(1_000))
            .term(1, TermUnit::Years)
            .annual_rate_percent(dec!(5))
            .start_date(date(1, 7, 2023))
            .build()
            .unwrap();

        assert_eq!(params.term_months().unwrap(), 12);
        assert_eq!(params.rate().as_decimal(), dec!(0.05));
        assert_eq!(params.scheme, Scheme::First);
    }

    #[test]
    fn test_credit_rejects_bad_input() {
        let base = CreditParams::builder()
            .amount(Money::from_major(1_000))
            .annual_rate_percent(dec!(5))
            .start_date(date(1, 7, 2023));

        let days = base.term(30, TermUnit::Days).build();
        assert!(matches!(days, Err(CalcError::InvalidConfiguration { .. })));

        let missing = CreditParams::builder().amount(Money::from_major(1_000)).build();
        assert!(missing.is_err());

        let negative = CreditParams::new(
            Money::from_major(1_000),
            12,
            TermUnit::Months,
            dec!(-1),
            Scheme::Second,
            date(1, 1, 2024),
        );
        assert!(negative.is_err());
    }

    #[test]
    fn test_credit_from_json() {
        let json = r#"{
            "amount": "1000",
            "term": 4,
            "term_unit": "Months",
            "annual_rate_percent": "5",
            "scheme": "First",
            "start_date": { "day": 1, "month": 7, "year": 2023 }
        }"#;
        let params = CreditParams::from_json(json).unwrap();
        assert_eq!(params.amount, Money::from_major(1_000));
        assert_eq!(params.day_count, DayCountConvention::ActualActual);

        let bad_date = json.replace("\"day\": 1", "\"day\": 31").replace("\"month\": 7", "\"month\": 6");
        assert!(CreditParams::from_json(&bad_date).is_err());
    }

    #[test]
    fn test_deposit_maturity() {
        let deposit = |term, unit| {
            DepositParams::builder()
                .amount(Money::from_major(10_000))
                .term(term, unit)
                .annual_rate_percent(dec!(8))
                .start_date(date(31, 1, 2024))
                .build()
                .unwrap()
        };

        assert_eq!(deposit(1, TermUnit::Months).maturity_date(), date(29, 2, 2024));
        assert_eq!(deposit(3, TermUnit::Months).maturity_date(), date(30, 4, 2024));
        assert_eq!(deposit(1, TermUnit::Years).maturity_date(), date(31, 1, 2025));
        assert_eq!(deposit(30, TermUnit::Days).maturity_date(), date(1, 3, 2024));
    }

    #[test]
    fn test_threshold_and_operations() {
        let params = DepositParams::builder()
            .amount(Money::from_major(10_000))
            .term(6, TermUnit::Months)
            .annual_rate_percent(dec!(8))
            .tax_rate_multiplier(dec!(16))
            .start_date(date(1, 1, 2024))
            .operation(Operation::withdrawal(date(1, 3, 2024), Money::from_major(500)))
            .build()
            .unwrap();

        assert_eq!(params.non_taxable_threshold(), Money::from_major(160_000));
        assert_eq!(params.operations[0].signed_amount(), Money::from_major(-500));

        let zero_op = DepositParams::builder()
            .amount(Money::from_major(10_000))
            .term(6, TermUnit::Months)
            .annual_rate_percent(dec!(8))
            .start_date(date(1, 1, 2024))
            .operation(Operation::refill(date(1, 3, 2024), Money::ZERO))
            .build();
        assert!(zero_op.is_err());

        let huge_multiplier = DepositParams::builder()
            .amount(Money::from_major(10_000))
            .term(6, TermUnit::Months)
            .annual_rate_percent(dec!(8))
            .tax_rate_multiplier(Decimal::MAX)
            .start_date(date(1, 1, 2024))
            .build();
        assert!(matches!(huge_multiplier, Err(CalcError::InvalidConfiguration { .. })));
    }
}
