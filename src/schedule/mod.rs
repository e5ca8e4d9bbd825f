//! Period-by-period credit and deposit simulations.
//!
//! Both engines share nothing but the [`InterestCalculator`](crate::interest::InterestCalculator)
//! they are given and the row types below.

pub mod credit;
pub mod deposit;
pub mod tax;
pub mod view;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::decimal::Money;
use crate::errors::{CalcError, Result};
use crate::types::RowKind;

pub use credit::{annuity_payment, CreditEngine};
pub use deposit::DepositEngine;
pub use tax::{tax_on, TaxLedger};
pub use view::{CreditOutcome, DepositOutcome, TableView};

/// one line of a credit or deposit schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub number: u32,
    pub date: CalendarDate,
    pub interest: Money,
    pub principal: Money,
    pub total: Money,
    /// balance after the row is applied
    pub balance: Money,
    pub kind: RowKind,
}

impl ScheduleRow {
    /// date, interest, principal, total and balance as display strings
    pub fn formatted(&self) -> [String; 5] {
        [
            self.date.to_string(),
            self.interest.to_fixed(2),
            self.principal.to_fixed(2),
            self.total.to_fixed(2),
            self.balance.to_fixed(2),
        ]
    }
}

/// income and tax for one calendar year of a deposit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRow {
    pub year: u32,
    pub income: Money,
    pub threshold: Money,
    pub taxable: Money,
    pub tax: Money,
}

impl TaxRow {
    pub fn formatted(&self) -> [String; 5] {
        [
            self.year.to_string(),
            self.income.to_fixed(2),
            self.threshold.to_fixed(2),
            self.taxable.to_fixed(2),
            self.tax.to_fixed(2),
        ]
    }
}

/// credit totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSummary {
    /// total of the first period
    pub payment: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_paid: Money,
}

impl CreditSummary {
    pub fn from_rows(rows: &[ScheduleRow]) -> Result<Self> {
        let total = |field: fn(&ScheduleRow) -> Money, what: &str| {
            Money::checked_sum(rows.iter().map(field)).ok_or_else(|| CalcError::overflow(what))
        };
        Ok(Self {
            payment: rows.first().map(|r| r.total).unwrap_or(Money::ZERO),
            total_interest: total(|r| r.interest, "total interest")?,
            total_principal: total(|r| r.principal, "total principal")?,
            total_paid: total(|r| r.total, "total paid")?,
        })
    }

    pub fn labeled(&self) -> Vec<(String, String)> {
        vec![
            ("Monthly payment".to_string(), self.payment.to_fixed(2)),
            ("Total interest".to_string(), self.total_interest.to_fixed(2)),
            ("Total principal".to_string(), self.total_principal.to_fixed(2)),
            ("Total paid".to_string(), self.total_paid.to_fixed(2)),
        ]
    }
}

/// deposit totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositSummary {
    pub total_interest: Money,
    pub total_tax: Money,
    pub total_refills: Money,
    pub total_withdrawals: Money,
    pub final_balance: Money,
    /// balance plus interest paid out, before tax
    pub total_payout: Money,
    /// interest net of tax
    pub profit: Money,
    /// annualized percent over `days`
    pub effective_rate: Decimal,
    pub days: u32,
}

impl DepositSummary {
    pub fn labeled(&self) -> Vec<(String, String)> {
        vec![
            ("Accrued interest".to_string(), self.total_interest.to_fixed(2)),
            ("Tax".to_string(), self.total_tax.to_fixed(2)),
            ("Refills".to_string(), self.total_refills.to_fixed(2)),
            ("Withdrawals".to_string(), self.total_withdrawals.to_fixed(2)),
            ("Final balance".to_string(), self.final_balance.to_fixed(2)),
            ("Total payout".to_string(), self.total_payout.to_fixed(2)),
            ("Profit".to_string(), self.profit.to_fixed(2)),
            ("Effective rate, %".to_string(), Money::from_decimal(self.effective_rate).to_fixed(2)),
            ("Days".to_string(), self.days.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_formatting() {
        let row = ScheduleRow {
            number: 1,
            date: CalendarDate::new(1, 8, 2023).unwrap(),
            interest: Money::from_str_exact("4.25").unwrap(),
            principal: Money::from_str_exact("248.36").unwrap(),
            total: Money::from_str_exact("252.61").unwrap(),
            balance: Money::from_str_exact("751.64").unwrap(),
            kind: RowKind::Payment,
        };
        assert_eq!(row.formatted(), ["01.08.2023", "4.25", "248.36", "252.61", "751.64"]);
    }

    #[test]
    fn test_credit_summary_from_rows() {
        let row = |interest: &str, principal: &str| {
            let interest = Money::from_str_exact(interest).unwrap();
            let principal = Money::from_str_exact(principal).unwrap();
            ScheduleRow {
                number: 0,
                date: CalendarDate::new(1, 1, 2024).unwrap(),
                interest,
                principal,
                total: interest + principal,
                balance: Money::ZERO,
                kind: RowKind::Payment,
            }
        };
        let summary = CreditSummary::from_rows(&[row("10", "90"), row("5", "95")]).unwrap();
        assert_eq!(summary.payment, Money::from_major(100));
        assert_eq!(summary.total_interest, Money::from_major(15));
        assert_eq!(summary.total_paid, Money::from_major(200));
        assert_eq!(summary.labeled()[3], ("Total paid".to_string(), "200.00".to_string()));

        assert_eq!(CreditSummary::from_rows(&[]).unwrap().payment, Money::ZERO);
    }

    #[test]
    fn test_credit_summary_overflow() {
        let huge = Money::from_decimal(Decimal::MAX);
        let row = ScheduleRow {
            number: 1,
            date: CalendarDate::new(1, 1, 2024).unwrap(),
            interest: huge,
            principal: Money::ZERO,
            total: huge,
            balance: Money::ZERO,
            kind: RowKind::Payment,
        };
        let result = CreditSummary::from_rows(&[row.clone(), row]);
        assert!(matches!(result, Err(CalcError::InvalidConfiguration { .. })));
    }
}
