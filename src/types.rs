use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;

/// unit of a credit or deposit term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermUnit {
    Years,
    Months,
    Days,
}

impl TermUnit {
    /// term length in whole months, `None` for day terms
    pub fn to_months(&self, value: u32) -> Option<u32> {
        match self {
            TermUnit::Years => value.checked_mul(12),
            TermUnit::Months => Some(value),
            TermUnit::Days => None,
        }
    }
}

/// repayment or capitalization scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheme {
    /// credit: annuity. deposit: interest paid out
    First,
    /// credit: differentiated. deposit: interest capitalized
    Second,
}

/// cadence at which deposit interest is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccrualFrequency {
    Day,
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
    EndOfTerm,
}

impl AccrualFrequency {
    /// months per period for the calendar-stepped frequencies
    pub fn months(&self) -> Option<u32> {
        match self {
            AccrualFrequency::Month => Some(1),
            AccrualFrequency::Quarter => Some(3),
            AccrualFrequency::HalfYear => Some(6),
            AccrualFrequency::Year => Some(12),
            _ => None,
        }
    }

    /// Next settlement date after `current`, never past `maturity`.
    /// Month stepping clamps to `anchor_day` so a 31st start keeps landing on month ends.
    pub fn next_boundary(
        &self,
        current: CalendarDate,
        anchor_day: u32,
        maturity: CalendarDate,
    ) -> CalendarDate {
        let next = match self {
            AccrualFrequency::EndOfTerm => maturity,
            AccrualFrequency::Day => current.add_days(1),
            AccrualFrequency::Week => current.add_days(7),
            AccrualFrequency::Month
            | AccrualFrequency::Quarter
            | AccrualFrequency::HalfYear
            | AccrualFrequency::Year => {
                current.add_months_clamped(self.months().unwrap_or(1), anchor_day)
            }
        };
        next.min(maturity)
    }
}

/// client operation on a deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Refill,
    Withdrawal,
}

/// what produced a schedule row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    /// credit repayment
    Payment,
    /// deposit interest settlement
    Accrual,
    Refill,
    Withdrawal,
}

impl From<OperationKind> for RowKind {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Refill => RowKind::Refill,
            OperationKind::Withdrawal => RowKind::Withdrawal,
        }
    }
}
