use rust_decimal::{Decimal, MathematicalOps};

use crate::calendar::CalendarDate;
use crate::config::{CreditParams, BALANCE_EPSILON, SAFETY_PERIODS};
use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::events::{EventStore, ScheduleEvent};
use crate::interest::{AccrualEngine, InterestCalculator};
use crate::schedule::view::CreditOutcome;
use crate::schedule::{CreditSummary, ScheduleRow};
use crate::types::{RowKind, Scheme};

/// Fixed annuity payment `r·P / (1 − (1+r)^−n)` with `r` the monthly rate,
/// rounded to cents once. Fails when `(1+r)^n` or the product leaves the
/// decimal range.
pub fn annuity_payment(principal: Money, annual_rate: Rate, months: u32) -> Result<Money> {
    if months == 0 {
        return Ok(principal);
    }

    let r = annual_rate.monthly_rate().as_decimal();
    if r.is_zero() {
        return Ok((principal / Decimal::from(months)).to_cents());
    }

    let compound = (Decimal::ONE + r)
        .checked_powi(i64::from(months))
        .ok_or_else(|| CalcError::overflow("annuity factor"))?;
    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Ok((principal / Decimal::from(months)).to_cents());
    }
    principal
        .as_decimal()
        .checked_mul(r)
        .and_then(|scaled| scaled.checked_mul(compound))
        .and_then(|scaled| scaled.checked_div(denominator))
        .map(|payment| Money::from_decimal(payment).to_cents())
        .ok_or_else(|| CalcError::overflow("annuity payment"))
}

/// Credit repayment simulation, one row per calendar month.
///
/// An engine runs exactly once; `run` consumes it so the interest carry
/// cannot survive into another calculation.
pub struct CreditEngine<C: InterestCalculator = AccrualEngine> {
    params: CreditParams,
    calculator: C,
    term_months: u32,
    /// interest above the annuity payment, owed in the next period
    rest: Money,
    events: EventStore,
}

impl CreditEngine<AccrualEngine> {
    pub fn new(params: CreditParams) -> Result<Self> {
        let calculator = AccrualEngine::new(params.day_count);
        Self::with_calculator(params, calculator)
    }
}

impl<C: InterestCalculator> CreditEngine<C> {
    pub fn with_calculator(params: CreditParams, calculator: C) -> Result<Self> {
        params.validate()?;
        let term_months = params.term_months()?;
        Ok(Self {
            params,
            calculator,
            term_months,
            rest: Money::ZERO,
            events: EventStore::new(),
        })
    }

    pub fn run(mut self) -> Result<CreditOutcome> {
        let principal = self.params.amount;
        let rate = self.params.rate();
        let n = self.term_months;
        let anchor_day = self.params.start_date.day();

        log::debug!(
            "credit schedule: {} over {} months at {} ({:?}) from {}",
            principal,
            n,
            rate,
            self.params.scheme,
            self.params.start_date
        );

        let payment = match self.params.scheme {
            Scheme::First => annuity_payment(principal, rate, n)?,
            Scheme::Second => Money::ZERO,
        };
        let fixed_principal = (principal / Decimal::from(n)).to_cents();

        let mut rows = Vec::new();
        let mut balance = principal;
        let mut date = self.params.start_date;
        let mut period = 0u32;

        while !balance.is_zero() {
            period += 1;
            let next = date.add_month_clamped(anchor_day);
            let accrued = self
                .calculator
                .interest(balance, rate, date, next)?
                .to_cents()
                .checked_add(std::mem::replace(&mut self.rest, Money::ZERO))
                .ok_or_else(|| CalcError::overflow("deferred interest"))?;

            let (interest, principal_part) = match self.params.scheme {
                Scheme::First => self.annuity_period(accrued, payment, balance, period),
                Scheme::Second => {
                    let part = if period >= n || fixed_principal > balance {
                        balance
                    } else {
                        fixed_principal
                    };
                    (accrued, part)
                }
            };

            balance -= principal_part;
            balance = self.safety_valve(balance, principal, period, next);

            log::trace!(
                "period {} {}: interest {} principal {} balance {}",
                period,
                next,
                interest,
                principal_part,
                balance
            );

            let total = interest
                .checked_add(principal_part)
                .ok_or_else(|| CalcError::overflow("period total"))?;
            rows.push(ScheduleRow {
                number: period,
                date: next,
                interest,
                principal: principal_part,
                total,
                balance,
                kind: RowKind::Payment,
            });
            date = next;
        }

        let summary = CreditSummary::from_rows(&rows)?;
        log::debug!(
            "credit schedule finished after {} periods, total interest {}",
            rows.len(),
            summary.total_interest
        );

        Ok(CreditOutcome {
            rows,
            summary,
            events: self.events.take_events(),
        })
    }

    /// Split one annuity period. Interest above the payment is deferred and
    /// the last scheduled period settles whatever is left.
    fn annuity_period(
        &mut self,
        accrued: Money,
        payment: Money,
        balance: Money,
        period: u32,
    ) -> (Money, Money) {
        let mut interest = accrued;
        if interest > payment {
            self.rest = interest - payment;
            interest = payment;
        }

        let mut principal_part = payment - interest;
        if principal_part > balance || (period >= self.term_months && self.rest.is_zero()) {
            principal_part = balance;
        }
        (interest, principal_part)
    }

    /// Force a degenerate or fully decayed balance to zero.
    fn safety_valve(
        &mut self,
        balance: Money,
        principal: Money,
        period: u32,
        date: CalendarDate,
    ) -> Money {
        let stuck = period > SAFETY_PERIODS
            && (balance == principal || period > SAFETY_PERIODS + self.term_months);
        let decayed = balance.abs().as_decimal() < BALANCE_EPSILON;
        if balance.is_zero() || !(stuck || decayed) {
            return balance;
        }

        if stuck {
            log::warn!(
                "credit schedule did not converge after {} periods, writing off {}",
                period,
                balance
            );
        } else {
            log::debug!("writing off residual credit balance {}", balance);
        }
        self.events.emit(ScheduleEvent::SafetyValveTriggered {
            period,
            date,
            written_off: balance,
        });
        Money::ZERO
    }
}
