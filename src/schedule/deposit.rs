use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calendar::CalendarDate;
use crate::config::{DepositParams, Operation};
use crate::decimal::Money;
use crate::errors::{CalcError, Result};
use crate::events::{EventStore, ScheduleEvent};
use crate::interest::{AccrualEngine, InterestCalculator};
use crate::schedule::tax::TaxLedger;
use crate::schedule::view::DepositOutcome;
use crate::schedule::{DepositSummary, ScheduleRow};
use crate::types::{OperationKind, RowKind, Scheme};

/// Deposit simulation driven by the accrual frequency, interrupted by
/// client operations and closed off per calendar year for tax.
pub struct DepositEngine<C: InterestCalculator = AccrualEngine> {
    params: DepositParams,
    calculator: C,
    maturity: CalendarDate,
    events: EventStore,
}

impl DepositEngine<AccrualEngine> {
    pub fn new(params: DepositParams) -> Result<Self> {
        let calculator = AccrualEngine::new(params.day_count);
        Self::with_calculator(params, calculator)
    }
}

/// running sums kept while the loop advances
#[derive(Default)]
struct Totals {
    interest: Money,
    paid_out: Money,
    refills: Money,
    withdrawals: Money,
}

impl<C: InterestCalculator> DepositEngine<C> {
    pub fn with_calculator(params: DepositParams, calculator: C) -> Result<Self> {
        params.validate()?;
        let maturity = params.maturity_date();
        Ok(Self {
            params,
            calculator,
            maturity,
            events: EventStore::new(),
        })
    }

    pub fn maturity(&self) -> CalendarDate {
        self.maturity
    }

    pub fn run(mut self) -> Result<DepositOutcome> {
        let start = self.params.start_date;
        let maturity = self.maturity;
        let rate = self.params.rate();
        let anchor_day = start.day();

        log::debug!(
            "deposit schedule: {} from {} to {} at {} ({:?}, {:?})",
            self.params.amount,
            start,
            maturity,
            rate,
            self.params.scheme,
            self.params.frequency
        );

        let operations = self.accepted_operations();
        let mut pending_ops = operations.into_iter().peekable();
        let mut ledger = TaxLedger::new(self.params.non_taxable_threshold());
        let mut totals = Totals::default();
        let mut rows = Vec::new();
        let mut balance = self.params.amount;
        let mut cursor = start;

        while cursor < maturity {
            let boundary = self.params.frequency.next_boundary(cursor, anchor_day, maturity);

            // interest earned before each operation inside the period
            let mut operations_interest = Money::ZERO;
            let mut segment_start = cursor;
            while let Some(op) = pending_ops.next_if(|op| op.date < boundary) {
                if op.kind == OperationKind::Withdrawal && op.amount > balance {
                    self.reject(&op, format!("exceeds balance {}", balance));
                    continue;
                }

                let earned = self.calculator.interest(balance, rate, segment_start, op.date)?;
                operations_interest = checked(operations_interest.checked_add(earned), "period interest")?;
                balance = checked(balance.checked_add(op.signed_amount()), "balance")?;
                segment_start = op.date;

                let total = match op.kind {
                    OperationKind::Refill => &mut totals.refills,
                    OperationKind::Withdrawal => &mut totals.withdrawals,
                };
                *total = checked(total.checked_add(op.amount), "operation totals")?;
                self.events.emit(ScheduleEvent::OperationApplied {
                    date: op.date,
                    kind: op.kind,
                    amount: op.amount,
                    new_balance: balance,
                });
                rows.push(ScheduleRow {
                    number: rows.len() as u32 + 1,
                    date: op.date,
                    interest: Money::ZERO,
                    principal: op.signed_amount(),
                    total: op.signed_amount(),
                    balance,
                    kind: RowKind::from(op.kind),
                });
            }

            let earned = self.calculator.interest(balance, rate, segment_start, boundary)?;
            let interest = checked(earned.checked_add(operations_interest), "period interest")?.to_cents();
            let principal = match self.params.scheme {
                Scheme::First => {
                    totals.paid_out = checked(totals.paid_out.checked_add(interest), "interest paid out")?;
                    Money::ZERO
                }
                Scheme::Second => {
                    balance = checked(balance.checked_add(interest), "capitalized balance")?;
                    interest
                }
            };
            totals.interest = checked(totals.interest.checked_add(interest), "total interest")?;

            ledger.record_period(cursor, boundary, interest, &mut self.events)?;
            ledger.close_through(boundary, &mut self.events);

            log::trace!("accrual {}: interest {} balance {}", boundary, interest, balance);
            rows.push(ScheduleRow {
                number: rows.len() as u32 + 1,
                date: boundary,
                interest,
                principal,
                total: interest,
                balance,
                kind: RowKind::Accrual,
            });
            cursor = boundary;
        }
        ledger.close(&mut self.events);

        let tax_rows = ledger.into_rows();
        let total_tax = checked(Money::checked_sum(tax_rows.iter().map(|r| r.tax)), "total tax")?;
        let summary = self.summarize(&totals, balance, total_tax)?;
        log::debug!(
            "deposit schedule finished: {} rows, interest {}, tax {}",
            rows.len(),
            summary.total_interest,
            summary.total_tax
        );

        Ok(DepositOutcome {
            rows,
            tax_rows,
            summary,
            events: self.events.take_events(),
        })
    }

    /// Operations inside `[start, maturity)` in date order; the rest are rejected.
    fn accepted_operations(&mut self) -> Vec<Operation> {
        let mut operations = self.params.operations.clone();
        operations.sort_by_key(|op| op.date);

        let (start, maturity) = (self.params.start_date, self.maturity);
        let (inside, outside): (Vec<_>, Vec<_>) = operations
            .into_iter()
            .partition(|op| op.date >= start && op.date < maturity);
        for op in &outside {
            self.reject(op, format!("outside the term {} - {}", start, maturity));
        }
        inside
    }

    fn reject(&mut self, op: &Operation, reason: String) {
        log::warn!("{:?} of {} on {} rejected: {}", op.kind, op.amount, op.date, reason);
        self.events.emit(ScheduleEvent::OperationRejected {
            date: op.date,
            kind: op.kind,
            amount: op.amount,
            reason,
        });
    }

    fn summarize(&self, totals: &Totals, final_balance: Money, total_tax: Money) -> Result<DepositSummary> {
        let days = self.params.start_date.days_until(&self.maturity);
        let profit = totals.interest - total_tax;
        let effective_rate = effective_rate(profit, self.params.amount, days)?;
        let total_payout = checked(final_balance.checked_add(totals.paid_out), "total payout")?;

        Ok(DepositSummary {
            total_interest: totals.interest,
            total_tax,
            total_refills: totals.refills,
            total_withdrawals: totals.withdrawals,
            final_balance,
            total_payout,
            profit,
            effective_rate,
            days,
        })
    }
}

fn checked(amount: Option<Money>, what: &str) -> Result<Money> {
    amount.ok_or_else(|| CalcError::overflow(what))
}

/// Profit over `days` as an annual percentage of `amount`.
pub fn effective_rate(profit: Money, amount: Money, days: u32) -> Result<Decimal> {
    if days == 0 || amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    profit
        .as_decimal()
        .checked_div(amount.as_decimal())
        .and_then(|ratio| ratio.checked_mul(dec!(365)))
        .and_then(|ratio| ratio.checked_div(Decimal::from(days)))
        .and_then(|yearly| yearly.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp(2))
        .ok_or_else(|| CalcError::overflow("effective rate"))
}
