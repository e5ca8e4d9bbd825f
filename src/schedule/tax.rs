use crate::calendar::CalendarDate;
use crate::config::TAX_RATE;
use crate::decimal::Money;
use crate::errors::{CalcError, Result};
use crate::events::{EventStore, ScheduleEvent};
use crate::interest::allocate;
use crate::schedule::TaxRow;

/// Tax due on one year's income, rounded to whole units.
pub fn tax_on(income: Money, threshold: Money) -> Money {
    let taxable = income - threshold;
    if taxable.is_positive() {
        (taxable * TAX_RATE).to_units()
    } else {
        Money::ZERO
    }
}

/// Running per-calendar-year deposit income.
#[derive(Debug)]
pub struct TaxLedger {
    threshold: Money,
    open: Option<(u32, Money)>,
    rows: Vec<TaxRow>,
}

impl TaxLedger {
    pub fn new(threshold: Money) -> Self {
        Self {
            threshold,
            open: None,
            rows: Vec::new(),
        }
    }

    /// Book interest earned over `[start, end)`, spread over the calendar
    /// years it accrued in by day count. Zero shares open no year.
    pub fn record_period(
        &mut self,
        start: CalendarDate,
        end: CalendarDate,
        interest: Money,
        events: &mut EventStore,
    ) -> Result<()> {
        let mut years = Vec::new();
        let mut weights = Vec::new();
        let mut cursor = start;
        while cursor < end {
            let year_end = cursor.start_of_next_year().min(end);
            years.push(cursor.year());
            weights.push(cursor.days_until(&year_end));
            cursor = year_end;
        }
        if years.is_empty() {
            years.push(end.year());
            weights.push(1);
        }

        for (year, share) in years.into_iter().zip(allocate(interest, &weights)?) {
            if !share.is_zero() {
                self.add(year, share, events)?;
            }
        }
        Ok(())
    }

    /// Add income to `year`, closing any earlier open year first.
    pub fn add(&mut self, year: u32, income: Money, events: &mut EventStore) -> Result<()> {
        match self.open.as_mut() {
            Some((open_year, total)) if *open_year >= year => {
                *total = total
                    .checked_add(income)
                    .ok_or_else(|| CalcError::overflow("yearly income"))?;
            }
            _ => {
                self.close(events);
                self.open = Some((year, income));
            }
        }
        Ok(())
    }

    /// Close every open year that ends on or before `date`.
    pub fn close_through(&mut self, date: CalendarDate, events: &mut EventStore) {
        if let Some((year, _)) = self.open {
            if date.year() > year {
                self.close(events);
            }
        }
    }

    /// Close the open year, if any, emitting its row.
    pub fn close(&mut self, events: &mut EventStore) {
        let Some((year, income)) = self.open.take() else {
            return;
        };
        let tax = tax_on(income, self.threshold);
        let taxable = (income - self.threshold).max(Money::ZERO);
        log::debug!("tax year {} closed: income {} tax {}", year, income, tax);

        events.emit(ScheduleEvent::TaxYearClosed { year, income, tax });
        self.rows.push(TaxRow {
            year,
            income,
            threshold: self.threshold,
            taxable,
            tax,
        });
    }

    pub fn rows(&self) -> &[TaxRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<TaxRow> {
        self.rows
    }
}
