//! owned results of a schedule run and their display / json forms
use serde::{Deserialize, Serialize};

use crate::events::ScheduleEvent;
use crate::schedule::{CreditSummary, DepositSummary, ScheduleRow, TaxRow};

/// result of a credit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditOutcome {
    pub rows: Vec<ScheduleRow>,
    pub summary: CreditSummary,
    pub events: Vec<ScheduleEvent>,
}

impl CreditOutcome {
    pub fn table(&self) -> TableView {
        TableView {
            columns: SCHEDULE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: self.rows.iter().map(|r| r.formatted().to_vec()).collect(),
            summary: self.summary.labeled(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// result of a deposit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositOutcome {
    pub rows: Vec<ScheduleRow>,
    pub tax_rows: Vec<TaxRow>,
    pub summary: DepositSummary,
    pub events: Vec<ScheduleEvent>,
}

impl DepositOutcome {
    pub fn table(&self) -> TableView {
        TableView {
            columns: SCHEDULE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: self.rows.iter().map(|r| r.formatted().to_vec()).collect(),
            summary: self.summary.labeled(),
        }
    }

    pub fn tax_table(&self) -> TableView {
        TableView {
            columns: TAX_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: self.tax_rows.iter().map(|r| r.formatted().to_vec()).collect(),
            summary: vec![("Tax".to_string(), self.summary.total_tax.to_fixed(2))],
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub const SCHEDULE_COLUMNS: [&str; 5] = ["Date", "Interest", "Principal", "Total", "Balance"];
pub const TAX_COLUMNS: [&str; 5] = ["Year", "Income", "Threshold", "Taxable", "Tax"];

/// string table ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub summary: Vec<(String, String)>,
}

impl TableView {
    /// widest cell per column, headers included
    pub fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.len())
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// right-aligned plain text rendering
    pub fn render(&self) -> String {
        let widths = self.widths();
        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ")
        };

        let mut out = Vec::with_capacity(self.rows.len() + self.summary.len() + 2);
        out.push(line(&self.columns));
        out.extend(self.rows.iter().map(|row| line(row)));
        if !self.summary.is_empty() {
            out.push(String::new());
            out.extend(self.summary.iter().map(|(label, value)| format!("{}: {}", label, value)));
        }
        out.join("\n")
    }
}
