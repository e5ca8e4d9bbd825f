use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::decimal::Money;
use crate::types::OperationKind;

/// notable things that happened while a schedule was simulated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScheduleEvent {
    // deposit events
    OperationApplied {
        date: CalendarDate,
        kind: OperationKind,
        amount: Money,
        new_balance: Money,
    },
    OperationRejected {
        date: CalendarDate,
        kind: OperationKind,
        amount: Money,
        reason: String,
    },
    TaxYearClosed {
        year: u32,
        income: Money,
        tax: Money,
    },

    // credit events
    SafetyValveTriggered {
        period: u32,
        date: CalendarDate,
        written_off: Money,
    },
}

/// event store for collecting events during a run
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<ScheduleEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: ScheduleEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<ScheduleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
