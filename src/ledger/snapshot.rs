use rust_decimal::Decimal;
use std::sync::OnceLock;

use super::record::{ExpenseRecord, RecordId};
use crate::core::summary::{SpendingSummary, SummaryService};

/// Immutable view of the ledger at one revision.
///
/// Every mutation of [`ExpenseLedger`](super::ExpenseLedger) produces a new
/// snapshot, so the summary cached here can never go stale.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    revision: u64,
    records: Vec<ExpenseRecord>,
    budget: Decimal,
    summary: OnceLock<SpendingSummary>,
}

impl LedgerSnapshot {
    pub fn new(records: Vec<ExpenseRecord>, budget: Decimal) -> Self {
        Self::at_revision(0, records, budget)
    }

    pub(crate) fn at_revision(revision: u64, records: Vec<ExpenseRecord>, budget: Decimal) -> Self {
        Self {
            revision,
            records,
            budget,
            summary: OnceLock::new(),
        }
    }

    /// Records in insertion order, oldest first.
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn record(&self, id: &RecordId) -> Option<&ExpenseRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Aggregate figures for this snapshot, computed on first access.
    pub fn summary(&self) -> &SpendingSummary {
        self.summary.get_or_init(|| SummaryService::summarize(self))
    }
}

impl PartialEq for LedgerSnapshot {
    /// Snapshots are equal when they hold the same records and budget, whatever their revision.
    fn eq(&self, other: &Self) -> bool {
        self.budget == other.budget && self.records == other.records
    }
}
