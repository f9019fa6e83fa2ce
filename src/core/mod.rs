//! Derived figures computed from ledger snapshots.

pub mod summary;

pub use summary::{BudgetHealth, CategoryTotal, SpendingSummary, SummaryService};
