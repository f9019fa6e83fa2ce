#![doc(test(attr(deny(warnings))))]

//! Expense Core keeps a running expense ledger against a budget ceiling,
//! derives spending figures from immutable snapshots of it, and persists the
//! ledger to a key-value store between sessions.
//!
//! ```
//! use expense_core::{ledger::ExpenseLedger, core::summary::SummaryService, storage::MemoryStore};
//! use rust_decimal::Decimal;
//!
//! let mut ledger = ExpenseLedger::builder(Box::new(MemoryStore::new())).open();
//! ledger.add("Bus fare", "1500", "Transport", None);
//!
//! let snapshot = ledger.snapshot();
//! assert_eq!(SummaryService::total_spent(&snapshot), Decimal::from(1500));
//! assert_eq!(SummaryService::remaining_budget(&snapshot), Decimal::from(498_500));
//! ```

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
