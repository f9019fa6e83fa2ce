//! Expense ledger state, its immutable snapshots, and the helpers that build records.

pub mod amount;
pub mod clock;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod record;
pub mod snapshot;

pub use amount::parse_amount;
pub use clock::{Clock, IdGenerator, SystemClock, UuidIdGenerator};
pub use ledger::{ExpenseLedger, LedgerBuilder};
pub use record::{ExpenseRecord, RecordId};
pub use snapshot::LedgerSnapshot;
