use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::{
    amount::parse_amount,
    clock::{Clock, IdGenerator, SystemClock, UuidIdGenerator},
    record::{ExpenseRecord, RecordId},
    snapshot::LedgerSnapshot,
};
use crate::{
    config::TrackerConfig,
    storage::{persistence::DecodeDefaults, KeyValueStore, PersistenceAdapter},
};

/// Configures and opens an [`ExpenseLedger`].
pub struct LedgerBuilder {
    store: Box<dyn KeyValueStore>,
    storage_key: String,
    default_budget: Decimal,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl LedgerBuilder {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            storage_key: TrackerConfig::default_storage_key(),
            default_budget: TrackerConfig::default_budget_value(),
            clock: Box::new(SystemClock),
            ids: Box::new(UuidIdGenerator),
        }
    }

    pub fn from_config(config: &TrackerConfig, store: Box<dyn KeyValueStore>) -> Self {
        Self::new(store)
            .storage_key(config.storage_key.clone())
            .default_budget(config.default_budget)
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Budget for a fresh ledger and the value `reset` restores. Negative values clamp to zero.
    pub fn default_budget(mut self, budget: Decimal) -> Self {
        self.default_budget = budget.max(Decimal::ZERO);
        self
    }

    pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Rehydrates from the store, falling back to defaults when nothing usable is stored.
    pub fn open(self) -> ExpenseLedger {
        let persistence = PersistenceAdapter::new(self.store, self.storage_key);
        let restored = persistence.load(&DecodeDefaults {
            budget: self.default_budget,
            today: self.clock.today(),
            ids: self.ids.as_ref(),
        });
        let (records, budget) = match restored {
            Some(state) => (state.records, state.budget),
            None => (Vec::new(), self.default_budget),
        };
        ExpenseLedger {
            current: Arc::new(LedgerSnapshot::at_revision(0, records, budget)),
            default_budget: self.default_budget,
            persistence,
            clock: self.clock,
            ids: self.ids,
        }
    }
}

/// Owns the expense records and budget ceiling.
///
/// Every intent replaces the current [`LedgerSnapshot`] with a new one and
/// writes it through the [`PersistenceAdapter`]. Intents never fail:
/// malformed amounts become zero and storage errors are only logged.
pub struct ExpenseLedger {
    current: Arc<LedgerSnapshot>,
    default_budget: Decimal,
    persistence: PersistenceAdapter,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl ExpenseLedger {
    pub fn builder(store: Box<dyn KeyValueStore>) -> LedgerBuilder {
        LedgerBuilder::new(store)
    }

    /// Appends a record. `date` defaults to today.
    pub fn add(
        &mut self,
        description: impl Into<String>,
        amount: &str,
        category: impl Into<String>,
        date: Option<NaiveDate>,
    ) -> RecordId {
        let id = self.ids.next_id();
        let record = ExpenseRecord::new(
            id.clone(),
            description,
            parse_amount(amount),
            category,
            date.unwrap_or_else(|| self.clock.today()),
        );
        tracing::debug!(
            id = %record.id,
            amount = %record.amount,
            category = %record.category,
            "adding expense"
        );
        self.commit(|records, _| records.push(record));
        id
    }

    /// Deletes the record with `id`; unknown ids are ignored.
    pub fn remove(&mut self, id: &RecordId) {
        let present = self.current.record(id).is_some();
        tracing::debug!(%id, present, "removing expense");
        self.commit(|records, _| records.retain(|record| &record.id != id));
    }

    pub fn set_budget(&mut self, amount: &str) {
        let budget = parse_amount(amount);
        tracing::debug!(%budget, "setting budget");
        self.commit(|_, current| *current = budget);
    }

    /// Drops every record and keeps the budget. Callers confirm with the user first.
    pub fn clear_records(&mut self) {
        tracing::debug!(cleared = self.current.len(), "clearing expenses");
        self.commit(|records, _| records.clear());
    }

    /// Restores an empty ledger with the default budget. Callers confirm with the user first.
    pub fn reset(&mut self) {
        let default_budget = self.default_budget;
        tracing::debug!(%default_budget, "resetting ledger");
        self.commit(|records, budget| {
            records.clear();
            *budget = default_budget;
        });
    }

    pub fn snapshot(&self) -> Arc<LedgerSnapshot> {
        Arc::clone(&self.current)
    }

    pub fn record(&self, id: &RecordId) -> Option<&ExpenseRecord> {
        self.current.record(id)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.current.revision()
    }

    pub fn default_budget(&self) -> Decimal {
        self.default_budget
    }

    /// Whether the latest state reached durable storage.
    pub fn is_durable(&self) -> bool {
        self.persistence.is_durable()
    }

    fn commit(&mut self, apply: impl FnOnce(&mut Vec<ExpenseRecord>, &mut Decimal)) {
        let mut records = self.current.records().to_vec();
        let mut budget = self.current.budget();
        apply(&mut records, &mut budget);
        let next = LedgerSnapshot::at_revision(self.current.revision() + 1, records, budget);
        self.current = Arc::new(next);
        self.persistence.save(&self.current);
    }
}
