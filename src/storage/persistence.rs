use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::{
    errors::StorageError,
    ledger::{amount, clock::IdGenerator, ExpenseRecord, LedgerSnapshot, RecordId},
};

use super::{KeyValueStore, Result};

const RECORDS_FIELD: &str = "records";
const LEGACY_RECORDS_FIELD: &str = "expenses";
const BUDGET_FIELD: &str = "totalBudget";
const LEGACY_STATE_FIELD: &str = "state";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The durable subset of ledger state: records and budget, never derived figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedLedger {
    pub records: Vec<ExpenseRecord>,
    #[serde(rename = "totalBudget", with = "amount::json_number")]
    pub budget: Decimal,
}

#[derive(Serialize)]
struct PersistedLedgerRef<'a> {
    records: &'a [ExpenseRecord],
    #[serde(rename = "totalBudget", with = "amount::json_number")]
    budget: Decimal,
}

/// Inputs needed to fill gaps while decoding a stored blob.
pub struct DecodeDefaults<'a> {
    pub budget: Decimal,
    pub today: NaiveDate,
    pub ids: &'a dyn IdGenerator,
}

impl PersistedLedger {
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Self {
        Self {
            records: snapshot.records().to_vec(),
            budget: snapshot.budget(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_parts(&self.records, self.budget)
    }

    /// Decodes a stored blob field by field.
    ///
    /// Only a blob that is not a JSON object is rejected. Missing or malformed
    /// fields take their defaults, unknown fields are ignored, and records that
    /// lack a usable or unique id receive a fresh one. Legacy blobs that wrap
    /// the fields in a `{"state": {..}, "version": N}` envelope are unwrapped.
    pub fn decode(bytes: &[u8], defaults: &DecodeDefaults<'_>) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        let Value::Object(mut fields) = value else {
            return Err(StorageError::Serde(serde::de::Error::custom(
                "persisted ledger is not a JSON object",
            )));
        };
        if !fields.contains_key(RECORDS_FIELD) && !fields.contains_key(BUDGET_FIELD) {
            if let Some(Value::Object(state)) = fields.remove(LEGACY_STATE_FIELD) {
                tracing::debug!("unwrapping legacy state envelope");
                fields = state;
            }
        }

        let budget = fields
            .get(BUDGET_FIELD)
            .and_then(decode_amount)
            .unwrap_or(defaults.budget);

        let records = match fields
            .get(RECORDS_FIELD)
            .or_else(|| fields.get(LEGACY_RECORDS_FIELD))
        {
            Some(Value::Array(items)) => decode_records(items, defaults),
            Some(other) => {
                tracing::warn!(kind = value_kind(other), "persisted records are not a list; starting empty");
                Vec::new()
            }
            None => Vec::new(),
        };

        Ok(Self { records, budget })
    }
}

fn encode_parts(records: &[ExpenseRecord], budget: Decimal) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&PersistedLedgerRef { records, budget })?)
}

fn decode_records(items: &[Value], defaults: &DecodeDefaults<'_>) -> Vec<ExpenseRecord> {
    let mut seen: HashSet<RecordId> = HashSet::new();
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            tracing::warn!(index, "dropping persisted record that is not an object");
            continue;
        };
        let mut record = decode_record(fields, defaults);
        if !seen.insert(record.id.clone()) {
            tracing::warn!(index, id = %record.id, "duplicate record id; assigning a fresh one");
            record.id = defaults.ids.next_id();
            seen.insert(record.id.clone());
        }
        records.push(record);
    }
    records
}

fn decode_record(fields: &Map<String, Value>, defaults: &DecodeDefaults<'_>) -> ExpenseRecord {
    let id = match fields.get("id") {
        Some(Value::String(raw)) if !raw.trim().is_empty() => RecordId::new(raw.as_str()),
        Some(Value::Number(raw)) => RecordId::new(raw.to_string()),
        _ => defaults.ids.next_id(),
    };
    let amount = fields
        .get("amount")
        .and_then(decode_amount)
        .unwrap_or(Decimal::ZERO);
    let date = fields
        .get("date")
        .and_then(Value::as_str)
        .and_then(decode_date)
        .unwrap_or(defaults.today);
    ExpenseRecord::new(
        id,
        text_field(fields, "description"),
        amount,
        text_field(fields, "category"),
        date,
    )
}

fn decode_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => Some(amount::parse_amount(&number.to_string())),
        Value::String(raw) => Some(amount::parse_amount(raw)),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD`, or an ISO timestamp whose first ten characters are one.
fn decode_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| raw.get(..10).and_then(|head| NaiveDate::parse_from_str(head, DATE_FORMAT).ok()))
}

fn text_field(fields: &Map<String, Value>, name: &str) -> String {
    match fields.get(name) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Saves and restores ledger state under one fixed key of a [`KeyValueStore`].
///
/// Writes are best-effort: a failure is logged and remembered, never returned
/// to the ledger.
pub struct PersistenceAdapter {
    store: Box<dyn KeyValueStore>,
    key: String,
    durable: bool,
}

impl PersistenceAdapter {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            durable: true,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the most recent write reached the store.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Reads and decodes the stored blob, surfacing every failure.
    pub fn try_load(&self, defaults: &DecodeDefaults<'_>) -> Result<Option<PersistedLedger>> {
        match self.store.get(&self.key)? {
            Some(bytes) => PersistedLedger::decode(&bytes, defaults).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`try_load`](Self::try_load), but failures are logged and read as "nothing stored".
    pub fn load(&self, defaults: &DecodeDefaults<'_>) -> Option<PersistedLedger> {
        match self.try_load(defaults) {
            Ok(Some(state)) => {
                tracing::info!(
                    key = %self.key,
                    records = state.records.len(),
                    "restored persisted ledger"
                );
                Some(state)
            }
            Ok(None) => {
                tracing::debug!(key = %self.key, "no persisted ledger found");
                None
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "ignoring unreadable persisted ledger");
                None
            }
        }
    }

    /// Writes the snapshot's records and budget. Returns whether the write succeeded.
    pub fn save(&mut self, snapshot: &LedgerSnapshot) -> bool {
        let outcome = encode_parts(snapshot.records(), snapshot.budget())
            .and_then(|bytes| self.store.set(&self.key, &bytes));
        self.durable = match outcome {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    revision = snapshot.revision(),
                    error = %err,
                    "failed to persist ledger; in-memory state kept"
                );
                false
            }
        };
        self.durable
    }
}
