use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, never-reused identifier of an [`ExpenseRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A single spend entry. Records are immutable once created; an edit is a remove plus an add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseRecord {
    pub id: RecordId,
    pub description: String,
    #[serde(with = "crate::ledger::amount::json_number")]
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
}

impl ExpenseRecord {
    pub fn new(
        id: RecordId,
        description: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            amount,
            category: category.into(),
            date,
        }
    }

    /// Case-insensitive substring match against description or category.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.description.to_lowercase().contains(needle_lowercase)
            || self.category.to_lowercase().contains(needle_lowercase)
    }
}
