//! Storage traits for persistence
//!
//! Posts and the sequence counter live in one key-addressed namespace.
//! Backends only need get/put/insert/delete by key plus a filtered scan;
//! no cross-record transactions are assumed.

use crate::types::Record;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;

/// A record together with the key it is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub key: String,
    pub record: Record,
}

/// Key-addressed record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Record>>;
    async fn query(&self, query: &Query) -> Result<Vec<StoredRecord>>;
    /// Store under a freshly generated key and return that key.
    async fn insert(&self, record: &Record) -> Result<String>;
    async fn put(&self, key: &str, record: &Record) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Comparison applied by a [`Filter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lte,
}

impl FilterOp {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Lte => ordering != Ordering::Greater,
        }
    }

    /// SQL operator for backends that push filters down.
    pub fn as_sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// A single `field <op> value` condition on a record's top-level field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: FieldValue,
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.to_string(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn lte(field: &str, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.to_string(),
            op: FilterOp::Lte,
            value: value.into(),
        }
    }

    /// Evaluate against the JSON form of a record. A missing field or a
    /// value of a different kind never matches.
    pub fn matches(&self, record: &Value) -> bool {
        let Some(actual) = record.get(&self.field) else {
            return false;
        };

        match &self.value {
            FieldValue::Int(expected) => actual
                .as_i64()
                .map(|a| self.op.accepts(a.cmp(expected)))
                .unwrap_or(false),
            FieldValue::Text(expected) => actual
                .as_str()
                .map(|a| self.op.accepts(a.cmp(expected.as_str())))
                .unwrap_or(false),
        }
    }
}

/// Conjunction of filters with an optional result cap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, record: &Record) -> Result<bool> {
        let value = serde_json::to_value(record)?;
        Ok(self.filters.iter().all(|f| f.matches(&value)))
    }
}
