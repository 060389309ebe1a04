//! Board Core Library
//!
//! Domain types, the record store port and the text rules shared by the
//! message board server and its storage backends.

pub mod error;
pub mod ports;
pub mod text;
pub mod types;

pub use error::{BoardError, Result};
pub use ports::{FieldValue, Filter, FilterOp, Query, RecordStore, StoredRecord};
pub use types::*;
