//! Post types

use serde::{Deserialize, Serialize};

/// A single board entry. `text` is stored already sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub text: String,
}

impl Post {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}
