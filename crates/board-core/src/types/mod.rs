//! Core domain types

pub mod post;

pub use post::*;

use serde::{Deserialize, Serialize};

/// Number of posts kept once the eviction sweep has run
pub const POST_LIMIT: usize = 100;

/// Fixed key of the singleton sequence record
pub const SEQ_KEY: &str = "seq";

/// Sequence counter: id of the most recently allocated post, 0 when none
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub seq: u64,
}

/// Everything that can live in the shared record namespace, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Post(Post),
    Seq(SequenceRecord),
}

impl Record {
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Post(_) => "post",
            Record::Seq(_) => "seq",
        }
    }

    pub fn into_post(self) -> Option<Post> {
        match self {
            Record::Post(post) => Some(post),
            Record::Seq(_) => None,
        }
    }
}

impl From<Post> for Record {
    fn from(post: Post) -> Self {
        Record::Post(post)
    }
}

impl From<SequenceRecord> for Record {
    fn from(seq: SequenceRecord) -> Self {
        Record::Seq(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_carries_type_tag() {
        let post = Record::Post(Post {
            id: 7,
            text: "hello".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&post).unwrap(),
            json!({"type": "post", "id": 7, "text": "hello"})
        );

        let seq = Record::Seq(SequenceRecord { seq: 7 });
        assert_eq!(
            serde_json::to_value(&seq).unwrap(),
            json!({"type": "seq", "seq": 7})
        );
    }

    #[test]
    fn test_record_parses_stored_json() {
        let record: Record = serde_json::from_str(r#"{"type":"seq","seq":42}"#).unwrap();
        assert_eq!(record, Record::Seq(SequenceRecord { seq: 42 }));
        assert_eq!(record.kind(), "seq");
        assert!(record.into_post().is_none());
    }
}
