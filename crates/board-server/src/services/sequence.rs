//! Sequence allocator for post ids
//!
//! The counter is a plain read-then-write against the store. Two writers
//! racing between `reserve` and `commit` can hand out the same id and the
//! counter keeps whichever write lands last.

use board_core::{BoardError, Record, RecordStore, Result, SequenceRecord, SEQ_KEY};
use std::sync::Arc;
use tracing::{debug, info};

pub struct SequenceAllocator {
    store: Arc<dyn RecordStore>,
}

impl SequenceAllocator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Current counter value, creating the record at 0 if it is missing.
    pub async fn current(&self) -> Result<u64> {
        match self.store.get(SEQ_KEY).await? {
            Some(Record::Seq(record)) => Ok(record.seq),
            Some(other) => Err(BoardError::Serialization(format!(
                "key {} holds a {} record",
                SEQ_KEY,
                other.kind()
            ))),
            None => {
                info!("Creating sequence record");
                self.store
                    .put(SEQ_KEY, &Record::Seq(SequenceRecord::default()))
                    .await?;
                Ok(0)
            }
        }
    }

    /// Next id to hand out. Does not advance the counter.
    pub async fn reserve(&self) -> Result<u64> {
        Ok(self.current().await? + 1)
    }

    /// Record `id` as the most recently allocated id.
    pub async fn commit(&self, id: u64) -> Result<()> {
        debug!("Advancing sequence to {}", id);
        self.store
            .put(SEQ_KEY, &Record::Seq(SequenceRecord { seq: id }))
            .await
    }

    /// Allocate and commit in one step. `PostStore` calls `reserve` and
    /// `commit` separately so the post is written before the counter moves.
    #[allow(dead_code)]
    pub async fn next_id(&self) -> Result<u64> {
        let id = self.reserve().await?;
        self.commit(id).await?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use board_core::Post;
    use tokio_test::assert_err;

    #[tokio::test]
    async fn test_first_call_creates_counter() {
        let store = Arc::new(MemoryStore::new());
        let allocator = SequenceAllocator::new(store.clone());

        assert_eq!(allocator.next_id().await.unwrap(), 1);
        assert_eq!(
            store.get(SEQ_KEY).await.unwrap(),
            Some(Record::Seq(SequenceRecord { seq: 1 }))
        );
    }

    #[tokio::test]
    async fn test_ids_increase_by_one() {
        let allocator = SequenceAllocator::new(Arc::new(MemoryStore::new()));

        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(allocator.next_id().await.unwrap());
        }
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_reserve_without_commit_does_not_advance() {
        let store = Arc::new(MemoryStore::new());
        let allocator = SequenceAllocator::new(store.clone());

        assert_eq!(allocator.reserve().await.unwrap(), 1);
        assert_eq!(allocator.reserve().await.unwrap(), 1);
        assert_eq!(
            store.get(SEQ_KEY).await.unwrap(),
            Some(Record::Seq(SequenceRecord { seq: 0 }))
        );

        allocator.commit(1).await.unwrap();
        assert_eq!(allocator.reserve().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_resumes_from_stored_value() {
        let store = Arc::new(MemoryStore::new());
        store
            .put(SEQ_KEY, &Record::Seq(SequenceRecord { seq: 41 }))
            .await
            .unwrap();

        let allocator = SequenceAllocator::new(store);
        assert_eq!(allocator.next_id().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_foreign_record_under_counter_key_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store
            .put(SEQ_KEY, &Record::Post(Post::new(1, "squatter")))
            .await
            .unwrap();

        let allocator = SequenceAllocator::new(store);
        assert_err!(allocator.next_id().await);
    }
}
