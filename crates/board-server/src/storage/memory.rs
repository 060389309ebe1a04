//! In-memory record store using DashMap

use async_trait::async_trait;
use board_core::{Query, Record, RecordStore, Result, StoredRecord};
use dashmap::DashMap;
use std::sync::Arc;

/// Process-local record store. Contents are lost on restart.
#[derive(Clone)]
pub struct MemoryStore {
    data: Arc<DashMap<String, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Record>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn query(&self, query: &Query) -> Result<Vec<StoredRecord>> {
        let mut matched = Vec::new();

        for entry in self.data.iter() {
            if let Some(limit) = query.limit {
                if matched.len() >= limit {
                    break;
                }
            }

            if query.matches(entry.value())? {
                matched.push(StoredRecord {
                    key: entry.key().clone(),
                    record: entry.value().clone(),
                });
            }
        }

        Ok(matched)
    }

    async fn insert(&self, record: &Record) -> Result<String> {
        let key = uuid::Uuid::new_v4().simple().to_string();
        self.data.insert(key.clone(), record.clone());
        Ok(key)
    }

    async fn put(&self, key: &str, record: &Record) -> Result<()> {
        self.data.insert(key.to_string(), record.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::{Filter, Post, SequenceRecord, SEQ_KEY};

    #[tokio::test]
    async fn test_basic_operations() {
        let store = MemoryStore::new();

        // Test put and get
        let seq = Record::Seq(SequenceRecord { seq: 3 });
        store.put(SEQ_KEY, &seq).await.unwrap();
        assert_eq!(store.get(SEQ_KEY).await.unwrap(), Some(seq));

        // Test non-existent key
        assert_eq!(store.get("nonexistent").await.unwrap(), None);

        // Test delete
        store.delete(SEQ_KEY).await.unwrap();
        assert_eq!(store.get(SEQ_KEY).await.unwrap(), None);

        // Deleting again is not an error
        store.delete(SEQ_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_generates_distinct_keys() {
        let store = MemoryStore::new();
        let record = Record::Post(Post::new(1, "same"));

        let first = store.insert(&record).await.unwrap();
        let second = store.insert(&record).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_query_filters_and_limit() {
        let store = MemoryStore::new();
        store
            .put(SEQ_KEY, &Record::Seq(SequenceRecord { seq: 5 }))
            .await
            .unwrap();
        for id in 1..=5 {
            store
                .insert(&Record::Post(Post::new(id, format!("post {}", id))))
                .await
                .unwrap();
        }

        let posts = Query::new().filter(Filter::eq("type", "post"));
        assert_eq!(store.query(&posts).await.unwrap().len(), 5);

        let stale = posts.clone().filter(Filter::lte("id", 2));
        let mut ids: Vec<u64> = store
            .query(&stale)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|r| r.record.into_post())
            .map(|p| p.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);

        assert_eq!(store.query(&posts.limit(3)).await.unwrap().len(), 3);
    }
}
