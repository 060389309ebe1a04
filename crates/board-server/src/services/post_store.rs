//! Bounded post store
//!
//! Appends sanitized posts under fresh sequence ids and sweeps away
//! everything that falls out of the retention window.

use super::SequenceAllocator;
use board_core::{text, Filter, Post, Query, Record, RecordStore, Result, POST_LIMIT};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of one eviction sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionReport {
    pub removed: usize,
    pub failed: usize,
}

pub struct PostStore {
    store: Arc<dyn RecordStore>,
    sequence: SequenceAllocator,
    post_limit: usize,
}

impl PostStore {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_limit(store, POST_LIMIT)
    }

    pub fn with_limit(store: Arc<dyn RecordStore>, post_limit: usize) -> Self {
        Self {
            sequence: SequenceAllocator::new(store.clone()),
            store,
            post_limit,
        }
    }

    fn posts_query() -> Query {
        Query::new().filter(Filter::eq("type", "post"))
    }

    /// Newest posts first, at most `post_limit` of them.
    pub async fn list_recent(&self) -> Result<Vec<Post>> {
        let records = self.store.query(&Self::posts_query()).await?;

        let mut posts: Vec<Post> = records
            .into_iter()
            .filter_map(|r| r.record.into_post())
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        posts.truncate(self.post_limit);

        Ok(posts)
    }

    pub async fn create_post(&self, raw_text: Option<&str>) -> Result<Post> {
        let text = text::sanitize(text::validate(raw_text)?);

        let id = self.sequence.reserve().await?;
        let post = Post::new(id, text);

        let key = self.store.insert(&Record::Post(post.clone())).await?;
        debug!("Stored post {} under key {}", id, key);

        if let Err(e) = self.sequence.commit(id).await {
            error!(
                "Post {} stored under key {} but the sequence was not advanced: {}",
                id, key, e
            );
            return Err(e);
        }

        info!("Created post {}", id);

        let report = self.evict(id).await;
        if report.failed > 0 {
            warn!(
                "Eviction after post {} left {} stale posts behind",
                id, report.failed
            );
        }

        Ok(post)
    }

    /// Delete every post at or below `newest_id - post_limit`. Failures are
    /// logged and counted, never returned.
    pub async fn evict(&self, newest_id: u64) -> EvictionReport {
        let mut report = EvictionReport::default();
        let threshold = newest_id as i64 - self.post_limit as i64;

        let query = Self::posts_query().filter(Filter::lte("id", threshold));
        let stale = match self.store.query(&query).await {
            Ok(stale) => stale,
            Err(e) => {
                warn!("Failed to look up posts at or below {}: {}", threshold, e);
                return report;
            }
        };

        for record in stale {
            match self.store.delete(&record.key).await {
                Ok(()) => {
                    debug!("Evicted record {}", record.key);
                    report.removed += 1;
                }
                Err(e) => {
                    warn!("Failed to evict record {}: {}", record.key, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
