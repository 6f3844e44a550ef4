use application::query::snapshot_cache::{LikeSnapshot, LikeSnapshotCache};
use async_trait::async_trait;
use domain::value::UserId;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 单槽位的内存快照缓存
///
/// 只保存最近一个用户的快照；写入新用户时旧快照被替换。
#[derive(Clone)]
pub struct InMemoryLikeSnapshotCache {
    slot: Arc<RwLock<Option<LikeSnapshot>>>,
    /// 缓存过期时间（秒）
    ttl_secs: u64,
}

impl InMemoryLikeSnapshotCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            slot: Arc::new(RwLock::new(None)),
            ttl_secs,
        }
    }

    /// 检查快照是否过期
    fn is_expired(&self, snapshot: &LikeSnapshot) -> bool {
        let age = chrono::Utc::now() - snapshot.fetched_at;
        age.num_seconds() > self.ttl_secs as i64
    }
}

#[async_trait]
impl LikeSnapshotCache for InMemoryLikeSnapshotCache {
    async fn get(&self, user_id: UserId) -> Option<LikeSnapshot> {
        let slot = self.slot.read().await;
        let snapshot = slot.as_ref()?;
        if snapshot.user_id != user_id || self.is_expired(snapshot) {
            return None;
        }
        Some(snapshot.clone())
    }

    async fn put(&self, snapshot: LikeSnapshot) {
        let mut slot = self.slot.write().await;
        if let Some(previous) = slot.as_ref() {
            if previous.user_id != snapshot.user_id {
                log::debug!(
                    "Replacing cached likes of user {} with user {}",
                    previous.user_id,
                    snapshot.user_id
                );
            }
        }
        *slot = Some(snapshot);
    }

    async fn invalidate(&self) {
        *self.slot.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::like::LikeRecord;

    fn snapshot(user_id: u64) -> LikeSnapshot {
        LikeSnapshot::new(UserId::from(user_id), vec![LikeRecord::new("A", 3)])
    }

    #[tokio::test]
    async fn test_cache_put_and_get() {
        let cache = InMemoryLikeSnapshotCache::new(3600);
        cache.put(snapshot(1)).await;

        let retrieved = cache.get(UserId::from(1)).await.unwrap();
        assert_eq!(retrieved.records.len(), 1);
        assert_eq!(retrieved.records[0].artist_name, "A");
    }

    #[tokio::test]
    async fn test_cache_miss_for_other_user() {
        let cache = InMemoryLikeSnapshotCache::new(3600);
        cache.put(snapshot(1)).await;

        assert!(cache.get(UserId::from(2)).await.is_none());
    }

    #[tokio::test]
    async fn test_new_user_replaces_snapshot() {
        let cache = InMemoryLikeSnapshotCache::new(3600);
        cache.put(snapshot(1)).await;
        cache.put(snapshot(2)).await;

        assert!(cache.get(UserId::from(1)).await.is_none());
        assert!(cache.get(UserId::from(2)).await.is_some());
    }

    #[tokio::test]
    async fn test_cache_invalidate() {
        let cache = InMemoryLikeSnapshotCache::new(3600);
        cache.put(snapshot(1)).await;
        cache.invalidate().await;

        assert!(cache.get(UserId::from(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_snapshot_is_ignored() {
        let cache = InMemoryLikeSnapshotCache::new(60);
        let mut old = snapshot(1);
        old.fetched_at = chrono::Utc::now() - chrono::Duration::seconds(120);
        cache.put(old).await;

        assert!(cache.get(UserId::from(1)).await.is_none());
    }
}
