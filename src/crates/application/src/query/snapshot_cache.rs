use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::like::LikeRecord;
use domain::value::UserId;
use std::sync::Arc;

/// 某个用户最近一次拉取的喜欢记录快照
#[derive(Debug, Clone)]
pub struct LikeSnapshot {
    pub user_id: UserId,
    pub records: Arc<[LikeRecord]>,
    pub fetched_at: DateTime<Utc>,
}

impl LikeSnapshot {
    pub fn new(user_id: UserId, records: Vec<LikeRecord>) -> Self {
        Self {
            user_id,
            records: records.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// 喜欢记录快照缓存 trait
///
/// 只保留最近一个用户的快照，用户变化时旧快照即失效。
#[async_trait]
pub trait LikeSnapshotCache: Send + Sync {
    /// 仅当用户一致且未过期时返回快照
    async fn get(&self, user_id: UserId) -> Option<LikeSnapshot>;

    /// 替换当前快照
    async fn put(&self, snapshot: LikeSnapshot);

    async fn invalidate(&self);
}
