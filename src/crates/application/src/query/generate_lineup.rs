use crate::query::dto::lineup::LineupView;
use crate::query::festival_title::festival_title;
use crate::query::snapshot_cache::{LikeSnapshot, LikeSnapshotCache};
use crate::query::user_ref::parse_user_id;
use crate::query::QueryError;
use chrono::{Datelike, Utc};
use domain::artist_stats::aggregate;
use domain::like::{LikeFeed, LikeRecord};
use domain::ranking::Ranker;
use domain::value::UserId;
use std::sync::Arc;

/// 生成海报的请求参数
#[derive(Debug, Clone)]
pub struct GenerateLineupParams {
    /// 用户 ID 或包含 ID 的 RSS 链接
    pub user: String,
    /// 最少喜欢数，不指定时按艺术家数量取默认值
    pub threshold: Option<u32>,
    pub weight: f64,
    /// 忽略缓存，重新拉取
    pub refresh: bool,
}

#[derive(Clone)]
pub struct GenerateLineup {
    like_feed: Arc<dyn LikeFeed>,
    snapshot_cache: Arc<dyn LikeSnapshotCache>,
    ranker: Ranker,
}

impl GenerateLineup {
    pub fn new(
        like_feed: Arc<dyn LikeFeed>,
        snapshot_cache: Arc<dyn LikeSnapshotCache>,
        ranker: Ranker,
    ) -> Self {
        Self {
            like_feed,
            snapshot_cache,
            ranker,
        }
    }

    /// 解析用户 -> 拉取（或复用缓存的）喜欢记录 -> 聚合 -> 排序分层 -> 生成标题
    pub async fn handle(&self, params: GenerateLineupParams) -> Result<LineupView, QueryError> {
        if !params.weight.is_finite() {
            return Err(QueryError::InvalidParameter(format!(
                "weight must be a finite number, got {}",
                params.weight
            )));
        }
        let user_id = parse_user_id(&params.user)?;
        let profile = self.like_feed.resolve_user(user_id).await?;
        let records = self.load_likes(profile.id, params.refresh).await?;

        let stats = aggregate(records.iter());
        let artist_count = stats.len();
        let lineup = self.ranker.rank(&stats, params.threshold, params.weight)?;
        let threshold = lineup.threshold;
        let (tiers, overflow) = LineupView::tiers_from(lineup);

        let title = festival_title(&profile.username, Utc::now().year(), &mut rand::thread_rng());

        log::info!(
            "Generated lineup for user {}: records={}, artists={}, threshold={}, weight={}",
            profile.id,
            records.len(),
            artist_count,
            threshold,
            params.weight
        );

        Ok(LineupView {
            user_id: profile.id,
            username: profile.username,
            title,
            threshold,
            weight: params.weight,
            record_count: records.len(),
            artist_count,
            tiers,
            overflow,
        })
    }

    async fn load_likes(
        &self,
        user_id: UserId,
        refresh: bool,
    ) -> Result<Arc<[LikeRecord]>, QueryError> {
        if !refresh {
            if let Some(snapshot) = self.snapshot_cache.get(user_id).await {
                log::info!("Reusing cached likes for user {}", user_id);
                return Ok(snapshot.records);
            }
        }

        let records = self.like_feed.fetch_likes(user_id).await?;
        let snapshot = LikeSnapshot::new(user_id, records);
        let records = snapshot.records.clone();
        self.snapshot_cache.put(snapshot).await;
        Ok(records)
    }
}
