pub mod consts;
pub mod lineup_api;

use application::query::config::LineupConfig;
use application::query::generate_lineup::GenerateLineup;
use domain::like::LikeFeedError;
use domain::ranking::Ranker;
use infra::config::AppConfigImpl;
use infra::repository::in_memory::like_snapshot::InMemoryLikeSnapshotCache;
use infra::SoundCloudClient;
use std::sync::Arc;

pub struct AppState {
    pub generate_lineup: GenerateLineup,
    /// 文本海报的艺术家分隔符
    pub separator: String,
}

impl AppState {
    pub fn new(app_cfg: &AppConfigImpl) -> Result<Self, LikeFeedError> {
        let like_feed = Arc::new(SoundCloudClient::new(&app_cfg.soundcloud())?);
        let snapshot_cache = Arc::new(InMemoryLikeSnapshotCache::new(app_cfg.cache().ttl_secs));
        let ranker = Ranker::new(app_cfg.tier_config(), app_cfg.threshold_policy());

        Ok(Self {
            generate_lineup: GenerateLineup::new(like_feed, snapshot_cache, ranker),
            separator: app_cfg.separator(),
        })
    }
}
