use crate::value::{UserId, UserProfile};
use async_trait::async_trait;
use thiserror::Error;

/// 一条"喜欢"记录：当前用户喜欢过的一首曲目
///
/// `like_count` 是曲目在平台上获得的总喜欢数，与当前用户无关。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeRecord {
    pub artist_name: String,
    pub like_count: u64,
}

impl LikeRecord {
    pub fn new(artist_name: impl Into<String>, like_count: u64) -> Self {
        Self {
            artist_name: artist_name.into(),
            like_count,
        }
    }

    /// 从上游原始字段构造记录
    ///
    /// - 缺少艺术家名（或为空白）时返回 `None`，由调用方跳过
    /// - 缺少喜欢数按 0 处理，负数截断为 0
    pub fn from_parts(artist_name: Option<&str>, like_count: Option<i64>) -> Option<Self> {
        let artist_name = artist_name?;
        if artist_name.trim().is_empty() {
            return None;
        }
        let like_count = like_count.map(|c| c.max(0) as u64).unwrap_or(0);
        Some(Self::new(artist_name, like_count))
    }
}

#[derive(Error, Debug)]
pub enum LikeFeedError {
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Upstream returned status {0}: {1}")]
    Status(u16, String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Decode error: {0}")]
    Decode(String),
}

/// 喜欢记录来源（外部音乐平台）
#[async_trait]
pub trait LikeFeed: Send + Sync {
    async fn resolve_user(&self, user_id: UserId) -> Result<UserProfile, LikeFeedError>;

    /// 获取用户全部喜欢记录，分页由实现负责，按到达顺序拼接
    async fn fetch_likes(&self, user_id: UserId) -> Result<Vec<LikeRecord>, LikeFeedError>;
}
