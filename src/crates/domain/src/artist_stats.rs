use crate::like::LikeRecord;
use std::collections::HashMap;

/// 单个艺术家的统计信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistStats {
    pub artist_name: String,
    /// 当前用户喜欢过该艺术家的曲目数
    pub your_likes: u64,
    /// 这些曲目在平台上的喜欢数之和
    pub total_likes: u64,
}

impl ArtistStats {
    pub fn new(artist_name: String) -> Self {
        Self {
            artist_name,
            your_likes: 0,
            total_likes: 0,
        }
    }

    pub fn record(&mut self, like: &LikeRecord) {
        self.your_likes += 1;
        self.total_likes += like.like_count;
    }
}

/// 按艺术家聚合喜欢记录
///
/// 只做加法，结果与记录顺序无关。艺术家名为空白的记录直接跳过。
pub fn aggregate<'a, I>(records: I) -> HashMap<String, ArtistStats>
where
    I: IntoIterator<Item = &'a LikeRecord>,
{
    let mut artists: HashMap<String, ArtistStats> = HashMap::new();
    for like in records {
        if like.artist_name.trim().is_empty() {
            log::debug!("Skipping like record without artist identity");
            continue;
        }
        artists
            .entry(like.artist_name.clone())
            .or_insert_with(|| ArtistStats::new(like.artist_name.clone()))
            .record(like);
    }
    artists
}
