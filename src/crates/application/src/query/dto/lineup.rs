use domain::ranking::{RankedArtist, RankedLineup};
use domain::value::UserId;

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistEntry {
    pub name: String,
    pub your_likes: u64,
    pub total_likes: u64,
    pub score: f64,
}

impl From<RankedArtist> for ArtistEntry {
    fn from(artist: RankedArtist) -> Self {
        Self {
            name: artist.artist_name,
            your_likes: artist.stats.your_likes,
            total_likes: artist.stats.total_likes,
            score: artist.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierView {
    pub name: String,
    pub capacity: usize,
    pub artists: Vec<ArtistEntry>,
}

/// 生成好的音乐节海报
#[derive(Debug, Clone, PartialEq)]
pub struct LineupView {
    pub user_id: UserId,
    pub username: String,
    pub title: Option<String>,
    pub threshold: u32,
    pub weight: f64,
    pub record_count: usize,
    pub artist_count: usize,
    pub tiers: Vec<TierView>,
    pub overflow: Vec<ArtistEntry>,
}

impl LineupView {
    pub fn tiers_from(lineup: RankedLineup) -> (Vec<TierView>, Vec<ArtistEntry>) {
        let tiers = lineup
            .tiers
            .into_iter()
            .map(|t| TierView {
                name: t.name,
                capacity: t.capacity,
                artists: t.artists.into_iter().map(ArtistEntry::from).collect(),
            })
            .collect();
        let overflow = lineup.overflow.into_iter().map(ArtistEntry::from).collect();
        (tiers, overflow)
    }

    /// 渲染为纯文本海报：每个层级一行，溢出的艺术家放在最后一行
    ///
    /// 容量为 0 的层级显示标题，空行不输出。
    pub fn to_poster_text(&self, separator: &str) -> String {
        let join = |artists: &[ArtistEntry]| {
            artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(separator)
        };

        let mut lines: Vec<String> = Vec::new();
        for tier in &self.tiers {
            let line = if tier.capacity == 0 {
                self.title.clone().unwrap_or_default()
            } else {
                join(&tier.artists)
            };
            if !line.is_empty() {
                lines.push(line);
            }
        }
        let overflow = join(&self.overflow);
        if !overflow.is_empty() {
            lines.push(overflow);
        }
        lines.join("\n")
    }
}
