use crate::artist_stats::ArtistStats;
use crate::tier::{ThresholdPolicy, TierConfig};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RankError {
    #[error("Invalid weight: {0}")]
    InvalidWeight(f64),
    #[error("Invalid tier config: {0}")]
    InvalidTierConfig(String),
}

/// 参与排序的艺术家
#[derive(Debug, Clone, PartialEq)]
pub struct RankedArtist {
    pub artist_name: String,
    pub stats: ArtistStats,
    pub score: f64,
}

/// 单个层级的分配结果，按分数降序
#[derive(Debug, Clone, PartialEq)]
pub struct TierAssignment {
    pub name: String,
    pub capacity: usize,
    pub artists: Vec<RankedArtist>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedLineup {
    /// 实际生效的阈值
    pub threshold: u32,
    pub tiers: Vec<TierAssignment>,
    /// 所有层级填满后剩下的艺术家，分数高的在前
    pub overflow: Vec<RankedArtist>,
}

impl RankedLineup {
    pub fn tier(&self, name: &str) -> Option<&TierAssignment> {
        self.tiers.iter().find(|t| t.name == name)
    }

    pub fn tier_names(&self, name: &str) -> Vec<&str> {
        self.tier(name)
            .map(|t| t.artists.iter().map(|a| a.artist_name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn overflow_names(&self) -> Vec<&str> {
        self.overflow.iter().map(|a| a.artist_name.as_str()).collect()
    }
}

/// `total_likes * your_likes^(weight - 1)`
///
/// weight = 1 时退化为 total_likes；weight 越大越偏向用户自己常听的艺术家。
/// total_likes 为 0 时分数恒为 0。
pub fn score(stats: &ArtistStats, weight: f64) -> f64 {
    if stats.total_likes == 0 {
        return 0.0;
    }
    stats.total_likes as f64 * (stats.your_likes as f64).powf(weight - 1.0)
}

/// 按阈值过滤、加权打分、排序，然后依次填充各层级
///
/// Ranker 不保存任何调用间状态，可以重复调用。
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    tiers: TierConfig,
    threshold_policy: ThresholdPolicy,
}

impl Ranker {
    pub fn new(tiers: TierConfig, threshold_policy: ThresholdPolicy) -> Self {
        Self {
            tiers,
            threshold_policy,
        }
    }

    pub fn rank(
        &self,
        stats: &HashMap<String, ArtistStats>,
        threshold: Option<u32>,
        weight: f64,
    ) -> Result<RankedLineup, RankError> {
        if !weight.is_finite() {
            return Err(RankError::InvalidWeight(weight));
        }
        let threshold =
            threshold.unwrap_or_else(|| self.threshold_policy.default_for(stats.len()));

        let mut ranked: Vec<RankedArtist> = stats
            .values()
            .filter(|s| s.your_likes >= threshold as u64)
            .map(|s| RankedArtist {
                artist_name: s.artist_name.clone(),
                stats: s.clone(),
                score: score(s, weight),
            })
            .collect();
        // 权重过大时分数会溢出为无穷大
        if ranked.iter().any(|a| !a.score.is_finite()) {
            return Err(RankError::InvalidWeight(weight));
        }

        // 分数降序，同分按艺术家名升序，保证结果确定
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.artist_name.cmp(&b.artist_name))
        });

        let mut remaining = ranked.into_iter();
        let tiers: Vec<TierAssignment> = self
            .tiers
            .tiers()
            .iter()
            .map(|spec| TierAssignment {
                name: spec.name.clone(),
                capacity: spec.capacity,
                artists: remaining.by_ref().take(spec.capacity).collect(),
            })
            .collect();
        let overflow: Vec<RankedArtist> = remaining.collect();

        log::debug!(
            "Ranked artists: threshold={}, weight={}, overflow={}",
            threshold,
            weight,
            overflow.len()
        );

        Ok(RankedLineup {
            threshold,
            tiers,
            overflow,
        })
    }
}
