use crate::ranking::RankError;
use serde::Deserialize;
use std::collections::HashSet;

/// 海报上的一个层级（名称 + 固定槽位数）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TierSpec {
    pub name: String,
    pub capacity: usize,
}

impl TierSpec {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// 有序层级配置，越靠前越醒目
///
/// 容量为 0 的层级只是占位（例如标题位 h0），不消耗任何艺术家。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierConfig {
    tiers: Vec<TierSpec>,
}

impl TierConfig {
    pub fn new(tiers: Vec<TierSpec>) -> Result<Self, RankError> {
        let mut seen = HashSet::new();
        for tier in &tiers {
            if tier.name.trim().is_empty() {
                return Err(RankError::InvalidTierConfig(
                    "tier name must not be empty".to_string(),
                ));
            }
            if !seen.insert(tier.name.as_str()) {
                return Err(RankError::InvalidTierConfig(format!(
                    "duplicate tier name: {}",
                    tier.name
                )));
            }
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[TierSpec] {
        &self.tiers
    }

    pub fn total_capacity(&self) -> usize {
        self.tiers.iter().map(|t| t.capacity).sum()
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                TierSpec::new("h0", 0),
                TierSpec::new("h1", 3),
                TierSpec::new("h2", 6),
                TierSpec::new("h3", 12),
                TierSpec::new("h4", 24),
                TierSpec::new("h5", 36),
            ],
        }
    }
}

/// 未指定阈值时的默认阈值策略
///
/// 艺术家数量超过 `many_artists_cutoff` 时使用 `many_artists_value`，否则使用 `default_value`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    pub many_artists_cutoff: usize,
    pub many_artists_value: u32,
    pub default_value: u32,
}

impl ThresholdPolicy {
    /// `artist_count` 为过滤前的艺术家数量
    pub fn default_for(&self, artist_count: usize) -> u32 {
        if artist_count > self.many_artists_cutoff {
            self.many_artists_value
        } else {
            self.default_value
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            many_artists_cutoff: 150,
            many_artists_value: 2,
            default_value: 1,
        }
    }
}
