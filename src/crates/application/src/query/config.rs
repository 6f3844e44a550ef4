use domain::tier::{ThresholdPolicy, TierConfig};

/// 海报生成配置
pub trait LineupConfig {
    /// 层级配置（按醒目程度排序）
    fn tier_config(&self) -> TierConfig;

    /// 未指定阈值时的默认阈值策略
    fn threshold_policy(&self) -> ThresholdPolicy;

    /// 文本海报中艺术家之间的分隔符
    fn separator(&self) -> String;
}
