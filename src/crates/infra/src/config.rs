use application::query::config::LineupConfig;
use config::{Config, Environment, File};
use domain::tier::{ThresholdPolicy, TierConfig, TierSpec};
use dotenvy::dotenv;
use serde::Deserialize;
use std::error::Error;
use std::sync::Arc;
use std::sync::RwLock;

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    /// 服务器配置
    server: RawServerConfig,
    /// 音乐平台 API 配置
    soundcloud: RawSoundCloudConfig,
    /// 快照缓存配置
    cache: RawCacheConfig,
    /// 海报布局配置
    lineup: RawLineupConfig,
    /// 默认阈值策略
    threshold: RawThresholdConfig,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            server: RawServerConfig::default(),
            soundcloud: RawSoundCloudConfig::default(),
            cache: RawCacheConfig::default(),
            lineup: RawLineupConfig::default(),
            threshold: RawThresholdConfig::default(),
        }
    }
}

/// 服务器配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServerConfig {
    /// 监听地址
    host: String,
    /// 监听端口
    port: u16,
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5533,
        }
    }
}

/// 音乐平台 API 配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawSoundCloudConfig {
    api_base: String,
    client_id: String,
    /// 每页记录数
    page_size: u32,
    /// 最多拉取的页数
    max_pages: usize,
    /// 单次请求超时（秒）
    timeout_secs: u64,
}

impl Default for RawSoundCloudConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.soundcloud.com".to_string(),
            client_id: "".to_string(),
            page_size: 200,
            max_pages: 50,
            timeout_secs: 20,
        }
    }
}

/// 缓存配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawCacheConfig {
    /// 快照过期时间（秒），默认 10 分钟
    ttl_secs: u64,
}

impl Default for RawCacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 600 }
    }
}

/// 海报布局配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawLineupConfig {
    /// 层级列表，越靠前越醒目
    tiers: Vec<TierSpec>,
    /// 文本海报的艺术家分隔符
    separator: String,
}

impl Default for RawLineupConfig {
    fn default() -> Self {
        Self {
            tiers: TierConfig::default().tiers().to_vec(),
            separator: " \u{2022} ".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawThresholdConfig {
    many_artists_cutoff: usize,
    many_artists_value: u32,
    default_value: u32,
}

impl Default for RawThresholdConfig {
    fn default() -> Self {
        let policy = ThresholdPolicy::default();
        Self {
            many_artists_cutoff: policy.many_artists_cutoff,
            many_artists_value: policy.many_artists_value,
            default_value: policy.default_value,
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 音乐平台 API 配置
#[derive(Debug, Clone)]
pub struct SoundCloudConfig {
    pub api_base: String,
    pub client_id: String,
    pub page_size: u32,
    pub max_pages: usize,
    pub timeout_secs: u64,
}

/// 缓存配置
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// 快照过期时间（秒）
    pub ttl_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfigImpl {
    pub server: Arc<RwLock<ServerConfig>>,
    pub soundcloud: Arc<RwLock<SoundCloudConfig>>,
    pub cache: Arc<RwLock<CacheConfig>>,
    pub tiers: Arc<RwLock<TierConfig>>,
    pub separator: Arc<RwLock<String>>,
    pub threshold_policy: Arc<RwLock<ThresholdPolicy>>,
}

impl AppConfigImpl {
    fn new(data: RawConfig) -> Result<Self, Box<dyn Error>> {
        let tiers = TierConfig::new(data.lineup.tiers)?;
        let server_config = ServerConfig {
            host: data.server.host,
            port: data.server.port,
        };
        let soundcloud_config = SoundCloudConfig {
            api_base: data.soundcloud.api_base,
            client_id: data.soundcloud.client_id,
            page_size: data.soundcloud.page_size,
            max_pages: data.soundcloud.max_pages,
            timeout_secs: data.soundcloud.timeout_secs,
        };
        let threshold_policy = ThresholdPolicy {
            many_artists_cutoff: data.threshold.many_artists_cutoff,
            many_artists_value: data.threshold.many_artists_value,
            default_value: data.threshold.default_value,
        };
        Ok(AppConfigImpl {
            server: Arc::new(RwLock::new(server_config)),
            soundcloud: Arc::new(RwLock::new(soundcloud_config)),
            cache: Arc::new(RwLock::new(CacheConfig {
                ttl_secs: data.cache.ttl_secs,
            })),
            tiers: Arc::new(RwLock::new(tiers)),
            separator: Arc::new(RwLock::new(data.lineup.separator)),
            threshold_policy: Arc::new(RwLock::new(threshold_policy)),
        })
    }

    pub fn server(&self) -> ServerConfig {
        let cfg_val = self.server.read().unwrap();
        cfg_val.clone()
    }

    pub fn soundcloud(&self) -> SoundCloudConfig {
        let cfg_val = self.soundcloud.read().unwrap();
        cfg_val.clone()
    }

    pub fn cache(&self) -> CacheConfig {
        let cfg_val = self.cache.read().unwrap();
        cfg_val.clone()
    }

    pub fn load() -> Result<AppConfigImpl, Box<dyn Error>> {
        dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<AppConfigImpl, Box<dyn Error>> {
        let raw: RawConfig = config.try_deserialize()?; // serde 自动填充默认值
        AppConfigImpl::new(raw)
    }
}

impl LineupConfig for AppConfigImpl {
    fn tier_config(&self) -> TierConfig {
        let cfg_val = self.tiers.read().unwrap();
        cfg_val.clone()
    }

    fn threshold_policy(&self) -> ThresholdPolicy {
        let cfg_val = self.threshold_policy.read().unwrap();
        *cfg_val
    }

    fn separator(&self) -> String {
        let cfg_val = self.separator.read().unwrap();
        cfg_val.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(source: &str) -> Result<AppConfigImpl, Box<dyn Error>> {
        let config = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        AppConfigImpl::from_config(config)
    }

    #[test]
    fn test_defaults() {
        let cfg = from_toml("").unwrap();

        assert_eq!(cfg.server().port, 5533);
        assert_eq!(cfg.soundcloud().page_size, 200);
        assert_eq!(cfg.cache().ttl_secs, 600);
        assert_eq!(cfg.tier_config(), TierConfig::default());
        assert_eq!(cfg.threshold_policy(), ThresholdPolicy::default());
        assert_eq!(cfg.separator(), " \u{2022} ");
    }

    #[test]
    fn test_overrides_from_file() {
        let cfg = from_toml(
            r#"
            [server]
            port = 8080

            [soundcloud]
            client_id = "abc"
            max_pages = 3

            [lineup]
            separator = " / "
            tiers = [
                { name = "title", capacity = 0 },
                { name = "headliners", capacity = 2 },
            ]

            [threshold]
            many_artists_cutoff = 10
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server().port, 8080);
        assert_eq!(cfg.server().host, "0.0.0.0");
        assert_eq!(cfg.soundcloud().client_id, "abc");
        assert_eq!(cfg.soundcloud().max_pages, 3);
        assert_eq!(cfg.separator(), " / ");
        assert_eq!(cfg.tier_config().total_capacity(), 2);
        assert_eq!(cfg.threshold_policy().many_artists_cutoff, 10);
        assert_eq!(cfg.threshold_policy().many_artists_value, 2);
    }

    #[test]
    fn test_rejects_duplicate_tiers() {
        let result = from_toml(
            r#"
            [lineup]
            tiers = [
                { name = "h1", capacity = 3 },
                { name = "h1", capacity = 6 },
            ]
            "#,
        );
        assert!(result.is_err());
    }
}
