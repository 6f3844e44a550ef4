pub mod repository;

pub mod config;
pub use config::{CacheConfig, ServerConfig, SoundCloudConfig};

pub mod soundcloud;
pub use soundcloud::SoundCloudClient;
