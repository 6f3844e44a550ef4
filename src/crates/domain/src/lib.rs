pub mod artist_stats;
pub mod like;
pub mod ranking;
pub mod tier;
pub mod value;
