use domain::like::LikeFeedError;
use domain::ranking::RankError;
use thiserror::Error;

pub mod config;
pub mod dto;
pub mod festival_title;
pub mod generate_lineup;
pub mod snapshot_cache;
pub mod user_ref;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<RankError> for QueryError {
    fn from(err: RankError) -> Self {
        QueryError::InvalidParameter(err.to_string())
    }
}

impl From<LikeFeedError> for QueryError {
    fn from(err: LikeFeedError) -> Self {
        match err {
            LikeFeedError::UserNotFound(user) => QueryError::NotFound(user),
            other => QueryError::Upstream(other.to_string()),
        }
    }
}
