use crate::consts;
use crate::AppState;
use actix_web::{http::StatusCode, web, HttpResponse, Scope};
use application::query::dto::lineup::{ArtistEntry, LineupView, TierView};
use application::query::generate_lineup::GenerateLineupParams;
use application::query::QueryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineupApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Upstream(String),
}

impl From<QueryError> for LineupApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidInput(_) | QueryError::InvalidParameter(_) => {
                LineupApiError::BadRequest(err.to_string())
            }
            QueryError::NotFound(_) => LineupApiError::NotFound(err.to_string()),
            QueryError::Upstream(_) => LineupApiError::Upstream(err.to_string()),
        }
    }
}

impl actix_web::error::ResponseError for LineupApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).body(message)
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PosterFormat {
    #[default]
    Json,
    Text,
}

/// lineup 请求参数
///
/// - user: 用户 ID 或 RSS 链接（必需）
/// - weight: 个人偏好权重（可选，默认 1）
/// - threshold: 最少喜欢数（可选，不指定时按艺术家数量取默认值）
/// - refresh: 忽略缓存重新拉取（可选）
/// - format: json 或 text（可选，默认 json）
#[derive(Deserialize)]
pub struct LineupQuery {
    pub user: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub threshold: Option<u32>,
    #[serde(default)]
    pub refresh: bool,
    #[serde(default)]
    pub format: PosterFormat,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ArtistResponse {
    pub name: String,
    pub your_likes: u64,
    pub total_likes: u64,
    pub score: f64,
}

impl From<ArtistEntry> for ArtistResponse {
    fn from(entry: ArtistEntry) -> Self {
        Self {
            name: entry.name,
            your_likes: entry.your_likes,
            total_likes: entry.total_likes,
            score: entry.score,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TierResponse {
    pub name: String,
    pub capacity: usize,
    pub artists: Vec<ArtistResponse>,
}

impl From<TierView> for TierResponse {
    fn from(tier: TierView) -> Self {
        Self {
            name: tier.name,
            capacity: tier.capacity,
            artists: tier.artists.into_iter().map(ArtistResponse::from).collect(),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LineupResponse {
    pub user_id: u64,
    pub username: String,
    pub title: Option<String>,
    pub threshold: u32,
    pub weight: f64,
    pub record_count: usize,
    pub artist_count: usize,
    pub tiers: Vec<TierResponse>,
    pub overflow: Vec<ArtistResponse>,
}

impl From<LineupView> for LineupResponse {
    fn from(view: LineupView) -> Self {
        Self {
            user_id: view.user_id.as_u64(),
            username: view.username,
            title: view.title,
            threshold: view.threshold,
            weight: view.weight,
            record_count: view.record_count,
            artist_count: view.artist_count,
            tiers: view.tiers.into_iter().map(TierResponse::from).collect(),
            overflow: view.overflow.into_iter().map(ArtistResponse::from).collect(),
        }
    }
}

/// 生成音乐节海报
pub async fn get_lineup(
    state: web::Data<AppState>,
    query: web::Query<LineupQuery>,
) -> Result<HttpResponse, LineupApiError> {
    let query = query.into_inner();
    let params = GenerateLineupParams {
        user: query.user,
        threshold: query.threshold,
        weight: query.weight,
        refresh: query.refresh,
    };

    let view = state.generate_lineup.handle(params).await.map_err(|e| {
        log::warn!("Failed to generate lineup: {}", e);
        LineupApiError::from(e)
    })?;

    match query.format {
        PosterFormat::Text => Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(view.to_poster_text(&state.separator))),
        PosterFormat::Json => Ok(HttpResponse::Ok().json(LineupResponse::from(view))),
    }
}

pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().body("pong")
}

pub fn configure_service() -> Scope {
    web::scope(consts::URL_PATH_API)
        .route("/lineup", web::get().to(get_lineup))
        .route("/ping", web::get().to(ping))
}
