use crate::config::SoundCloudConfig;
use async_trait::async_trait;
use domain::like::{LikeFeed, LikeFeedError, LikeRecord};
use domain::value::{UserId, UserProfile};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// 收藏列表的一页（linked_partitioning 分页）
///
/// 条目保留为原始 JSON，单个条目字段类型不对时只影响该条目。
#[derive(Debug, Deserialize)]
struct FavoritesPage {
    #[serde(default)]
    collection: Vec<Value>,
    next_href: Option<String>,
}

/// 从收藏条目中取出艺术家名和喜欢数
///
/// 旧版接口的喜欢数字段名为 `favoritings_count`；非整数的喜欢数按缺失处理。
fn track_to_record(track: &Value) -> Option<LikeRecord> {
    let artist_name = track.pointer("/user/username").and_then(Value::as_str);
    let like_count = track
        .get("likes_count")
        .and_then(Value::as_i64)
        .or_else(|| track.get("favoritings_count").and_then(Value::as_i64));
    LikeRecord::from_parts(artist_name, like_count)
}

/// SoundCloud 兼容 API 客户端
///
/// 自动跟随 `next_href` 拉取全部收藏，按到达顺序拼接。
#[derive(Debug, Clone)]
pub struct SoundCloudClient {
    client: Client,
    base_url: Url,
    client_id: String,
    page_size: u32,
    max_pages: usize,
}

impl SoundCloudClient {
    pub fn new(config: &SoundCloudConfig) -> Result<Self, LikeFeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LikeFeedError::Transport(e.to_string()))?;

        // 保证以 '/' 结尾，否则 join 会替换掉最后一段路径
        let mut api_base = config.api_base.clone();
        if !api_base.ends_with('/') {
            api_base.push('/');
        }
        let base_url = Url::parse(&api_base)
            .map_err(|e| LikeFeedError::Transport(format!("invalid api base url: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            client_id: config.client_id.clone(),
            page_size: config.page_size,
            max_pages: config.max_pages,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, LikeFeedError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| LikeFeedError::Transport(format!("invalid url {}: {}", path, e)))?;
        Ok(self.with_client_id(url))
    }

    /// next_href 不一定带 client_id，缺少时补上
    fn with_client_id(&self, mut url: Url) -> Url {
        if self.client_id.is_empty() || url.query_pairs().any(|(k, _)| k == "client_id") {
            return url;
        }
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id);
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, LikeFeedError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LikeFeedError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Upstream returned {}: {}", status, body);
            return Err(LikeFeedError::Status(status.as_u16(), body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LikeFeedError::Decode(e.to_string()))
    }
}

fn not_found_as_user(user_id: UserId) -> impl Fn(LikeFeedError) -> LikeFeedError {
    move |err| match err {
        LikeFeedError::Status(code, _) if code == StatusCode::NOT_FOUND.as_u16() => {
            LikeFeedError::UserNotFound(user_id.to_string())
        }
        other => other,
    }
}

#[async_trait]
impl LikeFeed for SoundCloudClient {
    async fn resolve_user(&self, user_id: UserId) -> Result<UserProfile, LikeFeedError> {
        let url = self.endpoint(&format!("users/{}", user_id))?;
        let user: Value = self
            .get_json(url)
            .await
            .map_err(not_found_as_user(user_id))?;

        let id = user.get("id").and_then(Value::as_u64).map(UserId::from);
        let username = user.get("username").and_then(Value::as_str).unwrap_or_default();
        Ok(UserProfile::new(id.unwrap_or(user_id), username.to_string()))
    }

    async fn fetch_likes(&self, user_id: UserId) -> Result<Vec<LikeRecord>, LikeFeedError> {
        let mut url = self.endpoint(&format!("users/{}/favorites", user_id))?;
        url.query_pairs_mut()
            .append_pair("limit", &self.page_size.to_string())
            .append_pair("linked_partitioning", "1");

        let mut records = Vec::new();
        let mut page_count = 0;
        loop {
            page_count += 1;
            let page: FavoritesPage = self
                .get_json(url)
                .await
                .map_err(not_found_as_user(user_id))?;

            let entries = page.collection.len();
            records.extend(
                page.collection.iter().filter_map(track_to_record),
            );
            log::debug!(
                "Fetched favorites page {} for user {}: entries={}, total={}",
                page_count,
                user_id,
                entries,
                records.len()
            );

            let Some(next_href) = page.next_href else {
                break;
            };
            if page_count >= self.max_pages {
                log::warn!(
                    "Stopped fetching favorites for user {} after {} pages",
                    user_id,
                    page_count
                );
                break;
            }
            url = Url::parse(&next_href)
                .map(|u| self.with_client_id(u))
                .map_err(|e| LikeFeedError::Decode(format!("invalid next_href: {}", e)))?;
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_base: String, max_pages: usize) -> SoundCloudConfig {
        SoundCloudConfig {
            api_base,
            client_id: "test-client".to_string(),
            page_size: 2,
            max_pages,
            timeout_secs: 5,
        }
    }

    fn track(artist: &str, likes: i64) -> serde_json::Value {
        serde_json::json!({ "user": { "id": 1, "username": artist }, "likes_count": likes })
    }

    #[tokio::test]
    async fn test_resolve_user_returns_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/42"))
            .and(query_param("client_id", "test-client"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": 42, "username": "DJ Jane" })),
            )
            .mount(&server)
            .await;

        let client = SoundCloudClient::new(&test_config(server.uri(), 10)).unwrap();
        let profile = client.resolve_user(UserId::from(42)).await.unwrap();

        assert_eq!(profile.id, UserId::from(42));
        assert_eq!(profile.username, "DJ Jane");
    }

    #[tokio::test]
    async fn test_resolve_user_tolerates_missing_username() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "username": 5 })),
            )
            .mount(&server)
            .await;

        let client = SoundCloudClient::new(&test_config(server.uri(), 10)).unwrap();
        let profile = client.resolve_user(UserId::from(42)).await.unwrap();

        assert_eq!(profile.id, UserId::from(42));
        assert_eq!(profile.username, "");
    }

    #[tokio::test]
    async fn test_resolve_user_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = SoundCloudClient::new(&test_config(server.uri(), 10)).unwrap();
        let err = client.resolve_user(UserId::from(7)).await.unwrap_err();

        assert!(matches!(err, LikeFeedError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_likes_follows_next_href() {
        let server = MockServer::start().await;
        let next = format!("{}/users/42/favorites?cursor=2", server.uri());

        Mock::given(method("GET"))
            .and(path("/users/42/favorites"))
            .and(query_param("linked_partitioning", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "collection": [track("A", 10), track("B", 5)],
                "next_href": next,
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users/42/favorites"))
            .and(query_param("cursor", "2"))
            .and(query_param("client_id", "test-client"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "collection": [track("A", 10), track("C", 1)],
                "next_href": null,
            })))
            .mount(&server)
            .await;

        let client = SoundCloudClient::new(&test_config(server.uri(), 10)).unwrap();
        let records = client.fetch_likes(UserId::from(42)).await.unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.artist_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "A", "C"]);
        assert_eq!(records[3].like_count, 1);
    }

    #[tokio::test]
    async fn test_fetch_likes_repairs_malformed_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/42/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "collection": [
                    { "user": { "username": "A" } },
                    { "user": { "username": "B" }, "favoritings_count": 4 },
                    { "user": null, "likes_count": 9 },
                    { "likes_count": 3 },
                    null,
                    { "user": { "username": "C" }, "likes_count": -2 }
                ]
            })))
            .mount(&server)
            .await;

        let client = SoundCloudClient::new(&test_config(server.uri(), 10)).unwrap();
        let records = client.fetch_likes(UserId::from(42)).await.unwrap();

        assert_eq!(
            records,
            vec![
                LikeRecord::new("A", 0),
                LikeRecord::new("B", 4),
                LikeRecord::new("C", 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_likes_tolerates_mistyped_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/42/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "collection": [
                    { "user": { "username": "A" }, "likes_count": 10 },
                    { "user": { "username": "B" }, "likes_count": "lots" },
                    { "user": { "username": 7 }, "likes_count": 1 },
                    { "user": { "username": "D" }, "likes_count": 12.5 },
                    "not an object"
                ]
            })))
            .mount(&server)
            .await;

        let client = SoundCloudClient::new(&test_config(server.uri(), 10)).unwrap();
        let records = client.fetch_likes(UserId::from(42)).await.unwrap();

        assert_eq!(
            records,
            vec![
                LikeRecord::new("A", 10),
                LikeRecord::new("B", 0),
                LikeRecord::new("D", 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_likes_stops_at_max_pages() {
        let server = MockServer::start().await;
        let next = format!("{}/users/42/favorites?cursor=again", server.uri());

        // 每一页都指向下一页
        Mock::given(method("GET"))
            .and(path("/users/42/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "collection": [track("A", 1)],
                "next_href": next,
            })))
            .expect(3)
            .mount(&server)
            .await;

        let client = SoundCloudClient::new(&test_config(server.uri(), 3)).unwrap();
        let records = client.fetch_likes(UserId::from(42)).await.unwrap();

        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_likes_surfaces_upstream_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/42/favorites"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let client = SoundCloudClient::new(&test_config(server.uri(), 10)).unwrap();
        let err = client.fetch_likes(UserId::from(42)).await.unwrap_err();

        assert!(matches!(err, LikeFeedError::Status(503, ref body) if body == "busy"));
    }
}
