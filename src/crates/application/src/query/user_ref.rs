use crate::query::QueryError;
use domain::value::UserId;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref USER_ID_RX: Regex = Regex::new(r"\d+").unwrap();
}

/// 从用户输入中解析平台用户 ID
///
/// 支持纯数字 ID 或包含 ID 的 RSS 链接，取第一段连续数字。
pub fn parse_user_id(input: &str) -> Result<UserId, QueryError> {
    let digits = USER_ID_RX
        .find(input.trim())
        .map(|m| m.as_str())
        .ok_or_else(|| QueryError::InvalidInput("Input was not a number or RSS link".to_string()))?;
    digits
        .parse::<u64>()
        .map(UserId::from)
        .map_err(|_| QueryError::InvalidInput(format!("User id out of range: {}", digits)))
}
