use rand::seq::SliceRandom;
use rand::Rng;

/// 生成一个俏皮的音乐节标题，例如 "Smithpalooza 2026"
///
/// 取用户名最后一个单词作为名字；用户名为空白时返回 `None`。
pub fn festival_title<R: Rng + ?Sized>(username: &str, year: i32, rng: &mut R) -> Option<String> {
    let name = username.split_whitespace().last()?;
    let suffixes = [
        "fest".to_string(),
        "chella".to_string(),
        " in a Bottle".to_string(),
        "palooza".to_string(),
        format!(" by {}west", name),
        "land".to_string(),
    ];
    let suffix = suffixes.choose(rng)?;
    Some(format!("{}{} {}", name, suffix, year))
}
