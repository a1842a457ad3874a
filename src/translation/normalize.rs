//! 文本规范化
//!
//! 词表键与页面文本在查找前都必须经过同一个规范化函数，
//! 否则查找会静默失败。

use std::sync::OnceLock;

use regex::Regex;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// 将任意连续空白（包括换行）折叠为单个空格，并去掉首尾空白
pub fn normalize(text: &str) -> String {
    whitespace_re().replace_all(text, " ").trim().to_string()
}
