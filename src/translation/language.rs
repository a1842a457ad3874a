//! 语言代码

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{TranslationError, TranslationResult};

/// 界面语言代码，例如 `en`、`hi`、`fr`、`pt-BR`
///
/// 主语言子标签统一为小写。第二个子标签按 BCP 47 的书写习惯规范化：
/// 两个字母的地区大写（`pt-br` 与 `pt-BR` 是同一个键），四个字母的书写系统
/// 首字母大写（`zh-Hant`），其余小写。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn parse(value: &str) -> TranslationResult<Self> {
        let value = value.trim();
        let (primary, region) = match value.split_once('-') {
            Some((primary, region)) => (primary, Some(region)),
            None => (value, None),
        };

        if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TranslationError::InvalidLanguage(value.to_string()));
        }

        let mut code = primary.to_ascii_lowercase();

        if let Some(region) = region {
            if region.is_empty()
                || region.len() > 8
                || !region.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(TranslationError::InvalidLanguage(value.to_string()));
            }
            code.push('-');
            code.push_str(&canonical_subtag(region));
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn canonical_subtag(subtag: &str) -> String {
    let alphabetic = subtag.chars().all(|c| c.is_ascii_alphabetic());
    match subtag.len() {
        2 if alphabetic => subtag.to_ascii_uppercase(),
        4 if alphabetic => {
            let lower = subtag.to_ascii_lowercase();
            let (first, rest) = lower.split_at(1);
            format!("{}{}", first.to_ascii_uppercase(), rest)
        }
        _ => subtag.to_ascii_lowercase(),
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self(super::config::constants::DEFAULT_LANGUAGE.to_string())
    }
}

impl FromStr for LanguageCode {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = TranslationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
