//! 选择器组配置
//!
//! 每个组由一个 CSS 选择器和一种文本提取方式组成。组的顺序就是翻译时的处理顺序。

use std::fmt;
use std::str::FromStr;

use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};

use crate::parsers::html::{
    first_child_text, inner_html, inner_text, set_first_child_text, set_inner_html,
    set_text_content, SelectorList,
};

use super::error::{TranslationError, TranslationResult};

/// 文本提取（及其逆向写回）方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMode {
    /// 读取渲染文本，写回时替换全部子节点
    PlainText,
    /// 读取内部 HTML，写回时解析 HTML（保留 `<strong>`、`<a>` 等标记）
    Markup,
    /// 只读写第一个子节点，保留其后的图标等兄弟节点
    FirstTextNode,
}

impl ExtractionMode {
    /// 按此方式提取元素当前文本（未规范化）
    pub fn extract(self, element: &Handle) -> String {
        match self {
            ExtractionMode::PlainText => inner_text(element),
            ExtractionMode::Markup => inner_html(element),
            ExtractionMode::FirstTextNode => first_child_text(element).unwrap_or_default(),
        }
    }

    /// 按此方式写回译文
    pub fn write(self, element: &Handle, text: &str) {
        match self {
            ExtractionMode::PlainText => set_text_content(element, text),
            ExtractionMode::Markup => set_inner_html(element, text),
            ExtractionMode::FirstTextNode => set_first_child_text(element, &format!("{} ", text)),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractionMode::PlainText => "plain-text",
            ExtractionMode::Markup => "markup",
            ExtractionMode::FirstTextNode => "first-text-node",
        };
        f.write_str(name)
    }
}

impl FromStr for ExtractionMode {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain-text" | "plain" | "text" => Ok(ExtractionMode::PlainText),
            "markup" | "html" => Ok(ExtractionMode::Markup),
            "first-text-node" | "first-node" => Ok(ExtractionMode::FirstTextNode),
            other => Err(TranslationError::ConfigError(format!("未知的提取方式: {}", other))),
        }
    }
}

/// 选择器组的配置形式（可序列化）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorGroupConfig {
    pub selector: String,
    #[serde(default = "default_mode")]
    pub mode: ExtractionMode,
}

fn default_mode() -> ExtractionMode {
    ExtractionMode::PlainText
}

/// 已解析的选择器组
#[derive(Debug, Clone)]
pub struct SelectorGroup {
    selectors: SelectorList,
    mode: ExtractionMode,
}

impl SelectorGroup {
    pub fn new(selector: &str, mode: ExtractionMode) -> TranslationResult<Self> {
        Ok(Self {
            selectors: SelectorList::parse(selector)?,
            mode,
        })
    }

    pub fn selectors(&self) -> &SelectorList {
        &self.selectors
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }
}

impl TryFrom<&SelectorGroupConfig> for SelectorGroup {
    type Error = TranslationError;

    fn try_from(config: &SelectorGroupConfig) -> Result<Self, Self::Error> {
        Self::new(&config.selector, config.mode)
    }
}

/// 与 OCR 站点页面结构对应的默认选择器组
pub fn default_group_configs() -> Vec<SelectorGroupConfig> {
    use ExtractionMode::*;

    [
        ("h1, h2, h3, p, button, span:not(.fimg), label span, .section-title", PlainText),
        (".fimg h2", PlainText),
        (".image-text-converter h2, section h2", PlainText),
        (
            ".steps-container h2, .steps-container p, .steps-container span, .steps-container li",
            PlainText,
        ),
        (".steps-container p", Markup),
        ("section ul li", PlainText),
        (".footer-section ul li a", PlainText),
        ("footer p", PlainText),
        ("nav ul li a", PlainText),
        (".faq-question", FirstTextNode),
        (".faq-answer", PlainText),
    ]
    .into_iter()
    .map(|(selector, mode)| SelectorGroupConfig {
        selector: selector.to_string(),
        mode,
    })
    .collect()
}

/// 解析一组配置
pub fn build_groups(configs: &[SelectorGroupConfig]) -> TranslationResult<Vec<SelectorGroup>> {
    configs.iter().map(SelectorGroup::try_from).collect()
}
