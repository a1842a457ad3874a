//! 深色模式
//!
//! 偏好保存在与语言相同的存储中（键 `dark-mode`，值 `enabled` / `disabled`）。
//! 应用主题时切换 `<body>` 的 class，并通过翻译器更新切换按钮的标签。

use std::fmt;

use markup5ever_rcdom::Handle;

use super::config::{constants, ThemeConfig};
use super::engine::PageTranslator;
use super::error::TranslationResult;
use super::groups::ExtractionMode;
use super::storage::PreferenceStore;
use crate::parsers::html::{find_element_by_id, get_body, has_class, set_class};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// 解析存储值；除 `enabled` 外一律视为浅色
    pub fn from_preference(value: Option<&str>) -> Self {
        match value {
            Some(constants::THEME_ENABLED) => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn preference_value(self) -> &'static str {
        match self {
            ThemeMode::Dark => constants::THEME_ENABLED,
            ThemeMode::Light => constants::THEME_DISABLED,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    /// 切换按钮显示的标签：深色时提示切回浅色，反之亦然
    pub fn toggle_label(self, config: &ThemeConfig) -> &str {
        match self {
            ThemeMode::Dark => &config.light_label,
            ThemeMode::Light => &config.dark_label,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => f.write_str("light"),
            ThemeMode::Dark => f.write_str("dark"),
        }
    }
}

/// 深色模式偏好
pub struct ThemePreference<'a, S: PreferenceStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PreferenceStore + ?Sized> ThemePreference<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn mode(&self) -> ThemeMode {
        match self.store.get(constants::THEME_PREFERENCE_KEY) {
            Ok(value) => ThemeMode::from_preference(value.as_deref()),
            Err(e) => {
                tracing::warn!("读取深色模式偏好失败: {}", e);
                ThemeMode::Light
            }
        }
    }

    pub fn set_mode(&self, mode: ThemeMode) -> TranslationResult<()> {
        self.store
            .set(constants::THEME_PREFERENCE_KEY, mode.preference_value())
    }
}

/// 文档当前的主题（由 `<body>` 的 class 决定）
pub fn document_theme(document: &Handle, config: &ThemeConfig) -> ThemeMode {
    match get_body(document) {
        Some(body) if has_class(&body, &config.body_class) => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

/// 把主题应用到文档，返回更新了标签的按钮数量
pub fn apply_theme(
    document: &Handle,
    translator: &mut PageTranslator,
    config: &ThemeConfig,
    mode: ThemeMode,
) -> usize {
    match get_body(document) {
        Some(body) => set_class(&body, &config.body_class, mode.is_dark()),
        None => tracing::warn!("文档没有 <body>，无法设置主题 class"),
    }

    let label = mode.toggle_label(config);
    let mut updated = 0;

    for id in &config.toggle_ids {
        match find_element_by_id(document, id) {
            Some(button) => {
                translator.relabel(&button, label, ExtractionMode::PlainText);
                updated += 1;
            }
            None => tracing::debug!("未找到主题切换按钮 #{}", id),
        }
    }

    updated
}
