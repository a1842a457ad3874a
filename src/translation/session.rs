//! 本地化会话
//!
//! 把翻译器、偏好存储和页面结构（语言下拉框、主题按钮）组合在一起，
//! 对应页面加载和用户操作的几个入口：
//!
//! - `startup`: 应用保存的主题和语言
//! - `select_language`: 保存新语言、同步下拉框并重新翻译
//! - `toggle_theme`: 切换深色模式并保存

use markup5ever_rcdom::Handle;

use super::config::LocalizerConfig;
use super::engine::{PageTranslator, TranslationStats};
use super::error::{helpers, TranslationResult};
use super::language::LanguageCode;
use super::storage::{LanguagePreference, PreferenceStore};
use super::theme::{apply_theme, document_theme, ThemeMode, ThemePreference};
use crate::parsers::html::{find_element_by_id, get_node_attr, select_all, set_node_attr, SelectorList};

/// `startup` 的结果
#[derive(Debug, Clone)]
pub struct StartupReport {
    pub language: LanguageCode,
    /// 主题功能关闭时为 `None`
    pub theme: Option<ThemeMode>,
    pub stats: TranslationStats,
}

pub struct LocalizerSession<S: PreferenceStore> {
    translator: PageTranslator,
    store: S,
    config: LocalizerConfig,
}

impl<S: PreferenceStore> LocalizerSession<S> {
    /// 按配置构建翻译器
    pub fn new(config: LocalizerConfig, store: S) -> TranslationResult<Self> {
        let translator = PageTranslator::from_config(&config)?;
        Ok(Self::with_translator(translator, store, config))
    }

    pub fn with_translator(translator: PageTranslator, store: S, config: LocalizerConfig) -> Self {
        Self {
            translator,
            store,
            config,
        }
    }

    pub fn translator(&self) -> &PageTranslator {
        &self.translator
    }

    pub fn translator_mut(&mut self) -> &mut PageTranslator {
        &mut self.translator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }

    /// 保存的界面语言（没有时为默认语言）
    pub fn preferred_language(&self) -> LanguageCode {
        LanguagePreference::new(&self.store, self.config.default_language.clone())
            .preferred_language()
    }

    /// 页面加载：先应用主题，再同步下拉框并翻译为保存的语言
    pub fn startup(&mut self, document: &Handle) -> StartupReport {
        let theme = if self.config.theme.enabled {
            let mode = ThemePreference::new(&self.store).mode();
            apply_theme(document, &mut self.translator, &self.config.theme, mode);
            Some(mode)
        } else {
            None
        };

        let language = self.preferred_language();
        tracing::info!("应用保存的界面语言: {}", language);

        self.sync_language_select(document, &language);
        let stats = self.translator.translate_page(document, &language);

        StartupReport {
            language,
            theme,
            stats,
        }
    }

    /// 用户选择语言：保存、同步下拉框、翻译整个页面
    pub fn select_language(
        &mut self,
        document: &Handle,
        language: &LanguageCode,
    ) -> TranslationResult<TranslationStats> {
        if !self.translator.table().contains_language(language) {
            tracing::warn!("词表中没有语言 {}，页面文本将保持不变", language);
        }

        LanguagePreference::new(&self.store, self.config.default_language.clone())
            .set_preferred_language(language)
            .or_else(helpers::log_error)?;

        self.sync_language_select(document, language);
        Ok(self.translator.translate_page(document, language))
    }

    /// 切换深色模式，返回切换后的主题
    pub fn toggle_theme(&mut self, document: &Handle) -> TranslationResult<ThemeMode> {
        let mode = document_theme(document, &self.config.theme).toggled();

        apply_theme(document, &mut self.translator, &self.config.theme, mode);
        ThemePreference::new(&self.store)
            .set_mode(mode)
            .or_else(helpers::log_error)?;

        tracing::debug!("主题切换为 {}", mode);
        Ok(mode)
    }

    /// 把语言下拉框的选中项设为 `language`，返回是否找到对应选项
    fn sync_language_select(&self, document: &Handle, language: &LanguageCode) -> bool {
        let select = match find_element_by_id(document, &self.config.language_select_id) {
            Some(select) => select,
            None => {
                tracing::debug!("未找到语言下拉框 #{}", self.config.language_select_id);
                return false;
            }
        };

        let options = match SelectorList::parse("option") {
            Ok(selectors) => select_all(&select, &selectors),
            Err(_) => return false,
        };

        let is_language = |option: &Handle| {
            get_node_attr(option, "value")
                .and_then(|value| LanguageCode::parse(&value).ok())
                .as_ref()
                == Some(language)
        };

        let matched = options.iter().any(|option| is_language(option));

        // 没有对应选项时保留原来的选中项
        if matched {
            for option in &options {
                set_node_attr(option, "selected", is_language(option).then(String::new));
            }
        }

        matched
    }
}
