//! 页面翻译引擎
//!
//! 按选择器组的顺序遍历文档，对每个匹配元素取其原文（首次访问时缓存），
//! 在词表中查找目标语言的译文并按组的提取方式写回。
//!
//! ## 工作流程
//! 1. 清除已脱离文档的缓存条目
//! 2. 对每个选择器组重新查询文档
//! 3. 取元素原文（缓存优先），查表
//! 4. 命中则写回译文，未命中则保持元素现状

use std::sync::Arc;

use markup5ever_rcdom::Handle;

use super::config::LocalizerConfig;
use super::error::TranslationResult;
use super::groups::{build_groups, default_group_configs, ExtractionMode, SelectorGroup};
use super::language::LanguageCode;
use super::normalize::normalize;
use super::storage::{CacheStats, OriginalTextCache};
use super::table::TranslationTable;
use crate::parsers::html::select_all;

/// 单次翻译的统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranslationStats {
    /// 所有组匹配到的元素次数（同一元素被多个组匹配时重复计数）
    pub matched: usize,
    pub translated: usize,
    /// 词表中没有对应译文
    pub missing: usize,
    /// 原文为空，跳过
    pub empty: usize,
    /// 本次开始前清除的失效缓存条目
    pub purged: usize,
}

/// 引擎的可变状态
#[derive(Debug, Default)]
pub struct TranslatorState {
    current_language: Option<LanguageCode>,
    originals: OriginalTextCache,
}

impl TranslatorState {
    pub fn current_language(&self) -> Option<&LanguageCode> {
        self.current_language.as_ref()
    }

    pub fn originals(&self) -> &OriginalTextCache {
        &self.originals
    }
}

/// 页面翻译器
///
/// 词表通过 `Arc` 注入且只读，可在多个翻译器之间共享；每个翻译器拥有自己的
/// 状态，并且只应用于一个文档。
pub struct PageTranslator {
    table: Arc<TranslationTable>,
    groups: Vec<SelectorGroup>,
    state: TranslatorState,
}

impl PageTranslator {
    pub fn new(table: Arc<TranslationTable>, groups: Vec<SelectorGroup>) -> Self {
        Self {
            table,
            groups,
            state: TranslatorState::default(),
        }
    }

    /// 使用内置选择器组
    pub fn with_default_groups(table: Arc<TranslationTable>) -> TranslationResult<Self> {
        let groups = build_groups(&default_group_configs())?;
        Ok(Self::new(table, groups))
    }

    /// 根据配置构建词表和选择器组
    pub fn from_config(config: &LocalizerConfig) -> TranslationResult<Self> {
        let table = Arc::new(config.build_table()?);
        let groups = config.build_groups()?;
        Ok(Self::new(table, groups))
    }

    pub fn table(&self) -> &Arc<TranslationTable> {
        &self.table
    }

    pub fn groups(&self) -> &[SelectorGroup] {
        &self.groups
    }

    pub fn state(&self) -> &TranslatorState {
        &self.state
    }

    /// 最近一次翻译使用的语言
    pub fn current_language(&self) -> Option<&LanguageCode> {
        self.state.current_language.as_ref()
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.state.originals.stats()
    }

    /// 元素的原文（规范化后）
    pub fn original_text(&mut self, element: &Handle, mode: ExtractionMode) -> String {
        self.state.originals.original_text(element, mode).text.clone()
    }

    /// 将文档翻译为指定语言
    pub fn translate_page(&mut self, document: &Handle, language: &LanguageCode) -> TranslationStats {
        let mut stats = TranslationStats {
            purged: self.state.originals.purge_detached(),
            ..Default::default()
        };

        if !self.table.contains_language(language) {
            tracing::debug!("词表中没有语言 {}，所有元素保持现状", language);
        }

        for group in &self.groups {
            let elements = select_all(document, group.selectors());
            tracing::trace!("选择器 {:?} 匹配 {} 个元素", group.selectors().as_str(), elements.len());

            for element in &elements {
                stats.matched += 1;
                let mode = group.mode();

                let entry = self.state.originals.original_text(element, mode);
                if entry.mode != mode {
                    tracing::debug!(
                        "元素原文以 {} 方式缓存，按 {} 方式写回",
                        entry.mode,
                        mode
                    );
                }

                if entry.text.is_empty() {
                    stats.empty += 1;
                    continue;
                }

                match self.table.lookup(language, &entry.text) {
                    Some(translated) => {
                        mode.write(element, translated);
                        stats.translated += 1;
                    }
                    None => {
                        tracing::trace!("缺少译文 [{}] {:?}", language, entry.text);
                        stats.missing += 1;
                    }
                }
            }
        }

        tracing::debug!(
            "翻译完成 [{}]: 匹配 {}, 已翻译 {}, 缺失 {}, 空白 {}",
            language,
            stats.matched,
            stats.translated,
            stats.missing,
            stats.empty
        );

        self.state.current_language = Some(language.clone());
        stats
    }

    /// 由程序本身更新元素的源文本（例如主题按钮标签）
    ///
    /// 新文本成为该元素的原文，并立即按当前语言写出；没有当前语言或词表缺少
    /// 译文时写出源文本本身。
    pub fn relabel(&mut self, element: &Handle, source_text: &str, mode: ExtractionMode) {
        self.state.originals.replace_original(element, source_text, mode);

        let translated = self
            .state
            .current_language
            .as_ref()
            .and_then(|language| self.table.lookup(language, &normalize(source_text)));

        match translated {
            Some(text) => mode.write(element, text),
            None => mode.write(element, source_text),
        }
    }
}
