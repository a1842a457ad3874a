//! 界面本地化模块
//!
//! 把静态页面的界面文本翻译成用户选择的语言：
//! - **table**: 按语言组织的词表（键为规范化的英文原文）
//! - **normalize**: 空白规范化
//! - **groups**: 选择器组及其文本提取方式
//! - **engine**: 页面翻译引擎
//! - **storage**: 元素原文缓存和偏好存储
//! - **session**: 组合翻译器、偏好和页面控件
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use pagelingo::parsers::html_to_dom;
//! use pagelingo::translation::{LanguageCode, LocalizerConfig, LocalizerSession, MemoryPreferenceStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dom = html_to_dom(b"<h1>Home</h1>", "utf-8")?;
//! let mut session = LocalizerSession::new(LocalizerConfig::default(), MemoryPreferenceStore::new())?;
//!
//! session.startup(&dom.document);
//! session.select_language(&dom.document, &LanguageCode::parse("hi")?)?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// 子模块声明
// ============================================================================

/// 配置管理模块
///
/// 提供配置文件加载、环境变量覆盖和常量
pub mod config;

/// 页面翻译引擎
pub mod engine;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 选择器组与提取方式
pub mod groups;

pub mod language;
pub mod normalize;

/// 会话：页面加载与用户操作入口
pub mod session;

/// 存储管理模块 - 原文缓存和持久化偏好
pub mod storage;

/// 词表
pub mod table;

/// 深色模式
pub mod theme;

// ============================================================================
// 核心API导出
// ============================================================================

pub use config::{constants, ConfigManager, LocalizerConfig, ThemeConfig};
pub use engine::{PageTranslator, TranslationStats, TranslatorState};
pub use error::{ErrorCategory, ErrorSeverity, TranslationError, TranslationResult};
pub use groups::{ExtractionMode, SelectorGroup, SelectorGroupConfig};
pub use language::LanguageCode;
pub use normalize::normalize;
pub use session::{LocalizerSession, StartupReport};
pub use storage::{
    CacheStats, LanguagePreference, MemoryPreferenceStore, OriginalTextCache, PreferenceStore,
    RedbPreferenceStore,
};
pub use table::{Locale, TranslationTable};
pub use theme::{ThemeMode, ThemePreference};

// ============================================================================
// 便利函数
// ============================================================================

/// 使用打包词表和内置选择器组创建翻译器
///
/// # Examples
///
/// ```rust
/// use pagelingo::parsers::html_to_dom;
/// use pagelingo::translation::{default_translator, LanguageCode};
///
/// let dom = html_to_dom(b"<nav><ul><li><a>Home</a></li></ul></nav>", "utf-8").unwrap();
/// let mut translator = default_translator().unwrap();
///
/// translator.translate_page(&dom.document, &LanguageCode::parse("es").unwrap());
/// ```
pub fn default_translator() -> TranslationResult<PageTranslator> {
    let table = std::sync::Arc::new(TranslationTable::bundled()?);
    PageTranslator::with_default_groups(table)
}
