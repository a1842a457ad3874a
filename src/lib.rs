//! # pagelingo
//!
//! 在线 OCR 站点页面的界面本地化：按选择器组找到界面文本，记住每个元素的
//! 英文原文，从打包词表中查出目标语言的译文并写回页面。
//!
//! ## 模块组织
//!
//! - `core` - 文档读取、字符集处理和本地化入口
//! - `env` - 类型安全的环境变量
//! - `parsers` - HTML 解析、DOM 辅助函数和选择器
//! - `translation` - 词表、翻译引擎、原文缓存和偏好存储

pub mod core;
pub mod env;
pub mod parsers;
pub mod translation;

// Re-export commonly used items for convenience
pub use crate::core::*;
pub use crate::parsers::*;
pub use translation::{LanguageCode, LocalizerSession, PageTranslator, TranslationTable};
