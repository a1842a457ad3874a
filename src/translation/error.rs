//! 本地化模块统一错误处理
//!
//! 翻译过程本身不会失败（缺失的词条会被静默跳过），
//! 错误只出现在边界上：配置、词表加载、选择器解析和偏好存储。

use std::fmt;

use thiserror::Error;

use crate::core::DocumentError;

/// 本地化错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 词表加载错误
    #[error("词表错误: {0}")]
    TableError(String),

    /// 同一语言内规范化后出现重复的键
    #[error("语言 '{language}' 中存在重复的键: {key:?}")]
    DuplicateKey { language: String, key: String },

    /// 语言代码无效
    #[error("无效的语言代码: {0:?}")]
    InvalidLanguage(String),

    /// 选择器解析错误
    #[error("选择器解析错误: {0}")]
    SelectorError(String),

    /// 偏好存储错误
    #[error("偏好存储错误: {0}")]
    StorageError(String),

    /// 文档处理错误
    #[error("文档错误: {0}")]
    DocumentError(String),

    /// 解析错误
    #[error("解析错误: {0}")]
    ParseError(String),

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(String),
}

impl TranslationError {
    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::TableError(_) => ErrorSeverity::Critical,
            TranslationError::DuplicateKey { .. } => ErrorSeverity::Error,
            TranslationError::InvalidLanguage(_) => ErrorSeverity::Info,
            TranslationError::SelectorError(_) => ErrorSeverity::Error,
            TranslationError::StorageError(_) => ErrorSeverity::Warning,
            TranslationError::DocumentError(_) => ErrorSeverity::Error,
            TranslationError::ParseError(_) => ErrorSeverity::Error,
            TranslationError::IoError(_) => ErrorSeverity::Error,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::TableError(_) | TranslationError::DuplicateKey { .. } => {
                ErrorCategory::Table
            }
            TranslationError::InvalidLanguage(_) => ErrorCategory::Input,
            TranslationError::SelectorError(_) => ErrorCategory::Selector,
            TranslationError::StorageError(_) => ErrorCategory::Storage,
            TranslationError::DocumentError(_) => ErrorCategory::Document,
            TranslationError::ParseError(_) => ErrorCategory::Parsing,
            TranslationError::IoError(_) => ErrorCategory::Io,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(self, context: T) -> Self {
        let new_msg = |msg: String| format!("{} (上下文: {})", msg, context);

        match self {
            TranslationError::ConfigError(msg) => TranslationError::ConfigError(new_msg(msg)),
            TranslationError::TableError(msg) => TranslationError::TableError(new_msg(msg)),
            TranslationError::SelectorError(msg) => TranslationError::SelectorError(new_msg(msg)),
            TranslationError::StorageError(msg) => TranslationError::StorageError(new_msg(msg)),
            TranslationError::DocumentError(msg) => TranslationError::DocumentError(new_msg(msg)),
            TranslationError::ParseError(msg) => TranslationError::ParseError(new_msg(msg)),
            TranslationError::IoError(msg) => TranslationError::IoError(new_msg(msg)),
            other @ (TranslationError::DuplicateKey { .. }
            | TranslationError::InvalidLanguage(_)) => other,
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Table,
    Input,
    Selector,
    Storage,
    Document,
    Parsing,
    Io,
}

impl From<DocumentError> for TranslationError {
    fn from(error: DocumentError) -> Self {
        TranslationError::DocumentError(error.to_string())
    }
}

impl From<TranslationError> for DocumentError {
    fn from(error: TranslationError) -> Self {
        DocumentError::new(&error.to_string())
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::ParseError(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ParseError(format!("TOML解析错误: {}", error))
    }
}

macro_rules! storage_error_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for TranslationError {
                fn from(error: $ty) -> Self {
                    TranslationError::StorageError(error.to_string())
                }
            }
        )+
    };
}

storage_error_from!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误并原样返回
    pub fn log_error<T>(error: TranslationError) -> TranslationResult<T> {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("本地化信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("本地化警告: {}", error),
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                tracing::error!("本地化错误: {}", error)
            }
        }

        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_and_category() {
        let err = TranslationError::ConfigError("bad".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let err = TranslationError::DuplicateKey {
            language: "fr".to_string(),
            key: "Home".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Table);
    }

    #[test]
    fn test_with_context_keeps_variant() {
        let err = TranslationError::StorageError("locked".to_string()).with_context("prefs.redb");
        match err {
            TranslationError::StorageError(msg) => {
                assert!(msg.contains("locked"));
                assert!(msg.contains("prefs.redb"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_document_error_round_trip() {
        let err: TranslationError = DocumentError::new("broken charset").into();
        let back: DocumentError = err.into();
        assert!(back.to_string().contains("broken charset"));
    }
}
