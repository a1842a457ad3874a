//! 偏好存储
//!
//! 持久化的键值存储，保存用户选择的界面语言和深色模式开关。
//! 磁盘实现基于 redb，测试与临时会话使用内存实现。

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use redb::{Database, TableDefinition, TableError};

use crate::translation::config::constants;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::language::LanguageCode;

const PREFERENCES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("preferences");

/// 键值偏好存储
pub trait PreferenceStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> TranslationResult<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        (**self).set(key, value)
    }
}

/// 基于 redb 的磁盘存储
pub struct RedbPreferenceStore {
    db: Database,
    path: PathBuf,
}

impl RedbPreferenceStore {
    /// 打开（或创建）数据库文件
    pub fn open(path: &Path) -> TranslationResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(path)
            .map_err(|e| TranslationError::from(e).with_context(path.display()))?;
        tracing::debug!("打开偏好数据库: {}", path.display());

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for RedbPreferenceStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(PREFERENCES_TABLE) {
            Ok(table) => table,
            // 尚未写入任何偏好
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PREFERENCES_TABLE)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }
}

/// 内存存储（不持久化）
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 界面语言偏好
pub struct LanguagePreference<'a, S: PreferenceStore + ?Sized> {
    store: &'a S,
    default_language: LanguageCode,
}

impl<'a, S: PreferenceStore + ?Sized> LanguagePreference<'a, S> {
    pub fn new(store: &'a S, default_language: LanguageCode) -> Self {
        Self {
            store,
            default_language,
        }
    }

    /// 读取保存的语言；未设置、无法读取或无法解析时返回默认语言
    pub fn preferred_language(&self) -> LanguageCode {
        match self.store.get(constants::LANGUAGE_PREFERENCE_KEY) {
            Ok(Some(value)) => match LanguageCode::parse(&value) {
                Ok(code) => code,
                Err(e) => {
                    tracing::warn!("忽略无效的语言偏好 {:?}: {}", value, e);
                    self.default_language.clone()
                }
            },
            Ok(None) => self.default_language.clone(),
            Err(e) => {
                tracing::warn!("读取语言偏好失败，使用默认语言: {}", e);
                self.default_language.clone()
            }
        }
    }

    pub fn set_preferred_language(&self, code: &LanguageCode) -> TranslationResult<()> {
        self.store.set(constants::LANGUAGE_PREFERENCE_KEY, code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(value: &str) -> LanguageCode {
        LanguageCode::parse(value).unwrap()
    }

    #[test]
    fn test_default_when_unset() {
        let store = MemoryPreferenceStore::new();
        let preference = LanguagePreference::new(&store, code("en"));
        assert_eq!(preference.preferred_language(), code("en"));
    }

    #[test]
    fn test_set_and_get() {
        let store = MemoryPreferenceStore::new();
        let preference = LanguagePreference::new(&store, code("en"));

        preference.set_preferred_language(&code("fr")).unwrap();
        assert_eq!(preference.preferred_language(), code("fr"));
        assert_eq!(store.get("selectedLanguage").unwrap().as_deref(), Some("fr"));
    }

    #[test]
    fn test_invalid_stored_value_falls_back() {
        let store = MemoryPreferenceStore::new();
        store.set(constants::LANGUAGE_PREFERENCE_KEY, "not a language").unwrap();

        let preference = LanguagePreference::new(&store, code("en"));
        assert_eq!(preference.preferred_language(), code("en"));
    }
}
