//! 翻译词表
//!
//! `LanguageCode → (规范化源字符串 → 译文)` 的映射。词表在启动时加载一次，
//! 之后以 `Arc<TranslationTable>` 的形式注入各个翻译器，不再修改。
//!
//! 词表文件格式（TOML，JSON 结构相同）：
//!
//! ```toml
//! language = "hi"
//! name = "हिन्दी"
//!
//! [strings]
//! "Home" = "होम"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::{TranslationError, TranslationResult};
use super::language::LanguageCode;
use super::normalize::normalize;

/// 随程序打包的词表
const BUNDLED_LOCALES: &[(&str, &str)] = &[
    ("en.toml", include_str!("../../locales/en.toml")),
    ("hi.toml", include_str!("../../locales/hi.toml")),
    ("es.toml", include_str!("../../locales/es.toml")),
    ("fr.toml", include_str!("../../locales/fr.toml")),
    ("de.toml", include_str!("../../locales/de.toml")),
];

#[derive(Debug, Deserialize)]
struct LocaleFile {
    language: LanguageCode,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    strings: HashMap<String, String>,
}

/// 单一语言的词条
#[derive(Debug, Clone)]
pub struct Locale {
    code: LanguageCode,
    name: String,
    strings: HashMap<String, String>,
}

impl Locale {
    /// 创建词条集合，键在插入前规范化
    pub fn new<I, K, V>(code: LanguageCode, name: Option<String>, entries: I) -> TranslationResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut strings = HashMap::new();

        for (key, value) in entries {
            let normalized = normalize(key.as_ref());

            if normalized.is_empty() {
                return Err(TranslationError::TableError(format!(
                    "语言 '{}' 中存在空白键",
                    code
                )));
            }

            if strings.insert(normalized.clone(), value.into()).is_some() {
                return Err(TranslationError::DuplicateKey {
                    language: code.to_string(),
                    key: normalized,
                });
            }
        }

        Ok(Self {
            name: name.unwrap_or_else(|| code.to_string()),
            code,
            strings,
        })
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> TranslationResult<Self> {
        let file: LocaleFile = toml::from_str(content)?;
        Self::new(file.language, file.name, file.strings)
    }

    /// 从 JSON 文本解析
    pub fn from_json_str(content: &str) -> TranslationResult<Self> {
        let file: LocaleFile = serde_json::from_str(content)?;
        Self::new(file.language, file.name, file.strings)
    }

    /// 从文件加载，按扩展名选择格式
    pub fn load(path: &Path) -> TranslationResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| TranslationError::TableError(format!("读取词表失败 {}: {}", path.display(), e)))?;

        let locale = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        };

        locale.map_err(|e| e.with_context(path.display()))
    }

    pub fn code(&self) -> &LanguageCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }
}

/// 全部语言的词表
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    locales: HashMap<LanguageCode, Locale>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载打包的 en/hi/es/fr/de 词表
    pub fn bundled() -> TranslationResult<Self> {
        let mut table = Self::new();

        for (file_name, content) in BUNDLED_LOCALES {
            let locale = Locale::from_toml_str(content).map_err(|e| e.with_context(file_name))?;
            table.insert_locale(locale);
        }

        Ok(table)
    }

    /// 加载目录中的全部 `.toml`/`.json` 词表，覆盖同名语言中的相同键
    pub fn load_dir(&mut self, dir: &Path) -> TranslationResult<usize> {
        let entries = fs::read_dir(dir)
            .map_err(|e| TranslationError::TableError(format!("读取词表目录失败 {}: {}", dir.display(), e)))?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("toml") | Some("json")
                )
            })
            .collect();
        paths.sort();

        for path in &paths {
            let locale = Locale::load(path)?;
            tracing::info!(
                "加载词表 {} ({} 条): {}",
                locale.code(),
                locale.len(),
                path.display()
            );
            self.insert_locale(locale);
        }

        Ok(paths.len())
    }

    /// 插入一种语言；若已存在则合并，新词条优先
    pub fn insert_locale(&mut self, locale: Locale) {
        match self.locales.get_mut(&locale.code) {
            Some(existing) => {
                if locale.name != locale.code.as_str() {
                    existing.name = locale.name;
                }
                existing.strings.extend(locale.strings);
            }
            None => {
                self.locales.insert(locale.code.clone(), locale);
            }
        }
    }

    /// 查找译文；`key` 必须已规范化
    pub fn lookup(&self, language: &LanguageCode, key: &str) -> Option<&str> {
        self.locales.get(language).and_then(|locale| locale.get(key))
    }

    pub fn locale(&self, language: &LanguageCode) -> Option<&Locale> {
        self.locales.get(language)
    }

    pub fn contains_language(&self, language: &LanguageCode) -> bool {
        self.locales.contains_key(language)
    }

    /// 按代码排序的全部语言
    pub fn languages(&self) -> Vec<&LanguageCode> {
        let mut languages: Vec<_> = self.locales.keys().collect();
        languages.sort();
        languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(value: &str) -> LanguageCode {
        LanguageCode::parse(value).unwrap()
    }

    #[test]
    fn test_bundled_tables_load() {
        let table = TranslationTable::bundled().unwrap();

        for lang in ["en", "hi", "es", "fr", "de"] {
            assert!(table.contains_language(&code(lang)), "missing bundled locale {}", lang);
        }
        assert_eq!(table.lookup(&code("hi"), "Home"), Some("होम"));
        assert_eq!(table.lookup(&code("en"), "Home"), Some("Home"));
        assert_eq!(table.locale(&code("fr")).unwrap().name(), "Français");
    }

    #[test]
    fn test_keys_are_normalized() {
        let locale = Locale::new(code("fr"), None, [("  Select \n Language ", "Sélectionnez la langue")])
            .unwrap();
        assert_eq!(locale.get("Select Language"), Some("Sélectionnez la langue"));
        assert_eq!(locale.name(), "fr");
    }

    #[test]
    fn test_duplicate_after_normalization_is_rejected() {
        let result = Locale::new(code("de"), None, [("Home", "Startseite"), ("Home ", "Start")]);
        assert!(matches!(result, Err(TranslationError::DuplicateKey { .. })));
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let result = Locale::new(code("de"), None, [("   ", "leer")]);
        assert!(matches!(result, Err(TranslationError::TableError(_))));
    }

    #[test]
    fn test_merge_overrides_entries() {
        let mut table = TranslationTable::new();
        table.insert_locale(Locale::new(code("es"), Some("Español".to_string()), [("Home", "Inicio"), ("Copy", "Copiar")]).unwrap());
        table.insert_locale(Locale::new(code("es"), None, [("Home", "Portada")]).unwrap());

        let es = code("es");
        assert_eq!(table.lookup(&es, "Home"), Some("Portada"));
        assert_eq!(table.lookup(&es, "Copy"), Some("Copiar"));
        assert_eq!(table.locale(&es).unwrap().name(), "Español");
    }

    #[test]
    fn test_locale_from_json() {
        let locale = Locale::from_json_str(r#"{"language": "it", "strings": {"Home": "Pagina iniziale"}}"#).unwrap();
        assert_eq!(locale.code().as_str(), "it");
        assert_eq!(locale.get("Home"), Some("Pagina iniziale"));
    }
}
