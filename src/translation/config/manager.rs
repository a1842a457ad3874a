//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::groups::{build_groups, default_group_configs, SelectorGroup, SelectorGroupConfig};
use crate::translation::language::LanguageCode;
use crate::translation::table::TranslationTable;

/// 深色模式相关的页面结构
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub enabled: bool,
    pub body_class: String,
    pub toggle_ids: Vec<String>,
    pub light_label: String,
    pub dark_label: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            body_class: constants::DARK_MODE_CLASS.to_string(),
            toggle_ids: constants::THEME_TOGGLE_IDS.iter().map(|s| s.to_string()).collect(),
            light_label: constants::LIGHT_MODE_LABEL.to_string(),
            dark_label: constants::DARK_MODE_LABEL.to_string(),
        }
    }
}

/// 本地化配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalizerConfig {
    pub default_language: LanguageCode,
    /// 偏好数据库路径，支持 `~`
    pub store_path: Option<String>,
    /// 额外词表目录，其中的词条覆盖打包词表
    pub locales_dir: Option<String>,
    pub language_select_id: String,
    pub theme: ThemeConfig,
    pub selector_groups: Vec<SelectorGroupConfig>,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            default_language: LanguageCode::default(),
            store_path: None,
            locales_dir: None,
            language_select_id: constants::LANGUAGE_SELECT_ID.to_string(),
            theme: ThemeConfig::default(),
            selector_groups: default_group_configs(),
        }
    }
}

impl LocalizerConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.selector_groups.is_empty() {
            return Err(TranslationError::ConfigError("选择器组不能为空".to_string()));
        }

        if self.language_select_id.trim().is_empty() {
            return Err(TranslationError::ConfigError("语言下拉框ID不能为空".to_string()));
        }

        if self.theme.enabled && self.theme.body_class.trim().is_empty() {
            return Err(TranslationError::ConfigError("深色模式 class 不能为空".to_string()));
        }

        self.build_groups().map_err(|e| e.with_context("selector_groups"))?;

        Ok(())
    }

    /// 应用环境变量覆盖（使用类型安全环境变量系统）
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{localizer, EnvVar};

        match localizer::DefaultLanguage::get() {
            Ok(language) => {
                tracing::info!("环境变量覆盖默认语言: {}", language);
                self.default_language = language;
            }
            Err(e) if e.is_set() => tracing::warn!("{}", e),
            Err(_) => {}
        }

        if let Ok(path) = localizer::StorePath::get() {
            self.store_path = Some(path);
        }

        if let Ok(dir) = localizer::LocalesDir::get() {
            self.locales_dir = Some(dir);
        }

        if std::env::var_os(localizer::ThemeEnabled::NAME).is_some() {
            match localizer::ThemeEnabled::get() {
                Ok(enabled) => self.theme.enabled = enabled,
                Err(e) => tracing::warn!("{}", e),
            }
        }
    }

    /// 偏好数据库的实际路径
    pub fn resolved_store_path(&self) -> PathBuf {
        if let Some(path) = &self.store_path {
            return PathBuf::from(shellexpand::tilde(path).as_ref());
        }

        match ProjectDirs::from("", "", "pagelingo") {
            Some(dirs) => dirs.data_dir().join(constants::STORE_FILE_NAME),
            None => PathBuf::from(".pagelingo").join(constants::STORE_FILE_NAME),
        }
    }

    /// 构建词表：打包词表 + 额外词表目录
    pub fn build_table(&self) -> TranslationResult<TranslationTable> {
        let mut table = TranslationTable::bundled()?;

        if let Some(dir) = &self.locales_dir {
            let expanded = shellexpand::tilde(dir);
            table.load_dir(Path::new(expanded.as_ref()))?;
        }

        Ok(table)
    }

    pub fn build_groups(&self) -> TranslationResult<Vec<SelectorGroup>> {
        build_groups(&self.selector_groups)
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: LocalizerConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 搜索配置文件并创建配置管理器
    pub fn new() -> TranslationResult<Self> {
        Self::load_dotenv();

        let explicit = {
            use crate::env::{localizer, EnvVar};
            localizer::ConfigPath::get().ok()
        };

        let source = match explicit {
            Some(path) => Some(PathBuf::from(shellexpand::tilde(&path).as_ref())),
            None => Self::find_config_file(),
        };

        Self::build(source)
    }

    /// 从指定文件创建配置管理器
    pub fn from_path(path: &Path) -> TranslationResult<Self> {
        Self::load_dotenv();
        Self::build(Some(path.to_path_buf()))
    }

    fn build(source: Option<PathBuf>) -> TranslationResult<Self> {
        let mut config = match &source {
            Some(path) => {
                tracing::info!("加载配置文件: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                tracing::info!("未找到配置文件，使用默认配置");
                LocalizerConfig::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config, source })
    }

    /// 获取配置
    pub fn get_config(&self) -> &LocalizerConfig {
        &self.config
    }

    pub fn into_config(self) -> LocalizerConfig {
        self.config
    }

    /// 实际加载的配置文件
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn find_config_file() -> Option<PathBuf> {
        constants::CONFIG_PATHS
            .iter()
            .map(|path| PathBuf::from(shellexpand::tilde(path).as_ref()))
            .find(|path| path.exists())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &Path) -> TranslationResult<LocalizerConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() {
                match dotenv::from_filename(env_file) {
                    Ok(_) => {
                        tracing::info!("已加载环境变量文件: {}", env_file);
                        break;
                    }
                    Err(e) => tracing::warn!("无法加载环境变量文件 {}: {}", env_file, e),
                }
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &Path) -> TranslationResult<()> {
        let content = Self::example_config()?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 默认配置的 TOML 文本
    pub fn example_config() -> TranslationResult<String> {
        toml::to_string_pretty(&LocalizerConfig::default())
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))
    }
}
