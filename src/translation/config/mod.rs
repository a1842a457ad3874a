//! 本地化配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, LocalizerConfig, ThemeConfig};

/// 配置常量
pub mod constants {
    /// 默认界面语言
    pub const DEFAULT_LANGUAGE: &str = "en";

    /// 偏好存储中的键
    pub const LANGUAGE_PREFERENCE_KEY: &str = "selectedLanguage";
    pub const THEME_PREFERENCE_KEY: &str = "dark-mode";

    /// 深色模式偏好的取值
    pub const THEME_ENABLED: &str = "enabled";
    pub const THEME_DISABLED: &str = "disabled";

    /// 页面结构
    pub const LANGUAGE_SELECT_ID: &str = "ui-language-select";
    pub const DARK_MODE_CLASS: &str = "dark-mode";
    pub const THEME_TOGGLE_IDS: &[&str] = &["theme-toggle", "modal-theme-toggle"];
    pub const LIGHT_MODE_LABEL: &str = "☀️ Light Mode";
    pub const DARK_MODE_LABEL: &str = "🌙 Dark Mode";

    /// 偏好数据库文件名
    pub const STORE_FILE_NAME: &str = "preferences.redb";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "pagelingo.toml",
        ".pagelingo.toml",
        "pagelingo.json",
        "~/.config/pagelingo/config.toml",
        "/etc/pagelingo/config.toml",
    ];
}
