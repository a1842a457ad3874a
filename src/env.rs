//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问

use std::env;
use std::fmt;

use crate::translation::LanguageCode;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl EnvError {
    /// 变量是否已设置（区分“未设置”和“值无效”）
    pub fn is_set(&self) -> bool {
        env::var_os(&self.variable).is_some()
    }
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "PAGELINGO_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("warn".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid log level '{}'. Use: trace, debug, info, warn, error", value),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 本地化相关环境变量
pub mod localizer {
    use super::*;

    /// 没有保存偏好时使用的界面语言
    pub struct DefaultLanguage;
    impl EnvVar<LanguageCode> for DefaultLanguage {
        const NAME: &'static str = "PAGELINGO_LANGUAGE";
        const DEFAULT: Option<LanguageCode> = None;
        const DESCRIPTION: &'static str = "Default UI language when no preference is stored (e.g. en, hi, fr)";

        fn parse(value: &str) -> EnvResult<LanguageCode> {
            LanguageCode::parse(value).map_err(|e| EnvError {
                variable: Self::NAME.to_string(),
                message: e.to_string(),
            })
        }
    }

    /// 偏好数据库路径
    pub struct StorePath;
    impl EnvVar<String> for StorePath {
        const NAME: &'static str = "PAGELINGO_STORE_PATH";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path of the preference database (supports ~)";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME)
        }
    }

    /// 额外词表目录
    pub struct LocalesDir;
    impl EnvVar<String> for LocalesDir {
        const NAME: &'static str = "PAGELINGO_LOCALES_DIR";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Directory of extra locale tables (*.toml / *.json) overriding the bundled ones";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME)
        }
    }

    /// 配置文件路径
    pub struct ConfigPath;
    impl EnvVar<String> for ConfigPath {
        const NAME: &'static str = "PAGELINGO_CONFIG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Explicit configuration file, skips the search path";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME)
        }
    }

    /// 深色模式功能开关
    pub struct ThemeEnabled;
    impl EnvVar<bool> for ThemeEnabled {
        const NAME: &'static str = "PAGELINGO_THEME";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Apply the stored dark-mode preference to pages";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled", value),
        }),
    }
}

fn non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value must not be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!("- `{}`: {} (default: \"warn\")\n",
        core::LogLevel::NAME, core::LogLevel::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n",
        core::NoColor::NAME, core::NoColor::DESCRIPTION, core::NoColor::DEFAULT));

    docs.push_str("\n## Localization Configuration\n\n");
    docs.push_str(&format!("- `{}`: {}\n",
        localizer::DefaultLanguage::NAME, localizer::DefaultLanguage::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n",
        localizer::StorePath::NAME, localizer::StorePath::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n",
        localizer::LocalesDir::NAME, localizer::LocalesDir::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n",
        localizer::ConfigPath::NAME, localizer::ConfigPath::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n",
        localizer::ThemeEnabled::NAME, localizer::ThemeEnabled::DESCRIPTION, localizer::ThemeEnabled::DEFAULT));

    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(core::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert!(core::LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn test_boolean_parsing() {
        assert!(localizer::ThemeEnabled::parse("true").unwrap());
        assert!(localizer::ThemeEnabled::parse("enabled").unwrap());
        assert!(localizer::ThemeEnabled::parse("ON").unwrap());

        assert!(!localizer::ThemeEnabled::parse("0").unwrap());
        assert!(!localizer::ThemeEnabled::parse("disabled").unwrap());

        assert!(localizer::ThemeEnabled::parse("maybe").is_err());
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!(localizer::DefaultLanguage::parse("FR").unwrap().as_str(), "fr");
        assert!(localizer::DefaultLanguage::parse("french!").is_err());
    }

    #[test]
    fn test_path_parsing() {
        assert_eq!(localizer::StorePath::parse(" ~/prefs.redb ").unwrap(), "~/prefs.redb");
        assert!(localizer::LocalesDir::parse("   ").is_err());
    }

    #[test]
    fn test_unset_variable() {
        let error = localizer::ConfigPath::get().err();
        if env::var_os(localizer::ConfigPath::NAME).is_none() {
            let error = error.unwrap();
            assert!(!error.is_set());
        }
    }

    #[test]
    fn test_env_docs_mention_all_variables() {
        let docs = generate_env_docs();
        for name in [
            "PAGELINGO_LOG_LEVEL",
            "NO_COLOR",
            "PAGELINGO_LANGUAGE",
            "PAGELINGO_STORE_PATH",
            "PAGELINGO_LOCALES_DIR",
            "PAGELINGO_CONFIG",
            "PAGELINGO_THEME",
        ] {
            assert!(docs.contains(name), "missing {}", name);
        }
    }
}
