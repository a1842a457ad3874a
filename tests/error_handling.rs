//! 错误处理集成测试
//!
//! 错误只应出现在边界（配置、词表、选择器、文件），翻译过程本身从不失败

use std::fs;

use pagelingo::core::{localize_document, read_input, LocalizeOptions};
use pagelingo::translation::{
    default_translator, ConfigManager, ErrorCategory, ErrorSeverity, LanguageCode, Locale,
    LocalizerConfig, LocalizerSession, MemoryPreferenceStore, SelectorGroup, TranslationError,
    TranslationTable,
};
use pagelingo::translation::groups::ExtractionMode;

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{lang, HtmlTestHelper};

#[test]
fn test_malformed_html_never_fails_a_pass() {
    let cases = [
        "",
        "<html><head></head><body></body></html>",
        "<div>Unclosed div",
        "<html><>Invalid tag</>",
        "Plain text without HTML tags",
        "<script>alert('Home')</script>",
        "<!DOCTYPE html>",
        "<p><button>Home</p></button>",
    ];

    let mut translator = default_translator().unwrap();

    for html in cases {
        let dom = HtmlTestHelper::create_test_dom(html);
        let stats = translator.translate_page(&dom.document, &lang("hi"));
        assert!(stats.translated <= stats.matched, "case {:?}", html);
    }
}

#[test]
fn test_invalid_selectors_are_rejected() {
    for selector in ["", "p >", "div::before", "a:hover", "p > > q", "h1,,h2"] {
        let result = SelectorGroup::new(selector, ExtractionMode::PlainText);
        match result {
            Err(error @ TranslationError::SelectorError(_)) => {
                assert_eq!(error.category(), ErrorCategory::Selector);
            }
            other => panic!("selector {:?} should be rejected, got {:?}", selector, other.map(|_| ())),
        }
    }
}

#[test]
fn test_invalid_language_codes() {
    for value in ["", "english", "e", "en_US", "12", "fr-"] {
        let error = LanguageCode::parse(value).unwrap_err();
        assert!(matches!(error, TranslationError::InvalidLanguage(_)), "value {:?}", value);
        assert_eq!(error.severity(), ErrorSeverity::Info);
    }
}

#[test]
fn test_duplicate_keys_after_normalization() {
    let result = Locale::new(
        lang("fr"),
        None,
        [("Select Language", "Sélectionnez la langue"), ("Select   Language ", "Choisir")],
    );

    match result {
        Err(TranslationError::DuplicateKey { language, key }) => {
            assert_eq!(language, "fr");
            assert_eq!(key, "Select Language");
        }
        other => panic!("expected duplicate key error, got {:?}", other.map(|l| l.len())),
    }
}

#[test]
fn test_bad_locale_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("xx.toml"), "language = \"xx\"\n[strings\n").unwrap();

    let mut table = TranslationTable::new();
    let error = table.load_dir(dir.path()).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Parsing);
    assert!(error.to_string().contains("xx.toml"));

    let missing = dir.path().join("missing");
    let error = table.load_dir(&missing).unwrap_err();
    assert!(matches!(error, TranslationError::TableError(_)));
}

#[test]
fn test_locale_directory_overrides_bundled_strings() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("de.json"),
        r#"{ "language": "de", "strings": { "Pricing": "Preise", "Home": "Start" } }"#,
    )
    .unwrap();

    let mut config = LocalizerConfig::default();
    config.locales_dir = Some(dir.path().to_string_lossy().into_owned());

    let table = config.build_table().unwrap();
    assert_eq!(table.lookup(&lang("de"), "Home"), Some("Start"));
    assert_eq!(table.lookup(&lang("de"), "Pricing"), Some("Preise"));
    assert_eq!(table.lookup(&lang("de"), "API"), Some("API"));
    assert_eq!(table.locale(&lang("de")).unwrap().name(), "Deutsch");
}

#[test]
fn test_broken_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pagelingo.toml");

    fs::write(&path, "default_language = 42").unwrap();
    let error = ConfigManager::from_path(&path).err().unwrap();
    assert_eq!(error.category(), ErrorCategory::Configuration);

    fs::write(&path, "[[selector_groups]]\nselector = \"nav >\"\n").unwrap();
    let error = ConfigManager::from_path(&path).err().unwrap();
    assert!(matches!(error, TranslationError::SelectorError(_)));

    let error = ConfigManager::from_path(&dir.path().join("absent.toml")).err().unwrap();
    assert_eq!(error.severity(), ErrorSeverity::Critical);
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pagelingo.toml");

    ConfigManager::generate_example_config(&path).unwrap();
    let manager = ConfigManager::from_path(&path).unwrap();

    assert_eq!(manager.source(), Some(path.as_path()));
    assert_eq!(manager.get_config().selector_groups.len(), 11);
}

#[test]
fn test_document_edges() {
    assert!(read_input("/definitely/not/here.html").is_err());

    let mut session =
        LocalizerSession::new(LocalizerConfig::default(), MemoryPreferenceStore::new()).unwrap();
    let options = LocalizeOptions {
        encoding: Some("not-a-charset".to_string()),
        ..Default::default()
    };

    let error = localize_document(&mut session, b"<h1>Home</h1>", &options).unwrap_err();
    assert!(error.to_string().contains("not-a-charset"));
}

#[test]
fn test_error_context_keeps_variant() {
    let error = TranslationError::StorageError("database locked".to_string()).with_context("prefs.redb");
    assert!(matches!(error, TranslationError::StorageError(_)));
    assert!(error.to_string().contains("prefs.redb"));
    assert_eq!(error.severity(), ErrorSeverity::Warning);
}
