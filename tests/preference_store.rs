//! 偏好存储集成测试
//!
//! 使用临时目录中的 redb 数据库验证语言和深色模式偏好的持久化

use pagelingo::parsers::html::{find_element_by_id, get_body, get_node_attr, has_class, text_content};
use pagelingo::translation::{
    LanguagePreference, LocalizerConfig, LocalizerSession, PreferenceStore, RedbPreferenceStore,
    ThemeMode,
};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{lang, HtmlTestHelper};

fn selected_option(document: &markup5ever_rcdom::Handle) -> Option<String> {
    HtmlTestHelper::find_all(document, "#ui-language-select option")
        .into_iter()
        .find(|option| get_node_attr(option, "selected").is_some())
        .and_then(|option| get_node_attr(&option, "value"))
}

#[test]
fn test_redb_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = RedbPreferenceStore::open(&dir.path().join("prefs.redb")).unwrap();

    assert_eq!(store.get("selectedLanguage").unwrap(), None);

    store.set("selectedLanguage", "hi").unwrap();
    store.set("selectedLanguage", "es").unwrap();
    assert_eq!(store.get("selectedLanguage").unwrap().as_deref(), Some("es"));
}

#[test]
fn test_store_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("prefs.redb");

    let store = RedbPreferenceStore::open(&path).unwrap();
    store.set("dark-mode", "enabled").unwrap();

    assert!(path.exists());
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn test_language_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.redb");

    {
        let store = RedbPreferenceStore::open(&path).unwrap();
        let preference = LanguagePreference::new(&store, lang("en"));
        assert_eq!(preference.preferred_language(), lang("en"));
        preference.set_preferred_language(&lang("de")).unwrap();
    }

    let store = RedbPreferenceStore::open(&path).unwrap();
    let preference = LanguagePreference::new(&store, lang("en"));
    assert_eq!(preference.preferred_language(), lang("de"));
}

#[test]
fn test_session_applies_stored_preferences_on_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.redb");

    {
        let dom = HtmlTestHelper::create_ocr_dom();
        let store = RedbPreferenceStore::open(&path).unwrap();
        let mut session = LocalizerSession::new(LocalizerConfig::default(), store).unwrap();

        session.startup(&dom.document);
        session.select_language(&dom.document, &lang("hi")).unwrap();
        assert_eq!(session.toggle_theme(&dom.document).unwrap(), ThemeMode::Dark);
    }

    // A fresh page load with the same database
    let dom = HtmlTestHelper::create_ocr_dom();
    let store = RedbPreferenceStore::open(&path).unwrap();
    let mut session = LocalizerSession::new(LocalizerConfig::default(), store).unwrap();

    let report = session.startup(&dom.document);
    assert_eq!(report.language, lang("hi"));
    assert_eq!(report.theme, Some(ThemeMode::Dark));

    let body = get_body(&dom.document).unwrap();
    assert!(has_class(&body, "dark-mode"));
    assert_eq!(selected_option(&dom.document).as_deref(), Some("hi"));

    let toggle = find_element_by_id(&dom.document, "theme-toggle").unwrap();
    assert_eq!(text_content(&toggle), "☀️ लाइट मोड");
    assert_eq!(HtmlTestHelper::text_of(&dom.document, "nav a"), "होम");
}

#[test]
fn test_theme_disabled_in_config() {
    let dir = tempfile::tempdir().unwrap();
    let store = RedbPreferenceStore::open(&dir.path().join("prefs.redb")).unwrap();
    store.set("dark-mode", "enabled").unwrap();

    let mut config = LocalizerConfig::default();
    config.theme.enabled = false;

    let dom = HtmlTestHelper::create_ocr_dom();
    let mut session = LocalizerSession::new(config, store).unwrap();
    let report = session.startup(&dom.document);

    assert_eq!(report.theme, None);
    assert!(!has_class(&get_body(&dom.document).unwrap(), "dark-mode"));
}

#[test]
fn test_corrupt_language_value_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let store = RedbPreferenceStore::open(&dir.path().join("prefs.redb")).unwrap();
    store.set("selectedLanguage", "<script>").unwrap();

    let mut config = LocalizerConfig::default();
    config.default_language = lang("es");

    let dom = HtmlTestHelper::create_ocr_dom();
    let mut session = LocalizerSession::new(config, store).unwrap();
    let report = session.startup(&dom.document);

    assert_eq!(report.language, lang("es"));
    assert_eq!(HtmlTestHelper::text_of(&dom.document, "nav a"), "Inicio");
}
