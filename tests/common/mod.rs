// 集成测试公共模块
//
// 提供测试页面、小型词表和断言辅助

use std::sync::Arc;

use markup5ever_rcdom::{Handle, RcDom};

use pagelingo::parsers::html::{inner_html, text_content};
use pagelingo::parsers::{html_to_dom, select_all, SelectorList};
use pagelingo::translation::{
    ExtractionMode, LanguageCode, Locale, PageTranslator, SelectorGroup, TranslationTable,
};

/// HTML 测试辅助
pub struct HtmlTestHelper;

impl HtmlTestHelper {
    /// 创建测试用的DOM结构
    pub fn create_test_dom(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8").unwrap()
    }

    /// 与 OCR 站点结构一致的页面
    pub fn create_ocr_page() -> String {
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Image to Text Converter</title>
</head>
<body>
    <nav>
        <ul>
            <li><a href="/">Home</a></li>
            <li><a href="/api">API</a></li>
            <li><a href="/pricing">Pricing</a></li>
        </ul>
    </nav>
    <label for="ui-language-select"><span>  Select
        Language </span></label>
    <select id="ui-language-select">
        <option value="en">English</option>
        <option value="hi">हिन्दी</option>
        <option value="es">Español</option>
        <option value="fr">Français</option>
        <option value="de">Deutsch</option>
    </select>
    <button id="theme-toggle">🌙 Dark Mode</button>
    <section class="image-text-converter">
        <h1>Image to Text Converter</h1>
        <p>Upload an image (JPG, PNG) or PDF to extract text.</p>
        <button>Extract Text</button>
    </section>
    <div class="steps-container">
        <h2>How to Convert an Image to Text Online?</h2>
        <p>Click the 'Upload' button to select an image (JPG, PNG, BMP) or a PDF file from your device.</p>
    </div>
    <section class="faq">
        <h2 class="section-title">Frequently Asked Questions (FAQs)</h2>
        <div class="faq-item">
            <div class="faq-question">1. Is OCR technology accurate?<span class="fimg">+</span></div>
            <div class="faq-answer">OCR technology can recognize handwritten text, but accuracy depends on the clarity and neatness of the handwriting.</div>
        </div>
    </section>
    <footer>
        <div class="footer-section"><ul><li><a href="/terms">Terms of Service</a></li></ul></div>
        <p>© 2024 Online OCR. All rights reserved.</p>
    </footer>
</body>
</html>"#
            .to_string()
    }

    pub fn create_ocr_dom() -> RcDom {
        Self::create_test_dom(&Self::create_ocr_page())
    }

    /// 按选择器查找第一个元素
    pub fn find(document: &Handle, selector: &str) -> Handle {
        Self::find_all(document, selector)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no element matches {:?}", selector))
    }

    pub fn find_all(document: &Handle, selector: &str) -> Vec<Handle> {
        select_all(document, &SelectorList::parse(selector).unwrap())
    }

    pub fn text_of(document: &Handle, selector: &str) -> String {
        text_content(&Self::find(document, selector))
    }

    pub fn html_of(document: &Handle, selector: &str) -> String {
        inner_html(&Self::find(document, selector))
    }
}

/// 测试词表构建器
pub struct TestTableBuilder {
    table: TranslationTable,
}

impl TestTableBuilder {
    pub fn new() -> Self {
        Self {
            table: TranslationTable::new(),
        }
    }

    pub fn with_locale(mut self, code: &str, entries: &[(&str, &str)]) -> Self {
        let locale = Locale::new(lang(code), None, entries.iter().copied()).unwrap();
        self.table.insert_locale(locale);
        self
    }

    pub fn build(self) -> Arc<TranslationTable> {
        Arc::new(self.table)
    }
}

/// 小型多语言词表：en 为恒等映射，de 缺少 "Pricing"
pub fn small_table() -> Arc<TranslationTable> {
    TestTableBuilder::new()
        .with_locale("en", &[("Home", "Home"), ("Pricing", "Pricing"), ("Select Language", "Select Language")])
        .with_locale("hi", &[("Home", "होम"), ("Pricing", "मूल्य निर्धारण"), ("Select Language", "भाषा चुनें")])
        .with_locale("de", &[("Home", "Startseite"), ("Select Language", "Sprache auswählen")])
        .build()
}

pub fn lang(code: &str) -> LanguageCode {
    LanguageCode::parse(code).unwrap()
}

pub fn plain_group(selector: &str) -> SelectorGroup {
    SelectorGroup::new(selector, ExtractionMode::PlainText).unwrap()
}

pub fn small_translator() -> PageTranslator {
    PageTranslator::new(small_table(), vec![plain_group("nav ul li a"), plain_group("label span")])
}
