use encoding_rs::Encoding;
use markup5ever_rcdom::RcDom;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::parsers::html::{get_charset, html_to_dom, serialize_document};
use crate::translation::{LanguageCode, LocalizerSession, PreferenceStore};

/// Represents errors that can occur while reading, parsing or writing a document
///
/// Localization itself never fails once a session is built; this error type
/// covers the IO and encoding edges around it.
#[derive(Debug)]
pub struct DocumentError {
    details: String,
}

impl DocumentError {
    /// Creates a new DocumentError with the given message
    pub fn new(msg: &str) -> DocumentError {
        DocumentError {
            details: msg.to_string(),
        }
    }
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl Error for DocumentError {
    fn description(&self) -> &str {
        &self.details
    }
}

/// Options controlling how a single document is localized
#[derive(Default, Clone, Debug)]
pub struct LocalizeOptions {
    /// Language to select (and persist); `None` applies the stored preference
    pub language: Option<LanguageCode>,
    /// Input charset override; otherwise taken from the document's `<meta>`
    pub encoding: Option<String>,
    /// Flip the dark-mode preference after loading
    pub toggle_theme: bool,
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Localizes a document held in memory
///
/// Runs the page-load path of the session (stored theme and language), then
/// the user actions requested by `options`, and serializes the result in the
/// document's own charset.
pub fn localize_document<S: PreferenceStore>(
    session: &mut LocalizerSession<S>,
    input_data: &[u8],
    options: &LocalizeOptions,
) -> Result<Vec<u8>, DocumentError> {
    let encoding_validator = EncodingValidator::new();
    encoding_validator.validate_options(options)?;

    let encoding_processor = EncodingProcessor::new();
    let (dom, document_encoding) =
        encoding_processor.process_encoding(input_data, options.encoding.clone())?;

    let report = session.startup(&dom.document);
    tracing::debug!(
        "页面加载: 语言 {}, 主题 {:?}, 已翻译 {}",
        report.language,
        report.theme,
        report.stats.translated
    );

    if let Some(language) = &options.language {
        let stats = session.select_language(&dom.document, language)?;
        tracing::info!(
            "已切换到 {}: 翻译 {} 处，缺失 {} 处",
            language,
            stats.translated,
            stats.missing
        );
    }

    if options.toggle_theme {
        let mode = session.toggle_theme(&dom.document)?;
        tracing::info!("主题已切换为 {}", mode);
    }

    serialize_document(dom, &document_encoding)
}

/// Reads the input document from a path, or from stdin when the path is `-`
pub fn read_input(path: &str) -> Result<Vec<u8>, DocumentError> {
    if path == "-" {
        let mut data = Vec::new();
        io::stdin()
            .read_to_end(&mut data)
            .map_err(|e| DocumentError::new(&format!("unable to read stdin: {}", e)))?;
        return Ok(data);
    }

    let file_path = Path::new(path);
    if !file_path.is_file() {
        return Err(DocumentError::new(&format!("no such file: \"{}\"", path)));
    }

    fs::read(file_path)
        .map_err(|e| DocumentError::new(&format!("unable to read \"{}\": {}", path, e)))
}

/// Writes the result to a path, or to stdout when no path (or `-`) is given
pub fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), DocumentError> {
    use std::io::Write;

    match path {
        None | Some("-") => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(data)
                .and_then(|_| stdout.flush())
                .map_err(|e| DocumentError::new(&format!("unable to write stdout: {}", e)))
        }
        Some(path) => fs::write(path, data)
            .map_err(|e| DocumentError::new(&format!("unable to write \"{}\": {}", path, e))),
    }
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str, color: bool) {
    if color {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}

/// Prints an info message to stdout
pub fn print_info_message(msg: &str) {
    println!("{msg}");
}

/// 编码验证器
pub struct EncodingValidator;

impl EncodingValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_options(&self, options: &LocalizeOptions) -> Result<(), DocumentError> {
        if let Some(custom_encoding) = &options.encoding {
            if Encoding::for_label_no_replacement(custom_encoding.as_bytes()).is_none() {
                return Err(DocumentError::new(&format!(
                    "unknown encoding \"{}\"",
                    custom_encoding
                )));
            }
        }
        Ok(())
    }
}

impl Default for EncodingValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// 编码处理器
pub struct EncodingProcessor;

impl EncodingProcessor {
    pub fn new() -> Self {
        Self
    }

    /// 解析文档并确定其字符集
    ///
    /// An explicit encoding wins; otherwise a valid `<meta>` charset causes a
    /// second parse with that charset.
    pub fn process_encoding(
        &self,
        input_data: &[u8],
        input_encoding: Option<String>,
    ) -> Result<(RcDom, String), DocumentError> {
        if let Some(encoding) = input_encoding {
            let dom = html_to_dom(input_data, &encoding)?;
            return Ok((dom, encoding));
        }

        let mut document_encoding = "utf-8".to_string();
        let mut dom = html_to_dom(input_data, &document_encoding)?;

        if let Some(html_charset) = get_charset(&dom.document) {
            if let Some(document_charset) =
                Encoding::for_label_no_replacement(html_charset.as_bytes())
            {
                if document_charset != encoding_rs::UTF_8 {
                    document_encoding = html_charset;
                    dom = html_to_dom(input_data, document_charset.name())?;
                }
            }
        }

        Ok((dom, document_encoding))
    }
}

impl Default for EncodingProcessor {
    fn default() -> Self {
        Self::new()
    }
}
