use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::Level;

use pagelingo::core::{
    localize_document, print_error_message, print_info_message, read_input, write_output,
    LocalizeOptions,
};
use pagelingo::env::{self as pagelingo_env, EnvVar};
use pagelingo::translation::{
    ConfigManager, LanguageCode, LocalizerConfig, LocalizerSession, RedbPreferenceStore,
};

#[derive(Parser, Debug)]
#[command(
    name = "pagelingo",
    version,
    about = "Localize the UI text of OCR site pages from bundled translation tables"
)]
struct Cli {
    /// Page to localize, or "-" to read from stdin
    #[arg(required_unless_present_any = ["list_languages", "print_config"])]
    input: Option<String>,

    /// Select (and remember) the UI language, e.g. hi, es, fr, de
    #[arg(short, long)]
    language: Option<LanguageCode>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preference database to use instead of the configured one
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Charset of the input document
    #[arg(short = 'E', long)]
    encoding: Option<String>,

    /// Flip the dark-mode preference
    #[arg(long)]
    toggle_theme: bool,

    /// List the available languages and exit
    #[arg(long)]
    list_languages: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    let color = use_color();

    init_logging(&cli, color);

    if let Err(message) = run(cli) {
        print_error_message(&message, color);
        process::exit(1);
    }
}

fn use_color() -> bool {
    !pagelingo_env::core::NoColor::get_or_default(false) && atty::is(atty::Stream::Stderr)
}

fn init_logging(cli: &Cli, color: bool) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        pagelingo_env::core::LogLevel::get()
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(Level::WARN)
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<LocalizerConfig, String> {
    let manager = match path {
        Some(path) => ConfigManager::from_path(path),
        None => ConfigManager::new(),
    }
    .map_err(|e| e.to_string())?;

    Ok(manager.into_config())
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = load_config(cli.config.as_deref())?;

    if let Some(store) = &cli.store {
        config.store_path = Some(store.to_string_lossy().into_owned());
    }

    if cli.print_config {
        let content = toml::to_string_pretty(&config).map_err(|e| e.to_string())?;
        print_info_message(content.trim_end());
        return Ok(());
    }

    if cli.list_languages {
        let table = config.build_table().map_err(|e| e.to_string())?;
        for code in table.languages() {
            if let Some(locale) = table.locale(code) {
                print_info_message(&format!("{}\t{}\t{} strings", code, locale.name(), locale.len()));
            }
        }
        return Ok(());
    }

    let input = match cli.input.as_deref() {
        Some(input) => input,
        None => return Err("no input document given".to_string()),
    };

    let store = RedbPreferenceStore::open(&config.resolved_store_path()).map_err(|e| e.to_string())?;
    let mut session = LocalizerSession::new(config, store).map_err(|e| e.to_string())?;

    let options = LocalizeOptions {
        language: cli.language,
        encoding: cli.encoding,
        toggle_theme: cli.toggle_theme,
    };

    let data = read_input(input).map_err(|e| e.to_string())?;
    let result = localize_document(&mut session, &data, &options).map_err(|e| e.to_string())?;

    let stats = session.translator().cache_stats();
    tracing::debug!(
        "原文缓存: {} 次请求, 命中率 {:.1}%",
        stats.total_requests,
        stats.hit_rate() * 100.0
    );

    write_output(cli.output.as_deref(), &result).map_err(|e| e.to_string())
}
